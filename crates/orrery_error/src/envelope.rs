//! `{success, data | error}` wire shape.

use serde::{Deserialize, Serialize};

use crate::SpaceTimeError;

/// Serialisable form of a [`crate::Result`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Success { success: Success, data: T },
    Failure { success: Failure, error: SpaceTimeError },
}

/// Literal `true` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "bool", into = "bool")]
pub struct Success;

/// Literal `false` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "bool", into = "bool")]
pub struct Failure;

impl From<Success> for bool {
    fn from(_: Success) -> bool {
        true
    }
}

impl TryFrom<bool> for Success {
    type Error = &'static str;
    fn try_from(v: bool) -> Result<Self, Self::Error> {
        if v { Ok(Success) } else { Err("expected success=true") }
    }
}

impl From<Failure> for bool {
    fn from(_: Failure) -> bool {
        false
    }
}

impl TryFrom<bool> for Failure {
    type Error = &'static str;
    fn try_from(v: bool) -> Result<Self, Self::Error> {
        if v { Err("expected success=false") } else { Ok(Failure) }
    }
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn into_result(self) -> crate::Result<T> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { error, .. } => Err(error),
        }
    }
}

impl<T> From<crate::Result<T>> for Envelope<T> {
    fn from(result: crate::Result<T>) -> Self {
        match result {
            Ok(data) => Self::Success {
                success: Success,
                data,
            },
            Err(error) => Self::Failure {
                success: Failure,
                error,
            },
        }
    }
}
