//! Instance-free allow/deny decisions for presentation access.
//!
//! Usable from static checks, logging, and bridges that receive operation
//! names as strings, without a live core.

use std::str::FromStr;

use orrery_error::{ErrorCode, Result, SpaceTimeError};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Every operation the space-time core exposes, by its wire name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CoreOperation {
    GetBodyState,
    GetBodiesState,
    GetBodyHierarchy,
    GetReferenceFrameInfo,
    GetAvailableBodies,
    GetCurrentTime,
    SubscribeToTime,
    RegisterEphemerisProvider,
    SetProviderPriority,
    Initialize,
    SetTime,
    SetTimeSpeed,
    Start,
    Stop,
}

impl CoreOperation {
    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            Self::GetBodyState
                | Self::GetBodiesState
                | Self::GetBodyHierarchy
                | Self::GetReferenceFrameInfo
                | Self::GetAvailableBodies
                | Self::GetCurrentTime
                | Self::SubscribeToTime
        )
    }

    pub fn read_only() -> impl Iterator<Item = Self> {
        Self::iter().filter(|op| op.is_read_only())
    }

    pub fn administrative() -> impl Iterator<Item = Self> {
        Self::iter().filter(|op| !op.is_read_only())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum AccessDecision {
    Allow { operation: CoreOperation },
    Deny { operation: String, reason: String },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// `UNAUTHORIZED_ACCESS` for a denial.
    pub fn into_result(self) -> Result<CoreOperation> {
        match self {
            Self::Allow { operation } => Ok(operation),
            Self::Deny { operation, reason } => Err(denial(&operation, reason)),
        }
    }
}

pub(crate) fn denial(operation: &str, reason: String) -> SpaceTimeError {
    SpaceTimeError::new(ErrorCode::UnauthorizedAccess, reason)
        .with_details(serde_json::json!({ "operation": operation }))
}

pub fn validate_presentation_access(operation: CoreOperation) -> AccessDecision {
    if operation.is_read_only() {
        AccessDecision::Allow { operation }
    } else {
        AccessDecision::Deny {
            operation: operation.to_string(),
            reason: format!("{operation} is not permitted from the presentation layer"),
        }
    }
}

/// Unknown names are denied.
pub fn validate_operation_name(name: &str) -> AccessDecision {
    match CoreOperation::from_str(name.trim()) {
        Ok(operation) => validate_presentation_access(operation),
        Err(_) => AccessDecision::Deny {
            operation: name.to_owned(),
            reason: format!("unknown operation '{name}'"),
        },
    }
}
