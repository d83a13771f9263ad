//! Structured error type and its closed code enumeration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

/// Closed set of failure codes a space-time operation may report.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidTimeRange,
    TimeDiscontinuity,
    InvalidSpeedMultiplier,
    BodyNotSupported,
    TimeOutOfRange,
    CalculationFailed,
    ProviderUnavailable,
    InvalidBodyId,
    InvalidJulianDate,
    UnauthorizedAccess,
    MultipleAuthoritativeFrames,
    NotInitialized,
    AlreadyInitialized,
    InvalidConfiguration,
}

impl ErrorCode {
    /// Caller may retry with another parameter or provider.
    pub const fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::InvalidTimeRange
                | Self::InvalidSpeedMultiplier
                | Self::BodyNotSupported
                | Self::TimeOutOfRange
                | Self::ProviderUnavailable
                | Self::InvalidBodyId
                | Self::InvalidJulianDate
                | Self::CalculationFailed
        )
    }

    /// Signals a caller-side logic defect rather than a bad parameter.
    pub const fn is_continuity_violation(self) -> bool {
        matches!(
            self,
            Self::TimeDiscontinuity | Self::MultipleAuthoritativeFrames
        )
    }
}

/// Error returned by every fallible space-time operation.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct SpaceTimeError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl SpaceTimeError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured context (offending ids, bounds, ...).
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn not_initialized(operation: &str) -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            format!("{operation} called before initialize"),
        )
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfiguration, message)
    }

    pub fn body_not_supported(body_id: &str) -> Self {
        Self::new(
            ErrorCode::BodyNotSupported,
            format!("body '{body_id}' is not supported"),
        )
        .with_details(serde_json::json!({ "bodyId": body_id }))
    }

    pub fn calculation_failed(provider_id: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CalculationFailed, message)
            .with_details(serde_json::json!({ "providerId": provider_id }))
    }

    pub fn unauthorized(operation: &str) -> Self {
        Self::new(
            ErrorCode::UnauthorizedAccess,
            format!("{operation} is not permitted from the presentation layer"),
        )
        .with_details(serde_json::json!({ "operation": operation }))
    }

    /// Provider id carried in `details`, if any.
    pub fn provider_id(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.get("providerId"))
            .and_then(Value::as_str)
    }
}
