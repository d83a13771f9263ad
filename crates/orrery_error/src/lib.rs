//! Error vocabulary for the space-time crates.
//!
//! Every public operation in the workspace returns [`Result`], whose error
//! side is a [`SpaceTimeError`] tagged with one code from the closed
//! [`ErrorCode`] enumeration. Hosts that forward results across a process
//! boundary can wrap them in an [`Envelope`] to get the
//! `{success, data | error}` wire shape.

mod envelope;
mod error;

pub use envelope::Envelope;
pub use error::{ErrorCode, SpaceTimeError};

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, SpaceTimeError>;

/// Reject blank body identifiers.
pub fn validate_body_id(body_id: &str) -> Result<()> {
    if body_id.trim().is_empty() {
        return Err(SpaceTimeError::new(
            ErrorCode::InvalidBodyId,
            "body id must not be blank",
        ));
    }
    Ok(())
}

/// Reject non-finite Julian dates.
pub fn validate_julian_date(julian_date: f64) -> Result<()> {
    if !julian_date.is_finite() {
        return Err(SpaceTimeError::new(
            ErrorCode::InvalidJulianDate,
            format!("julian date must be finite, got {julian_date}"),
        ));
    }
    Ok(())
}
