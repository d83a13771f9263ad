//! The contract every ephemeris data source implements.

use std::collections::BTreeSet;

use orrery_error::{Result, SpaceTimeError};
use serde_json::json;

use crate::state::{StateVector, TimeRange};

/// A source of body states.
///
/// # Contract
///
/// - [`Self::provider_id`] is non-empty and has no surrounding whitespace.
/// - [`Self::supported_bodies`] is non-empty.
/// - [`Self::time_range`] is finite with `start < end`.
/// - [`Self::state`] fails `BODY_NOT_SUPPORTED` outside the supported set,
///   `TIME_OUT_OF_RANGE` outside the time range, and `CALCULATION_FAILED`
///   when the computation itself breaks. On success the metadata echoes
///   the query JD and the authoritative frame id, the radius is positive,
///   and every component is finite.
/// - [`Self::states`] matches repeated [`Self::state`] calls and returns the
///   first failure for the whole batch.
/// - [`Self::accuracy_km`] is positive and finite for supported bodies.
pub trait EphemerisProvider {
    fn provider_id(&self) -> &str;

    fn supported_bodies(&self) -> &BTreeSet<String>;

    fn time_range(&self) -> TimeRange;

    fn state(&self, body_id: &str, julian_date: f64) -> Result<StateVector>;

    /// Bulk query. The default is sequential [`Self::state`] calls,
    /// stopping at the first failure.
    fn states(&self, body_id: &str, julian_dates: &[f64]) -> Result<Vec<StateVector>> {
        julian_dates
            .iter()
            .map(|&jd| self.state(body_id, jd))
            .collect()
    }

    fn accuracy_km(&self, body_id: &str) -> Result<f64>;

    fn supports_velocity(&self) -> bool;

    /// Whether [`Self::states`] is a genuine bulk path. The router serves
    /// providers that return `false` with its own sequential loop.
    fn supports_bulk(&self) -> bool {
        false
    }

    fn supports_body(&self, body_id: &str) -> bool {
        self.supported_bodies().contains(body_id)
    }

    /// Supports `body_id` and covers `julian_date`.
    fn can_serve(&self, body_id: &str, julian_date: f64) -> bool {
        self.supports_body(body_id) && self.time_range().contains(julian_date)
    }
}

/// Registration-time self-check of a provider's declared shape.
pub fn validate_provider(provider: &dyn EphemerisProvider) -> Result<()> {
    let id = provider.provider_id();
    if id.trim().is_empty() {
        return Err(SpaceTimeError::invalid_configuration(
            "provider id must not be empty",
        ));
    }
    if id.trim() != id {
        return Err(SpaceTimeError::invalid_configuration(format!(
            "provider id '{id}' has surrounding whitespace"
        )));
    }

    let bodies = provider.supported_bodies();
    if bodies.is_empty() {
        return Err(SpaceTimeError::invalid_configuration(format!(
            "provider '{id}' supports no bodies"
        ))
        .with_details(json!({ "providerId": id })));
    }
    if bodies.iter().any(|b| b.trim().is_empty()) {
        return Err(SpaceTimeError::invalid_configuration(format!(
            "provider '{id}' lists a blank body id"
        ))
        .with_details(json!({ "providerId": id })));
    }

    let range = provider.time_range();
    if !range.is_well_formed() {
        return Err(SpaceTimeError::invalid_configuration(format!(
            "provider '{id}' has malformed time range [{}, {}]",
            range.start_jd, range.end_jd
        ))
        .with_details(json!({ "providerId": id })));
    }
    Ok(())
}
