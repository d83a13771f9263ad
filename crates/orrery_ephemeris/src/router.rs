//! Stateless dispatch from queries to providers.

use std::panic::{AssertUnwindSafe, catch_unwind};

use orrery_error::{ErrorCode, Result, SpaceTimeError, validate_body_id, validate_julian_date};
use tracing::{debug, warn};

use crate::provider::EphemerisProvider;
use crate::state::StateVector;
use crate::strategy::EphemerisStrategy;

/// Answers state queries by asking an [`EphemerisStrategy`] which provider
/// to use, then verifying what the provider returned.
///
/// Holds only the authoritative frame id used to check results. Provider
/// errors pass through with their own code. Panics and contract breaches
/// (non-finite vectors, wrong JD echo, wrong frame) surface as
/// `CALCULATION_FAILED` carrying the provider id.
#[derive(Debug, Clone)]
pub struct EphemerisRouter {
    authoritative_frame_id: String,
}

impl EphemerisRouter {
    pub fn new(authoritative_frame_id: impl Into<String>) -> Self {
        Self {
            authoritative_frame_id: authoritative_frame_id.into(),
        }
    }

    pub fn authoritative_frame_id(&self) -> &str {
        &self.authoritative_frame_id
    }

    pub fn state(
        &self,
        strategy: &EphemerisStrategy,
        body_id: &str,
        julian_date: f64,
    ) -> Result<StateVector> {
        validate_body_id(body_id)?;
        validate_julian_date(julian_date)?;
        let provider = strategy.select_provider(body_id, julian_date)?;
        debug!(body_id, julian_date, provider_id = provider.provider_id(), "routing state query");
        let state = contained(provider, || provider.state(body_id, julian_date))?;
        self.verify(provider, &state, julian_date)?;
        Ok(state)
    }

    /// Bulk query. One provider serves the whole batch when it covers every
    /// JD; otherwise each JD is routed on its own. Fails on the first error.
    pub fn states(
        &self,
        strategy: &EphemerisStrategy,
        body_id: &str,
        julian_dates: &[f64],
    ) -> Result<Vec<StateVector>> {
        validate_body_id(body_id)?;
        let Some(&first) = julian_dates.first() else {
            return Ok(Vec::new());
        };
        for &jd in julian_dates {
            validate_julian_date(jd)?;
        }

        let provider = strategy.select_provider(body_id, first)?;
        if !julian_dates.iter().all(|&jd| provider.can_serve(body_id, jd)) {
            debug!(body_id, count = julian_dates.len(), "batch spans providers, routing per epoch");
            return julian_dates
                .iter()
                .map(|&jd| self.state(strategy, body_id, jd))
                .collect();
        }

        let states = if provider.supports_bulk() {
            contained(provider, || provider.states(body_id, julian_dates))?
        } else {
            julian_dates
                .iter()
                .map(|&jd| contained(provider, || provider.state(body_id, jd)))
                .collect::<Result<Vec<_>>>()?
        };

        if states.len() != julian_dates.len() {
            return Err(SpaceTimeError::calculation_failed(
                provider.provider_id(),
                format!(
                    "returned {} states for {} epochs",
                    states.len(),
                    julian_dates.len()
                ),
            ));
        }
        for (state, &jd) in states.iter().zip(julian_dates) {
            self.verify(provider, state, jd)?;
        }
        Ok(states)
    }

    fn verify(
        &self,
        provider: &dyn EphemerisProvider,
        state: &StateVector,
        julian_date: f64,
    ) -> Result<()> {
        let provider_id = provider.provider_id();
        let problem = if !state.is_physically_valid() {
            Some("non-finite vector or non-positive radius".to_owned())
        } else if state.metadata.julian_date != julian_date {
            Some(format!(
                "echoed JD {} for query JD {julian_date}",
                state.metadata.julian_date
            ))
        } else if state.metadata.reference_frame != self.authoritative_frame_id {
            Some(format!(
                "state in frame '{}', expected '{}'",
                state.metadata.reference_frame, self.authoritative_frame_id
            ))
        } else {
            None
        };
        match problem {
            None => Ok(()),
            Some(message) => {
                warn!(provider_id, julian_date, %message, "provider broke its contract");
                Err(SpaceTimeError::calculation_failed(provider_id, message))
            }
        }
    }
}

/// Run a provider call, turning a panic into `CALCULATION_FAILED` and
/// tagging any `CALCULATION_FAILED` that lacks the provider id.
fn contained<T>(provider: &dyn EphemerisProvider, call: impl FnOnce() -> Result<T>) -> Result<T> {
    let provider_id = provider.provider_id();
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Err(err)) if err.code == ErrorCode::CalculationFailed && err.provider_id().is_none() => {
            Err(SpaceTimeError::calculation_failed(provider_id, err.message))
        }
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_owned());
            warn!(provider_id, %reason, "provider panicked");
            Err(SpaceTimeError::calculation_failed(
                provider_id,
                format!("provider '{provider_id}' panicked: {reason}"),
            ))
        }
    }
}
