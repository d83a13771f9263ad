//! Contract checks runnable against any [`EphemerisProvider`].
//!
//! Used by provider test suites and by hosts that want to vet a provider
//! before registering it. Failures are collected rather than returned
//! early so one report lists every breach.

use orrery_error::ErrorCode;
use serde::Serialize;

use crate::provider::{EphemerisProvider, validate_provider};

/// Position agreement required between `states` and repeated `state`, km.
pub const POSITION_TOLERANCE_KM: f64 = 1e-6;
/// Velocity agreement required between `states` and repeated `state`, km/s.
pub const VELOCITY_TOLERANCE_KM_S: f64 = 1e-9;

const PROBE_BODY: &str = "__conformance_probe_unsupported__";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConformanceReport {
    pub provider_id: String,
    pub checked_states: usize,
    pub failures: Vec<String>,
}

impl ConformanceReport {
    pub fn is_conformant(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sample `sample_count` evenly spaced epochs across the provider's range
/// for every supported body and check each result against the contract.
pub fn check_conformance(
    provider: &dyn EphemerisProvider,
    expected_frame_id: &str,
    sample_count: usize,
) -> ConformanceReport {
    let mut report = ConformanceReport {
        provider_id: provider.provider_id().to_owned(),
        checked_states: 0,
        failures: Vec::new(),
    };
    if let Err(err) = validate_provider(provider) {
        report.failures.push(format!("declaration: {err}"));
        return report;
    }

    let range = provider.time_range();
    let samples = sample_count.max(1);
    let epochs: Vec<f64> = (0..samples)
        .map(|k| {
            if samples == 1 {
                0.5 * (range.start_jd + range.end_jd)
            } else {
                range.start_jd + (range.end_jd - range.start_jd) * k as f64 / (samples - 1) as f64
            }
        })
        .collect();

    for body in provider.supported_bodies() {
        match provider.accuracy_km(body) {
            Ok(acc) if acc.is_finite() && acc > 0.0 => {}
            Ok(acc) => report.failures.push(format!("{body}: accuracy {acc} not positive finite")),
            Err(err) => report.failures.push(format!("{body}: accuracy failed: {err}")),
        }

        let mut singles = Vec::with_capacity(epochs.len());
        for &jd in &epochs {
            match provider.state(body, jd) {
                Ok(state) => {
                    report.checked_states += 1;
                    if !state.is_physically_valid() {
                        report.failures.push(format!("{body}@{jd}: not physically valid"));
                    }
                    if state.metadata.julian_date != jd {
                        report.failures.push(format!(
                            "{body}@{jd}: echoed JD {}",
                            state.metadata.julian_date
                        ));
                    }
                    if state.metadata.reference_frame != expected_frame_id {
                        report.failures.push(format!(
                            "{body}@{jd}: frame '{}' != '{expected_frame_id}'",
                            state.metadata.reference_frame
                        ));
                    }
                    singles.push(Some(state));
                }
                Err(err) => {
                    report.failures.push(format!("{body}@{jd}: {err}"));
                    singles.push(None);
                }
            }
        }

        match provider.states(body, &epochs) {
            Ok(bulk) if bulk.len() != epochs.len() => report.failures.push(format!(
                "{body}: bulk returned {} states for {} epochs",
                bulk.len(),
                epochs.len()
            )),
            Ok(bulk) => {
                for (single, bulk) in singles.iter().zip(&bulk) {
                    let Some(single) = single else { continue };
                    let dp = single.position.distance_to(bulk.position);
                    let dv = single.velocity.distance_to(bulk.velocity);
                    if dp > POSITION_TOLERANCE_KM || dv > VELOCITY_TOLERANCE_KM_S {
                        report.failures.push(format!(
                            "{body}@{}: bulk differs from single (dp={dp:e} km, dv={dv:e} km/s)",
                            single.metadata.julian_date
                        ));
                    }
                }
            }
            Err(err) if singles.iter().all(Option::is_some) => {
                report.failures.push(format!("{body}: bulk failed: {err}"));
            }
            Err(_) => {}
        }
    }

    if let Some(body) = provider.supported_bodies().iter().next() {
        let outside = range.end_jd + 1.0;
        expect_code(
            &mut report,
            "out-of-range JD",
            provider.state(body, outside).err().map(|e| e.code),
            ErrorCode::TimeOutOfRange,
        );
        expect_code(
            &mut report,
            "unsupported body",
            provider.state(PROBE_BODY, 0.5 * (range.start_jd + range.end_jd)).err().map(|e| e.code),
            ErrorCode::BodyNotSupported,
        );
    }
    report
}

fn expect_code(
    report: &mut ConformanceReport,
    what: &str,
    got: Option<ErrorCode>,
    want: ErrorCode,
) {
    match got {
        Some(code) if code == want => {}
        Some(code) => report.failures.push(format!("{what}: got {code}, want {want}")),
        None => report.failures.push(format!("{what}: succeeded, want {want}")),
    }
}
