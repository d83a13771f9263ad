//! Mean-element analytic provider.
//!
//! Positions come from [`orrery_orbit::calculate_position`] and are chained
//! through each body's parent until the frame origin is reached, so the
//! Moon's geocentric elements land in the heliocentric frame. Velocity is
//! the solver's central finite difference over the same chain.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use orrery_error::{ErrorCode, Result, SpaceTimeError, validate_body_id, validate_julian_date};
use orrery_frames::HELIOCENTRIC_ECLIPTIC_J2000;
use orrery_orbit::{AU_KM, Vector3, calculate_position, finite_difference_velocity};
use orrery_time::{DAYS_PER_JULIAN_CENTURY, J2000_JD};
use serde_json::json;
use tracing::trace;

use crate::bodies::{BodyDefinition, solar_system};
use crate::provider::EphemerisProvider;
use crate::state::{StateMetadata, StateVector, TimeRange};

pub const ANALYTIC_PROVIDER_ID: &str = "analytic-keplerian";

/// J2000 ± one Julian century.
const DEFAULT_RANGE: TimeRange = TimeRange::new(
    J2000_JD - DAYS_PER_JULIAN_CENTURY,
    J2000_JD + DAYS_PER_JULIAN_CENTURY,
);

/// Deepest parent chain followed before declaring the catalogue cyclic.
const MAX_CHAIN_DEPTH: usize = 8;

/// Per-call memoization of heliocentric positions.
///
/// Keys use `jd.to_bits()`; epochs inside one call are bit-identical when
/// they come from the same arithmetic. Dropped when the call returns.
#[derive(Default)]
struct ComputationContext {
    cache: HashMap<(usize, u64), Vector3>,
    evaluations: u32,
    cache_hits: u32,
}

/// Keplerian provider over a body catalogue.
#[derive(Debug, Clone)]
pub struct AnalyticProvider {
    provider_id: String,
    frame_id: String,
    bodies: IndexMap<String, BodyDefinition>,
    supported: BTreeSet<String>,
    time_range: TimeRange,
}

impl AnalyticProvider {
    /// Solar-system catalogue in the default heliocentric frame.
    pub fn new() -> Self {
        Self::with_bodies(ANALYTIC_PROVIDER_ID, solar_system())
    }

    /// Custom catalogue. Later duplicates of an id replace earlier ones.
    pub fn with_bodies(provider_id: impl Into<String>, bodies: Vec<BodyDefinition>) -> Self {
        let bodies: IndexMap<String, BodyDefinition> =
            bodies.into_iter().map(|b| (b.id.clone(), b)).collect();
        let supported = bodies.keys().cloned().collect();
        Self {
            provider_id: provider_id.into(),
            frame_id: HELIOCENTRIC_ECLIPTIC_J2000.to_owned(),
            bodies,
            supported,
            time_range: DEFAULT_RANGE,
        }
    }

    /// Stamp results with a different authoritative frame id.
    pub fn with_frame(mut self, frame_id: impl Into<String>) -> Self {
        self.frame_id = frame_id.into();
        self
    }

    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    /// Restrict to a subset of the catalogue. Parents of kept bodies stay
    /// computable but are not advertised.
    pub fn restricted_to<I, S>(mut self, body_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported = body_ids
            .into_iter()
            .map(Into::into)
            .filter(|id: &String| self.bodies.contains_key(id))
            .collect();
        self
    }

    pub fn body(&self, body_id: &str) -> Option<&BodyDefinition> {
        self.bodies.get(body_id)
    }

    fn check_query(&self, body_id: &str, julian_date: f64) -> Result<usize> {
        validate_body_id(body_id)?;
        validate_julian_date(julian_date)?;
        if !self.supported.contains(body_id) {
            return Err(SpaceTimeError::body_not_supported(body_id));
        }
        if !self.time_range.contains(julian_date) {
            return Err(SpaceTimeError::new(
                ErrorCode::TimeOutOfRange,
                format!(
                    "julian date {julian_date} outside provider range [{}, {}]",
                    self.time_range.start_jd, self.time_range.end_jd
                ),
            )
            .with_details(json!({
                "providerId": self.provider_id,
                "startJd": self.time_range.start_jd,
                "endJd": self.time_range.end_jd,
            })));
        }
        self.bodies
            .get_index_of(body_id)
            .ok_or_else(|| SpaceTimeError::body_not_supported(body_id))
    }

    /// Heliocentric position in AU, following the parent chain. `None` when
    /// the chain does not terminate within [`MAX_CHAIN_DEPTH`] links.
    fn position_au(&self, index: usize, jd: f64, ctx: &mut ComputationContext) -> Option<Vector3> {
        let key = (index, jd.to_bits());
        if let Some(cached) = ctx.cache.get(&key) {
            ctx.cache_hits += 1;
            return Some(*cached);
        }

        let mut total = Vector3::ZERO;
        let mut current = Some(index);
        for _ in 0..MAX_CHAIN_DEPTH {
            let Some(at) = current else {
                ctx.cache.insert(key, total);
                return Some(total);
            };
            let (_, body) = self.bodies.get_index(at)?;
            if let Some(elements) = &body.elements {
                total = total + calculate_position(elements, jd).vector();
                ctx.evaluations += 1;
            }
            // A parent outside the catalogue is the origin.
            current = body
                .parent
                .as_deref()
                .and_then(|parent| self.bodies.get_index_of(parent));
        }
        if current.is_none() {
            ctx.cache.insert(key, total);
            return Some(total);
        }
        None
    }

    fn compute(&self, index: usize, jd: f64, ctx: &mut ComputationContext) -> Result<StateVector> {
        let (body_id, body) = self
            .bodies
            .get_index(index)
            .ok_or_else(|| SpaceTimeError::calculation_failed(&self.provider_id, "body index lost"))?;

        let position_au = self.position_au(index, jd, ctx).ok_or_else(|| {
            SpaceTimeError::calculation_failed(
                &self.provider_id,
                format!("parent chain of '{body_id}' is cyclic or too deep"),
            )
        })?;
        let position = position_au * AU_KM;
        if !position.is_finite() {
            return Err(SpaceTimeError::calculation_failed(
                &self.provider_id,
                format!("non-finite position for '{body_id}' at {jd}"),
            ));
        }

        let velocity = finite_difference_velocity(
            |t| {
                self.position_au(index, t, ctx)
                    .unwrap_or(Vector3::new(f64::NAN, f64::NAN, f64::NAN))
            },
            jd,
        );

        Ok(StateVector {
            position,
            velocity,
            radius: body.radius_km,
            metadata: StateMetadata {
                julian_date: jd,
                reference_frame: self.frame_id.clone(),
                provider_id: self.provider_id.clone(),
                accuracy_km: Some(body.accuracy_km),
            },
        })
    }
}

impl Default for AnalyticProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EphemerisProvider for AnalyticProvider {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn supported_bodies(&self) -> &BTreeSet<String> {
        &self.supported
    }

    fn time_range(&self) -> TimeRange {
        self.time_range
    }

    fn state(&self, body_id: &str, julian_date: f64) -> Result<StateVector> {
        let index = self.check_query(body_id, julian_date)?;
        let mut ctx = ComputationContext::default();
        self.compute(index, julian_date, &mut ctx)
    }

    fn states(&self, body_id: &str, julian_dates: &[f64]) -> Result<Vec<StateVector>> {
        let mut ctx = ComputationContext::default();
        let mut out = Vec::with_capacity(julian_dates.len());
        for &jd in julian_dates {
            let index = self.check_query(body_id, jd)?;
            out.push(self.compute(index, jd, &mut ctx)?);
        }
        trace!(
            body_id,
            count = out.len(),
            evaluations = ctx.evaluations,
            cache_hits = ctx.cache_hits,
            "bulk analytic evaluation"
        );
        Ok(out)
    }

    fn accuracy_km(&self, body_id: &str) -> Result<f64> {
        validate_body_id(body_id)?;
        if !self.supported.contains(body_id) {
            return Err(SpaceTimeError::body_not_supported(body_id));
        }
        self.bodies
            .get(body_id)
            .map(|b| b.accuracy_km)
            .ok_or_else(|| SpaceTimeError::body_not_supported(body_id))
    }

    fn supports_velocity(&self) -> bool {
        true
    }

    fn supports_bulk(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{EARTH, MOON, SUN};

    #[test]
    fn sun_sits_at_origin() {
        let p = AnalyticProvider::new();
        let s = p.state(SUN, J2000_JD).unwrap();
        assert_eq!(s.position, Vector3::ZERO);
        assert_eq!(s.velocity, Vector3::ZERO);
        assert_eq!(s.radius, 695_700.0);
    }

    #[test]
    fn moon_is_near_earth() {
        let p = AnalyticProvider::new();
        let earth = p.state(EARTH, J2000_JD).unwrap();
        let moon = p.state(MOON, J2000_JD).unwrap();
        let d = earth.position.distance_to(moon.position);
        assert!((356_000.0..407_000.0).contains(&d), "earth-moon {d:.0} km");
    }

    #[test]
    fn memo_hits_inside_bulk_call() {
        let p = AnalyticProvider::new();
        let index = p.bodies.get_index_of(MOON).unwrap();
        let mut ctx = ComputationContext::default();
        p.compute(index, J2000_JD, &mut ctx).unwrap();
        p.compute(index, J2000_JD, &mut ctx).unwrap();
        assert!(ctx.cache_hits >= 3, "hits = {}", ctx.cache_hits);
    }

    #[test]
    fn restricted_provider_hides_unlisted_bodies() {
        let p = AnalyticProvider::new().restricted_to([MOON]);
        assert!(p.state(MOON, J2000_JD).is_ok());
        assert_eq!(
            p.state(EARTH, J2000_JD).unwrap_err().code,
            ErrorCode::BodyNotSupported
        );
    }

    #[test]
    fn cyclic_catalogue_fails_calculation() {
        let a = BodyDefinition {
            id: "a".into(),
            name: "A".into(),
            parent: Some("b".into()),
            radius_km: 1.0,
            accuracy_km: 1.0,
            elements: None,
        };
        let b = BodyDefinition {
            id: "b".into(),
            parent: Some("a".into()),
            name: "B".into(),
            ..a.clone()
        };
        let p = AnalyticProvider::with_bodies("cyclic", vec![a, b]);
        let err = p.state("a", J2000_JD).unwrap_err();
        assert_eq!(err.code, ErrorCode::CalculationFailed);
        assert_eq!(err.provider_id(), Some("cyclic"));
    }
}
