//! Strategy selection and router verification with hand-built providers.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

use orrery_ephemeris::{
    AnalyticProvider, EphemerisProvider, EphemerisRouter, EphemerisStrategy, StateMetadata,
    StateVector, TimeRange, Vector3,
};
use orrery_error::{ErrorCode, Result, SpaceTimeError};
use orrery_frames::HELIOCENTRIC_ECLIPTIC_J2000;

const J2000: f64 = 2_451_545.0;

#[derive(Clone, Copy, PartialEq)]
enum Behaviour {
    Good,
    Panic,
    WrongFrame,
    WrongEcho,
    NanPosition,
    BareFailure,
}

struct FixedProvider {
    id: String,
    bodies: BTreeSet<String>,
    range: TimeRange,
    behaviour: Behaviour,
    bulk: bool,
    state_calls: Rc<Cell<usize>>,
    bulk_calls: Rc<Cell<usize>>,
}

impl FixedProvider {
    fn new(id: &str, bodies: &[&str]) -> Self {
        Self {
            id: id.into(),
            bodies: bodies.iter().map(|b| (*b).to_owned()).collect(),
            range: TimeRange::new(J2000 - 1000.0, J2000 + 1000.0),
            behaviour: Behaviour::Good,
            bulk: false,
            state_calls: Rc::default(),
            bulk_calls: Rc::default(),
        }
    }

    fn behaving(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    fn range(mut self, start: f64, end: f64) -> Self {
        self.range = TimeRange::new(start, end);
        self
    }

    fn bulk(mut self) -> Self {
        self.bulk = true;
        self
    }
}

impl EphemerisProvider for FixedProvider {
    fn provider_id(&self) -> &str {
        &self.id
    }

    fn supported_bodies(&self) -> &BTreeSet<String> {
        &self.bodies
    }

    fn time_range(&self) -> TimeRange {
        self.range
    }

    fn state(&self, body_id: &str, julian_date: f64) -> Result<StateVector> {
        self.state_calls.set(self.state_calls.get() + 1);
        if !self.supports_body(body_id) {
            return Err(SpaceTimeError::body_not_supported(body_id));
        }
        let (frame, echo, x) = match self.behaviour {
            Behaviour::Panic => panic!("ephemeris table corrupt"),
            Behaviour::BareFailure => {
                return Err(SpaceTimeError::new(ErrorCode::CalculationFailed, "diverged"));
            }
            Behaviour::WrongFrame => ("GALACTIC", julian_date, 1.0),
            Behaviour::WrongEcho => (HELIOCENTRIC_ECLIPTIC_J2000, julian_date + 1.0, 1.0),
            Behaviour::NanPosition => (HELIOCENTRIC_ECLIPTIC_J2000, julian_date, f64::NAN),
            Behaviour::Good => (HELIOCENTRIC_ECLIPTIC_J2000, julian_date, 1.0),
        };
        Ok(StateVector {
            position: Vector3::new(x, 2.0, 3.0),
            velocity: Vector3::ZERO,
            radius: 10.0,
            metadata: StateMetadata {
                julian_date: echo,
                reference_frame: frame.into(),
                provider_id: self.id.clone(),
                accuracy_km: None,
            },
        })
    }

    fn states(&self, body_id: &str, julian_dates: &[f64]) -> Result<Vec<StateVector>> {
        self.bulk_calls.set(self.bulk_calls.get() + 1);
        julian_dates
            .iter()
            .map(|&jd| self.state(body_id, jd))
            .collect()
    }

    fn accuracy_km(&self, _body_id: &str) -> Result<f64> {
        Ok(1.0)
    }

    fn supports_velocity(&self) -> bool {
        false
    }

    fn supports_bulk(&self) -> bool {
        self.bulk
    }
}

fn router() -> EphemerisRouter {
    EphemerisRouter::new(HELIOCENTRIC_ECLIPTIC_J2000)
}

#[test]
fn duplicate_registration_fails() {
    let mut s = EphemerisStrategy::new();
    s.register_provider(Box::new(FixedProvider::new("a", &["earth"])))
        .unwrap();
    let err = s
        .register_provider(Box::new(FixedProvider::new("a", &["mars"])))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    assert_eq!(s.len(), 1);
}

#[test]
fn malformed_provider_rejected_at_registration() {
    let mut s = EphemerisStrategy::new();
    let err = s
        .register_provider(Box::new(FixedProvider::new("empty", &[])))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    let err = s
        .register_provider(Box::new(
            FixedProvider::new("inverted", &["earth"]).range(J2000, J2000 - 1.0),
        ))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    assert!(s.is_empty());
}

#[test]
fn fallback_finds_only_provider_for_mars() {
    let mut s = EphemerisStrategy::new();
    s.register_provider(Box::new(FixedProvider::new("provider-a", &["earth"])))
        .unwrap();
    s.register_provider(Box::new(FixedProvider::new("provider-b", &["earth", "mars"])))
        .unwrap();
    assert!(s.priority("mars").is_none());
    let chosen = s.select_provider("mars", J2000).unwrap();
    assert_eq!(chosen.provider_id(), "provider-b");
    assert_eq!(
        router().state(&s, "mars", J2000).unwrap().metadata.provider_id,
        "provider-b"
    );
}

#[test]
fn priority_replaces_previous_order() {
    let mut s = EphemerisStrategy::new();
    s.register_provider(Box::new(FixedProvider::new("a", &["earth"])))
        .unwrap();
    s.register_provider(Box::new(FixedProvider::new("b", &["earth"])))
        .unwrap();
    s.set_provider_priority("earth", &["b".into(), "a".into()])
        .unwrap();
    assert_eq!(s.select_provider("earth", J2000).unwrap().provider_id(), "b");
    s.set_provider_priority("earth", &["a".into()]).unwrap();
    assert_eq!(s.priority("earth"), Some(&["a".to_owned()][..]));
    assert_eq!(s.select_provider("earth", J2000).unwrap().provider_id(), "a");
}

#[test]
fn priority_skips_providers_that_cannot_serve() {
    let mut s = EphemerisStrategy::new();
    s.register_provider(Box::new(
        FixedProvider::new("narrow", &["earth"]).range(J2000, J2000 + 1.0),
    ))
    .unwrap();
    s.register_provider(Box::new(FixedProvider::new("wide", &["earth"])))
        .unwrap();
    s.set_provider_priority("earth", &["narrow".into()]).unwrap();
    assert_eq!(s.select_provider("earth", J2000 + 0.5).unwrap().provider_id(), "narrow");
    assert_eq!(s.select_provider("earth", J2000 + 500.0).unwrap().provider_id(), "wide");
}

#[test]
fn nobody_serves_yields_provider_unavailable() {
    let mut s = EphemerisStrategy::new();
    s.register_provider(Box::new(FixedProvider::new("a", &["earth"])))
        .unwrap();
    let err = router().state(&s, "pluto", J2000).unwrap_err();
    assert_eq!(err.code, ErrorCode::ProviderUnavailable);
    let err = router().state(&s, "earth", J2000 + 5000.0).unwrap_err();
    assert_eq!(err.code, ErrorCode::ProviderUnavailable);
}

#[test]
fn router_validates_inputs_before_selection() {
    let s = EphemerisStrategy::new();
    assert_eq!(router().state(&s, "  ", J2000).unwrap_err().code, ErrorCode::InvalidBodyId);
    assert_eq!(
        router().state(&s, "earth", f64::INFINITY).unwrap_err().code,
        ErrorCode::InvalidJulianDate
    );
    assert_eq!(router().states(&s, "earth", &[]).unwrap(), Vec::new());
}

#[test]
fn contract_breaches_become_calculation_failed() {
    for (behaviour, id) in [
        (Behaviour::Panic, "panicky"),
        (Behaviour::WrongFrame, "galactic"),
        (Behaviour::WrongEcho, "echo"),
        (Behaviour::NanPosition, "nan"),
        (Behaviour::BareFailure, "bare"),
    ] {
        let mut s = EphemerisStrategy::new();
        s.register_provider(Box::new(FixedProvider::new(id, &["earth"]).behaving(behaviour)))
            .unwrap();
        let err = router().state(&s, "earth", J2000).unwrap_err();
        assert_eq!(err.code, ErrorCode::CalculationFailed, "{id}");
        assert_eq!(err.provider_id(), Some(id), "{id}");
    }
}

#[test]
fn panic_message_is_kept() {
    let mut s = EphemerisStrategy::new();
    s.register_provider(Box::new(
        FixedProvider::new("panicky", &["earth"])
            .behaving(Behaviour::Panic)
            .bulk(),
    ))
    .unwrap();
    let err = router().states(&s, "earth", &[J2000, J2000 + 1.0]).unwrap_err();
    assert_eq!(err.code, ErrorCode::CalculationFailed);
    assert!(err.message.contains("ephemeris table corrupt"), "{}", err.message);
}

#[test]
fn non_bulk_provider_served_sequentially() {
    let provider = FixedProvider::new("seq", &["earth"]);
    let (state_calls, bulk_calls) = (provider.state_calls.clone(), provider.bulk_calls.clone());
    let mut s = EphemerisStrategy::new();
    s.register_provider(Box::new(provider)).unwrap();

    let jds = [J2000, J2000 + 1.0, J2000 + 2.0];
    let states = router().states(&s, "earth", &jds).unwrap();
    assert_eq!(states.len(), 3);
    assert_eq!(bulk_calls.get(), 0);
    assert_eq!(state_calls.get(), 3);
}

#[test]
fn bulk_provider_gets_one_bulk_call() {
    let provider = FixedProvider::new("bulk", &["earth"]).bulk();
    let bulk_calls = provider.bulk_calls.clone();
    let mut s = EphemerisStrategy::new();
    s.register_provider(Box::new(provider)).unwrap();

    let jds = [J2000, J2000 + 1.0];
    let states = router().states(&s, "earth", &jds).unwrap();
    assert_eq!(bulk_calls.get(), 1);
    assert_eq!(states[1].metadata.julian_date, J2000 + 1.0);
}

#[test]
fn batch_spanning_providers_is_split() {
    let mut s = EphemerisStrategy::new();
    s.register_provider(Box::new(
        FixedProvider::new("early", &["earth"]).range(J2000 - 10.0, J2000),
    ))
    .unwrap();
    s.register_provider(Box::new(
        FixedProvider::new("late", &["earth"]).range(J2000, J2000 + 10.0),
    ))
    .unwrap();
    let states = router()
        .states(&s, "earth", &[J2000 - 5.0, J2000 + 5.0])
        .unwrap();
    let ids: Vec<&str> = states.iter().map(|s| s.metadata.provider_id.as_str()).collect();
    assert_eq!(ids, ["early", "late"]);
}

#[test]
fn analytic_and_custom_providers_coexist() {
    let mut s = EphemerisStrategy::new();
    s.register_provider(Box::new(AnalyticProvider::new())).unwrap();
    s.register_provider(Box::new(FixedProvider::new("asteroids", &["ceres"])))
        .unwrap();
    let bodies = s.available_bodies();
    assert!(bodies.contains("ceres") && bodies.contains("earth"));
    assert_eq!(
        router().state(&s, "ceres", J2000).unwrap().metadata.provider_id,
        "asteroids"
    );
}
