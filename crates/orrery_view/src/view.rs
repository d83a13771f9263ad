//! Capability-narrowed access to a [`SpaceTimeCore`].

use std::collections::BTreeMap;
use std::rc::Rc;

use orrery_core::{BodyHierarchy, SpaceTimeCore};
use orrery_ephemeris::{EphemerisProvider, StateVector};
use orrery_error::{Result, SpaceTimeError};
use orrery_frames::ReferenceFrameInfo;
use orrery_time::{SubscriberResult, Subscription, TimeAuthority};
use tracing::debug;

use crate::validator::{AccessDecision, CoreOperation, denial, validate_operation_name};

/// Time callback as accepted through the view.
pub type TimeCallback = Box<dyn Fn(f64) -> SubscriberResult>;

/// The only operations presentation code may call.
pub trait ReadOnlyApi {
    fn get_body_state(&self, body_id: &str, julian_date: f64) -> Result<StateVector>;

    fn get_bodies_state(
        &self,
        body_ids: &[&str],
        julian_date: f64,
    ) -> Result<BTreeMap<String, StateVector>>;

    fn get_body_hierarchy(&self, body_id: &str) -> Result<BodyHierarchy>;

    fn get_reference_frame_info(&self) -> Result<ReferenceFrameInfo>;

    fn get_available_bodies(&self) -> Result<Vec<String>>;

    fn get_current_time(&self) -> Result<f64>;

    fn subscribe_to_time(&self, callback: TimeCallback) -> Result<Subscription>;
}

/// Read-only handle over a core.
///
/// Holds a shared borrow, so the core cannot be mutated while a view is
/// alive, and has no public fields. The administrative methods exist only
/// so that misuse from dynamic callers is rejected and counted; each one
/// fails `UNAUTHORIZED_ACCESS` and appends to the core's violation log.
///
/// Hosts must drop every view before calling the core's `&mut self`
/// administration methods such as `register_ephemeris_provider`.
#[derive(Debug, Clone, Copy)]
pub struct PresentationView<'a> {
    core: &'a SpaceTimeCore,
}

impl<'a> PresentationView<'a> {
    pub fn new(core: &'a SpaceTimeCore) -> Self {
        Self { core }
    }

    fn deny(&self, operation: CoreOperation) -> SpaceTimeError {
        self.core.report_violation(operation.as_ref())
    }

    /// Gate for operations named by string, e.g. from a scripting bridge.
    /// Denials are recorded like any other violation.
    pub fn authorize(&self, operation_name: &str) -> Result<CoreOperation> {
        match validate_operation_name(operation_name) {
            AccessDecision::Allow { operation } => {
                debug!(%operation, "presentation call authorized");
                Ok(operation)
            }
            AccessDecision::Deny { operation, reason } => {
                self.core.violations().record(&operation, reason.clone());
                Err(denial(&operation, reason))
            }
        }
    }

    pub fn register_ephemeris_provider(&self, _provider: Box<dyn EphemerisProvider>) -> Result<()> {
        Err(self.deny(CoreOperation::RegisterEphemerisProvider))
    }

    pub fn set_provider_priority(&self, _body_id: &str, _provider_ids: &[String]) -> Result<()> {
        Err(self.deny(CoreOperation::SetProviderPriority))
    }

    pub fn initialize(
        &self,
        _time_authority: Rc<TimeAuthority>,
        _reference_frame: ReferenceFrameInfo,
    ) -> Result<()> {
        Err(self.deny(CoreOperation::Initialize))
    }

    pub fn set_time(&self, _julian_date: f64) -> Result<()> {
        Err(self.deny(CoreOperation::SetTime))
    }

    pub fn set_time_speed(&self, _multiplier: f64) -> Result<()> {
        Err(self.deny(CoreOperation::SetTimeSpeed))
    }

    pub fn start(&self) -> Result<()> {
        Err(self.deny(CoreOperation::Start))
    }

    pub fn stop(&self) -> Result<()> {
        Err(self.deny(CoreOperation::Stop))
    }
}

impl ReadOnlyApi for PresentationView<'_> {
    fn get_body_state(&self, body_id: &str, julian_date: f64) -> Result<StateVector> {
        self.core.get_body_state(body_id, julian_date)
    }

    fn get_bodies_state(
        &self,
        body_ids: &[&str],
        julian_date: f64,
    ) -> Result<BTreeMap<String, StateVector>> {
        self.core.get_bodies_state(body_ids, julian_date)
    }

    fn get_body_hierarchy(&self, body_id: &str) -> Result<BodyHierarchy> {
        self.core.get_body_hierarchy(body_id)
    }

    fn get_reference_frame_info(&self) -> Result<ReferenceFrameInfo> {
        self.core.get_reference_frame_info().cloned()
    }

    fn get_available_bodies(&self) -> Result<Vec<String>> {
        self.core.get_available_bodies()
    }

    fn get_current_time(&self) -> Result<f64> {
        self.core.get_current_time()
    }

    fn subscribe_to_time(&self, callback: TimeCallback) -> Result<Subscription> {
        self.core.subscribe_to_time(callback)
    }
}
