//! Composition root of the space-time foundation.
//!
//! [`SpaceTimeCore`] wires the host-owned [`TimeAuthority`], the
//! [`ReferenceFrameManager`] and the ephemeris [`EphemerisRouter`] together
//! and exposes both the query API and the administrative API. Presentation
//! code should only ever see the narrow view in `orrery_view`.
//!
//! ```rust,ignore
//! let time = Rc::new(TimeAuthority::new(J2000_JD)?);
//! let mut core = SpaceTimeCore::new(HELIOCENTRIC_ECLIPTIC_J2000);
//! core.initialize(Rc::clone(&time), ReferenceFrameInfo::heliocentric_ecliptic_j2000())?;
//! core.register_ephemeris_provider(Box::new(AnalyticProvider::new()))?;
//! let earth = core.get_body_state("earth", time.current_julian_date())?;
//! ```

pub mod hierarchy;
pub mod violations;

use std::collections::BTreeMap;
use std::rc::Rc;

use orrery_config::SpaceTimeConfig;
use orrery_ephemeris::{EphemerisProvider, EphemerisRouter, EphemerisStrategy, StateVector};
use orrery_error::{ErrorCode, Result, SpaceTimeError, validate_body_id};
use orrery_frames::{ReferenceFrameInfo, ReferenceFrameManager};
use orrery_time::{SubscriberResult, Subscription, TimeAuthority};
use serde_json::json;
use tracing::{debug, info};

pub use hierarchy::{BodyHierarchy, HierarchyCache, HierarchyDefinition, solar_system_definitions};
pub use violations::{ViolationLog, ViolationRecord};

/// Everything that only exists after [`SpaceTimeCore::initialize`].
#[derive(Debug)]
struct Runtime {
    time: Rc<TimeAuthority>,
    frames: ReferenceFrameManager,
    router: EphemerisRouter,
}

#[derive(Debug)]
pub struct SpaceTimeCore {
    primary_frame_id: String,
    runtime: Option<Runtime>,
    strategy: EphemerisStrategy,
    definitions: Vec<HierarchyDefinition>,
    hierarchy: HierarchyCache,
    violations: ViolationLog,
}

impl SpaceTimeCore {
    /// Uninitialised core expecting `primary_frame_id` as its authoritative
    /// frame. Hierarchy definitions default to the bundled solar system.
    pub fn new(primary_frame_id: impl Into<String>) -> Self {
        Self {
            primary_frame_id: primary_frame_id.into(),
            runtime: None,
            strategy: EphemerisStrategy::new(),
            definitions: solar_system_definitions(),
            hierarchy: HierarchyCache::default(),
            violations: ViolationLog::default(),
        }
    }

    pub fn from_config(config: &SpaceTimeConfig) -> Self {
        Self::new(config.frame.frame_id.clone()).with_violation_log(ViolationLog::new(
            config.violations.capacity,
            config.violations.budget,
        ))
    }

    /// Replace the static parent definitions used for the hierarchy.
    pub fn with_hierarchy_definitions(mut self, definitions: Vec<HierarchyDefinition>) -> Self {
        self.definitions = definitions;
        self
    }

    pub fn with_violation_log(mut self, violations: ViolationLog) -> Self {
        self.violations = violations;
        self
    }

    /// One-shot wiring. Fails `INVALID_CONFIGURATION` on a second call, a
    /// non-authoritative frame, or a frame id other than the configured
    /// primary.
    pub fn initialize(
        &mut self,
        time_authority: Rc<TimeAuthority>,
        reference_frame: ReferenceFrameInfo,
    ) -> Result<()> {
        if self.runtime.is_some() {
            return Err(SpaceTimeError::invalid_configuration(
                "space-time core is already initialized",
            ));
        }
        let frames = ReferenceFrameManager::with_primary(&self.primary_frame_id, reference_frame)?;
        frames.validate_phase1_constraints()?;
        let router = EphemerisRouter::new(frames.primary_frame_id());
        info!(
            frame_id = frames.primary_frame_id(),
            julian_date = time_authority.current_julian_date(),
            "space-time core initialized"
        );
        self.runtime = Some(Runtime {
            time: time_authority,
            frames,
            router,
        });
        self.rebuild_hierarchy();
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn primary_frame_id(&self) -> &str {
        &self.primary_frame_id
    }

    fn runtime(&self, operation: &str) -> Result<&Runtime> {
        self.runtime
            .as_ref()
            .ok_or_else(|| SpaceTimeError::not_initialized(operation))
    }

    fn rebuild_hierarchy(&mut self) {
        let discovered = self.strategy.available_bodies();
        self.hierarchy = HierarchyCache::build(&self.definitions, &discovered);
        debug!(bodies = self.hierarchy.len(), "body hierarchy rebuilt");
    }

    // --- queries -------------------------------------------------------

    pub fn get_body_state(&self, body_id: &str, julian_date: f64) -> Result<StateVector> {
        let rt = self.runtime("getBodyState")?;
        rt.router.state(&self.strategy, body_id, julian_date)
    }

    /// All-or-nothing: the first failing body fails the whole query.
    pub fn get_bodies_state(
        &self,
        body_ids: &[&str],
        julian_date: f64,
    ) -> Result<BTreeMap<String, StateVector>> {
        let rt = self.runtime("getBodiesState")?;
        body_ids
            .iter()
            .map(|&id| {
                rt.router
                    .state(&self.strategy, id, julian_date)
                    .map(|state| (id.to_owned(), state))
            })
            .collect()
    }

    /// States of one body at several epochs.
    pub fn get_body_states(&self, body_id: &str, julian_dates: &[f64]) -> Result<Vec<StateVector>> {
        let rt = self.runtime("getBodyStates")?;
        rt.router.states(&self.strategy, body_id, julian_dates)
    }

    pub fn get_body_hierarchy(&self, body_id: &str) -> Result<BodyHierarchy> {
        self.runtime("getBodyHierarchy")?;
        validate_body_id(body_id)?;
        self.hierarchy
            .get(body_id)
            .cloned()
            .ok_or_else(|| SpaceTimeError::body_not_supported(body_id))
    }

    pub fn get_reference_frame_info(&self) -> Result<&ReferenceFrameInfo> {
        Ok(self.runtime("getReferenceFrameInfo")?.frames.authoritative_frame())
    }

    /// Sorted union of every provider's supported bodies.
    pub fn get_available_bodies(&self) -> Result<Vec<String>> {
        self.runtime("getAvailableBodies")?;
        Ok(self.strategy.available_bodies().into_iter().collect())
    }

    pub fn get_current_time(&self) -> Result<f64> {
        Ok(self.runtime("getCurrentTime")?.time.current_julian_date())
    }

    /// Forward to [`TimeAuthority::subscribe`]; the callback receives the
    /// current epoch before this returns.
    pub fn subscribe_to_time<F>(&self, callback: F) -> Result<Subscription>
    where
        F: Fn(f64) -> SubscriberResult + 'static,
    {
        Ok(self.runtime("subscribeToTime")?.time.subscribe(callback))
    }

    // --- administration -----------------------------------------------

    pub fn register_ephemeris_provider(&mut self, provider: Box<dyn EphemerisProvider>) -> Result<()> {
        self.runtime("registerEphemerisProvider")?;
        self.strategy.register_provider(provider)?;
        self.rebuild_hierarchy();
        Ok(())
    }

    pub fn set_provider_priority(&mut self, body_id: &str, provider_ids: &[String]) -> Result<()> {
        self.runtime("setProviderPriority")?;
        self.strategy.set_provider_priority(body_id, provider_ids)
    }

    /// Apply the `[priorities]` table. Call after registering providers.
    pub fn apply_config_priorities(&mut self, config: &SpaceTimeConfig) -> Result<()> {
        for (body_id, provider_ids) in &config.priorities {
            self.set_provider_priority(body_id, provider_ids)?;
        }
        Ok(())
    }

    pub fn set_time(&self, julian_date: f64) -> Result<()> {
        self.runtime("setTime")?.time.set_time(julian_date)
    }

    pub fn set_time_speed(&self, multiplier: f64) -> Result<()> {
        self.runtime("setTimeSpeed")?.time.set_time_speed(multiplier)
    }

    pub fn start(&self) -> Result<()> {
        self.runtime("start")?.time.start();
        Ok(())
    }

    pub fn stop(&self) -> Result<()> {
        self.runtime("stop")?.time.stop();
        Ok(())
    }

    pub fn time_authority(&self) -> Result<&Rc<TimeAuthority>> {
        Ok(&self.runtime("timeAuthority")?.time)
    }

    pub fn frame_manager(&self) -> Result<&ReferenceFrameManager> {
        Ok(&self.runtime("frameManager")?.frames)
    }

    /// Derived-frame administration. The authoritative frame stays fixed.
    pub fn frame_manager_mut(&mut self) -> Result<&mut ReferenceFrameManager> {
        self.runtime
            .as_mut()
            .map(|rt| &mut rt.frames)
            .ok_or_else(|| SpaceTimeError::not_initialized("frameManager"))
    }

    /// Registration order.
    pub fn provider_ids(&self) -> Result<Vec<String>> {
        self.runtime("providerIds")?;
        Ok(self.strategy.provider_ids().map(str::to_owned).collect())
    }

    /// Available before initialisation so hosts can watch it from the start.
    pub fn violations(&self) -> &ViolationLog {
        &self.violations
    }

    /// Record a rejected operation and hand back the matching error.
    pub fn report_violation(&self, operation: &str) -> SpaceTimeError {
        let err = SpaceTimeError::unauthorized(operation);
        self.violations.record(operation, err.message.clone());
        err
    }

    /// Diagnostic snapshot for host logs.
    pub fn describe(&self) -> serde_json::Value {
        json!({
            "primaryFrameId": self.primary_frame_id,
            "initialized": self.is_initialized(),
            "providers": self.strategy.len(),
            "bodies": self.hierarchy.len(),
            "violations": self.violations.total(),
        })
    }
}

/// Whether `err` came from calling into the core before `initialize`.
pub fn is_not_initialized(err: &SpaceTimeError) -> bool {
    err.code == ErrorCode::NotInitialized
}
