//! The time authority: sole owner and mutator of the current epoch.
//!
//! Two states, STOPPED and RUNNING. Explicit mutation goes through
//! [`TimeAuthority::set_time`], which enforces the range and continuity
//! policy and fails loudly. The autonomous path is [`TimeAuthority::tick`],
//! driven by the host once per frame while RUNNING; it has no caller to
//! report to, so it clamps and silently drops instead of failing.
//!
//! All state sits behind `Cell`/`RefCell`: the authority is shared by
//! reference (`Rc<TimeAuthority>`) between the host and the space-time core
//! on a single logical thread.

use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use std::time::Duration;

use orrery_error::{ErrorCode, Result, SpaceTimeError, validate_julian_date};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::constraints::TimeContinuityConstraints;
use crate::julian::SECONDS_PER_DAY;
use crate::subscription::{self, SubscriberRegistry, SubscriberResult, Subscription};

/// What one host tick did to the epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Authority is STOPPED; nothing happened.
    Stopped,
    /// Epoch committed and subscribers notified.
    Advanced { julian_date: f64 },
    /// Delta below `min_time_precision`; carried into the next tick.
    Accumulated { pending_days: f64 },
    /// Result would leave the JD bounds; epoch left unchanged.
    Dropped { rejected_julian_date: f64 },
}

pub struct TimeAuthority {
    constraints: TimeContinuityConstraints,
    current_jd: Cell<f64>,
    speed_multiplier: Cell<f64>,
    running: Cell<bool>,
    pending_days: Cell<f64>,
    /// Bumped on every commit; a delivery pass stops once it is stale.
    generation: Cell<u64>,
    subscribers: Rc<RefCell<SubscriberRegistry>>,
}

impl Debug for TimeAuthority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeAuthority")
            .field("current_jd", &self.current_jd.get())
            .field("speed_multiplier", &self.speed_multiplier.get())
            .field("running", &self.running.get())
            .field("subscribers", &self.subscribers.borrow().len())
            .field("constraints", &self.constraints)
            .finish()
    }
}

impl TimeAuthority {
    /// Create a STOPPED authority at `initial_jd` under the default policy.
    pub fn new(initial_jd: f64) -> Result<Self> {
        Self::with_constraints(initial_jd, TimeContinuityConstraints::DEFAULT)
    }

    /// Create a STOPPED authority at `initial_jd` under a custom policy.
    pub fn with_constraints(initial_jd: f64, constraints: TimeContinuityConstraints) -> Result<Self> {
        constraints.validate()?;
        validate_julian_date(initial_jd)?;
        if !constraints.contains(initial_jd) {
            return Err(out_of_range(initial_jd, &constraints));
        }
        Ok(Self {
            constraints,
            current_jd: Cell::new(initial_jd),
            speed_multiplier: Cell::new(1.0),
            running: Cell::new(false),
            pending_days: Cell::new(0.0),
            generation: Cell::new(0),
            subscribers: Rc::new(RefCell::new(SubscriberRegistry::default())),
        })
    }

    pub fn constraints(&self) -> &TimeContinuityConstraints {
        &self.constraints
    }

    /// Current epoch (JD). Pure read.
    pub fn current_julian_date(&self) -> f64 {
        self.current_jd.get()
    }

    pub fn time_speed(&self) -> f64 {
        self.speed_multiplier.get()
    }

    /// Set the simulation-to-real-time ratio used by [`Self::tick`].
    pub fn set_time_speed(&self, multiplier: f64) -> Result<()> {
        let max = self.constraints.max_speed_multiplier;
        if !multiplier.is_finite() || multiplier < 0.0 || multiplier.abs() > max {
            return Err(SpaceTimeError::new(
                ErrorCode::InvalidSpeedMultiplier,
                format!("speed multiplier {multiplier} must be finite and within [0, {max}]"),
            )
            .with_details(json!({ "multiplier": multiplier.to_string(), "max": max })));
        }
        self.speed_multiplier.set(multiplier);
        debug!(multiplier, "time speed set");
        Ok(())
    }

    /// Jump to `jd`, then notify every subscriber before returning.
    ///
    /// On failure the current epoch is unchanged.
    pub fn set_time(&self, jd: f64) -> Result<()> {
        validate_julian_date(jd)?;
        if !self.constraints.contains(jd) {
            return Err(out_of_range(jd, &self.constraints));
        }
        let current = self.current_jd.get();
        let jump = (jd - current).abs();
        if jump > self.constraints.max_time_jump_days {
            return Err(SpaceTimeError::new(
                ErrorCode::TimeDiscontinuity,
                format!(
                    "jump of {jump} days exceeds the {} day limit",
                    self.constraints.max_time_jump_days
                ),
            )
            .with_details(json!({
                "current": current,
                "requested": jd,
                "maxTimeJumpDays": self.constraints.max_time_jump_days,
            })));
        }
        self.pending_days.set(0.0);
        self.commit(jd);
        Ok(())
    }

    /// Register `callback` and deliver the current epoch to it once before
    /// returning.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(f64) -> SubscriberResult + 'static,
    {
        let callback: subscription::Callback = Rc::new(callback);
        let id = self.subscribers.borrow_mut().insert(Rc::clone(&callback));
        let handle = Subscription::new(id, &self.subscribers);
        subscription::invoke(id, &callback, self.current_jd.get());
        handle
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn start(&self) {
        if !self.running.replace(true) {
            info!(julian_date = self.current_jd.get(), speed = self.speed_multiplier.get(), "time authority started");
        }
    }

    pub fn stop(&self) {
        if self.running.replace(false) {
            self.pending_days.set(0.0);
            info!(julian_date = self.current_jd.get(), "time authority stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Advance by `elapsed` real time scaled by the speed multiplier.
    ///
    /// The day delta is clamped to `±max_time_jump_days`. Deltas smaller
    /// than `min_time_precision` accumulate across ticks. A result outside
    /// the JD bounds is dropped and time holds still.
    pub fn tick(&self, elapsed: Duration) -> TickOutcome {
        if !self.running.get() {
            return TickOutcome::Stopped;
        }
        let max_jump = self.constraints.max_time_jump_days;
        let delta_days = (elapsed.as_secs_f64() * self.speed_multiplier.get() / SECONDS_PER_DAY)
            .clamp(-max_jump, max_jump);
        let pending = (self.pending_days.get() + delta_days).clamp(-max_jump, max_jump);

        if pending.abs() < self.constraints.min_time_precision {
            self.pending_days.set(pending);
            return TickOutcome::Accumulated {
                pending_days: pending,
            };
        }

        self.pending_days.set(0.0);
        let candidate = self.current_jd.get() + pending;
        if !candidate.is_finite() || !self.constraints.contains(candidate) {
            warn!(
                current = self.current_jd.get(),
                rejected = candidate,
                "tick would leave julian date bounds; holding time"
            );
            return TickOutcome::Dropped {
                rejected_julian_date: candidate,
            };
        }
        self.commit(candidate);
        TickOutcome::Advanced {
            julian_date: candidate,
        }
    }

    /// Store `jd` and notify subscribers.
    ///
    /// A callback may itself commit a newer epoch; that nested pass reaches
    /// every subscriber, so the outer pass ends early rather than hand the
    /// older value to the ones it has not reached yet.
    fn commit(&self, jd: f64) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        self.current_jd.set(jd);
        let report = subscription::deliver(&self.subscribers, jd, || {
            self.generation.get() != generation
        });
        debug!(
            julian_date = jd,
            delivered = report.delivered,
            failed = report.failed,
            superseded = report.superseded,
            "epoch committed"
        );
    }
}

fn out_of_range(jd: f64, constraints: &TimeContinuityConstraints) -> SpaceTimeError {
    SpaceTimeError::new(
        ErrorCode::InvalidTimeRange,
        format!(
            "julian date {jd} outside [{}, {}]",
            constraints.min_julian_date, constraints.max_julian_date
        ),
    )
    .with_details(json!({
        "requested": jd,
        "min": constraints.min_julian_date,
        "max": constraints.max_julian_date,
    }))
}
