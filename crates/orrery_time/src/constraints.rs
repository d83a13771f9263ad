//! Continuity policy for the time authority.

use orrery_error::{Result, SpaceTimeError};
use serde::{Deserialize, Serialize};

use crate::julian::{DAYS_PER_JULIAN_CENTURY, J2000_JD};

/// Bounds on how the current epoch may change.
///
/// The policy is fixed for the lifetime of a [`crate::TimeAuthority`]; it is
/// supplied at construction and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeContinuityConstraints {
    /// Largest accepted change of epoch in one step, in days.
    pub max_time_jump_days: f64,
    /// Largest accepted simulation-to-real-time ratio.
    pub max_speed_multiplier: f64,
    /// Smallest epoch change, in days, the autonomous tick commits.
    pub min_time_precision: f64,
    /// Earliest representable epoch (JD).
    pub min_julian_date: f64,
    /// Latest representable epoch (JD).
    pub max_julian_date: f64,
}

impl TimeContinuityConstraints {
    /// System policy: ten-year jumps, J2000 ± one century.
    pub const DEFAULT: Self = Self {
        max_time_jump_days: 3_652.5,
        max_speed_multiplier: 1.0e7,
        min_time_precision: 1.0e-8,
        min_julian_date: J2000_JD - DAYS_PER_JULIAN_CENTURY,
        max_julian_date: J2000_JD + DAYS_PER_JULIAN_CENTURY,
    };

    /// Whether `jd` lies inside `[min_julian_date, max_julian_date]`.
    pub fn contains(&self, jd: f64) -> bool {
        jd >= self.min_julian_date && jd <= self.max_julian_date
    }

    /// Validate the policy itself.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.max_time_jump_days) {
            return Err(SpaceTimeError::invalid_configuration(
                "max_time_jump_days must be positive",
            ));
        }
        if !positive(self.max_speed_multiplier) {
            return Err(SpaceTimeError::invalid_configuration(
                "max_speed_multiplier must be positive",
            ));
        }
        if !positive(self.min_time_precision) {
            return Err(SpaceTimeError::invalid_configuration(
                "min_time_precision must be positive",
            ));
        }
        if !self.min_julian_date.is_finite()
            || !self.max_julian_date.is_finite()
            || self.min_julian_date >= self.max_julian_date
        {
            return Err(SpaceTimeError::invalid_configuration(
                "julian date bounds must be finite with min < max",
            ));
        }
        Ok(())
    }
}

impl Default for TimeContinuityConstraints {
    fn default() -> Self {
        Self::DEFAULT
    }
}
