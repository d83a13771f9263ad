//! Configuration for the space-time core.
//!
//! Every section is optional; an empty document yields the system defaults
//! (heliocentric ecliptic J2000 frame, epoch J2000.0, real-time speed).
//!
//! ```toml
//! [frame]
//! frame_id = "HELIOCENTRIC_ECLIPTIC_J2000"
//!
//! [time]
//! initial_julian_date = 2460000.5
//! initial_speed = 86400.0
//!
//! [time.constraints]
//! max_time_jump_days = 365.25
//!
//! [violations]
//! budget = 3
//!
//! [priorities]
//! earth = ["de440", "analytic-keplerian"]
//! ```

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use orrery_frames::{FrameType, HELIOCENTRIC_ECLIPTIC_J2000, ReferenceFrameInfo};
use orrery_time::{J2000_JD, TimeAuthority, TimeContinuityConstraints};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::ConfigError;

/// Authoritative frame definition. The frame type is always authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub frame_id: String,
    pub name: String,
    pub origin: String,
    pub axes: String,
    pub position_unit: String,
    pub velocity_unit: String,
    pub time_unit: String,
}

impl Default for FrameConfig {
    fn default() -> Self {
        let f = ReferenceFrameInfo::heliocentric_ecliptic_j2000();
        Self {
            frame_id: f.frame_id,
            name: f.name,
            origin: f.origin,
            axes: f.axes,
            position_unit: f.position_unit,
            velocity_unit: f.velocity_unit,
            time_unit: f.time_unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub initial_julian_date: f64,
    /// Simulated seconds per real second.
    pub initial_speed: f64,
    pub constraints: TimeContinuityConstraints,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            initial_julian_date: J2000_JD,
            initial_speed: 1.0,
            constraints: TimeContinuityConstraints::DEFAULT,
        }
    }
}

/// Boundary-violation reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolationConfig {
    /// Records kept before the oldest is discarded.
    pub capacity: usize,
    /// Total violations at which the host should act.
    pub budget: u64,
}

impl Default for ViolationConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            budget: 10,
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceTimeConfig {
    pub frame: FrameConfig,
    pub time: TimeConfig,
    pub violations: ViolationConfig,
    /// Body id to ordered provider ids.
    pub priorities: IndexMap<String, Vec<String>>,
}

impl SpaceTimeConfig {
    pub const ENV_CONFIG_PATH: &str = "ORRERY_CONFIG";

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(config_path = %path.display(), "loading configuration");
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from `ORRERY_CONFIG` when set and non-blank, otherwise from the
    /// first existing candidate.
    pub fn load_with_env<P: AsRef<Path>>(candidates: &[P]) -> Result<(Self, PathBuf), ConfigError> {
        let env_path = std::env::var(Self::ENV_CONFIG_PATH).ok();
        Self::load_first(env_path.as_deref(), candidates)
    }

    /// [`Self::load_with_env`] with the override supplied explicitly.
    pub fn load_first<P: AsRef<Path>>(
        override_path: Option<&str>,
        candidates: &[P],
    ) -> Result<(Self, PathBuf), ConfigError> {
        if let Some(path) = override_path.filter(|p| !p.trim().is_empty()) {
            let path = PathBuf::from(path);
            return Ok((Self::load(&path)?, path));
        }
        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                return Ok((Self::load(path)?, path.to_path_buf()));
            }
        }
        Err(ConfigError::NotFound(
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        ))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.authoritative_frame().validate_fields()?;
        let time = &self.time;
        time.constraints.validate()?;
        if !time.initial_julian_date.is_finite() || !time.constraints.contains(time.initial_julian_date)
        {
            return Err(ConfigError::Invalid(format!(
                "initial_julian_date {} outside [{}, {}]",
                time.initial_julian_date,
                time.constraints.min_julian_date,
                time.constraints.max_julian_date
            )));
        }
        if !time.initial_speed.is_finite()
            || time.initial_speed < 0.0
            || time.initial_speed > time.constraints.max_speed_multiplier
        {
            return Err(ConfigError::Invalid(format!(
                "initial_speed {} outside [0, {}]",
                time.initial_speed, time.constraints.max_speed_multiplier
            )));
        }
        if self.violations.capacity == 0 {
            return Err(ConfigError::Invalid(
                "violations.capacity must be at least 1".into(),
            ));
        }
        for (body, ids) in &self.priorities {
            if body.trim().is_empty() {
                return Err(ConfigError::Invalid("priority body id is blank".into()));
            }
            if ids.iter().any(|id| id.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "priority list for '{body}' has a blank provider id"
                )));
            }
        }
        Ok(())
    }

    /// Descriptor handed to the core at initialisation.
    pub fn authoritative_frame(&self) -> ReferenceFrameInfo {
        let f = &self.frame;
        ReferenceFrameInfo {
            frame_id: f.frame_id.clone(),
            name: f.name.clone(),
            origin: f.origin.clone(),
            axes: f.axes.clone(),
            frame_type: FrameType::Authoritative,
            position_unit: f.position_unit.clone(),
            velocity_unit: f.velocity_unit.clone(),
            time_unit: f.time_unit.clone(),
        }
    }

    /// The host-owned time authority described by `[time]`.
    pub fn build_time_authority(&self) -> Result<TimeAuthority, ConfigError> {
        let authority =
            TimeAuthority::with_constraints(self.time.initial_julian_date, self.time.constraints)?;
        authority.set_time_speed(self.time.initial_speed)?;
        Ok(authority)
    }

    pub fn uses_default_frame(&self) -> bool {
        self.frame.frame_id == HELIOCENTRIC_ECLIPTIC_J2000
    }
}
