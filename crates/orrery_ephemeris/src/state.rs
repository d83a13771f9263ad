//! Query results and provider coverage.

use orrery_orbit::Vector3;
use serde::{Deserialize, Serialize};

/// Provenance of a [`StateVector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMetadata {
    /// Echo of the query epoch (JD).
    pub julian_date: f64,
    /// Id of the authoritative frame the vectors are expressed in.
    pub reference_frame: String,
    pub provider_id: String,
    /// Provider's accuracy estimate for this body, km.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_km: Option<f64>,
}

/// Physical state of one body at one epoch.
///
/// Always in the authoritative frame's physical units, never display-scaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    /// km
    pub position: Vector3,
    /// km/s
    pub velocity: Vector3,
    /// Mean body radius, km.
    pub radius: f64,
    pub metadata: StateMetadata,
}

impl StateVector {
    /// Positive finite radius and finite position and velocity.
    pub fn is_physically_valid(&self) -> bool {
        self.radius.is_finite()
            && self.radius > 0.0
            && self.position.is_finite()
            && self.velocity.is_finite()
    }
}

/// Inclusive JD coverage of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_jd: f64,
    pub end_jd: f64,
}

impl TimeRange {
    pub const fn new(start_jd: f64, end_jd: f64) -> Self {
        Self { start_jd, end_jd }
    }

    pub fn contains(&self, jd: f64) -> bool {
        jd >= self.start_jd && jd <= self.end_jd
    }

    /// Finite bounds with `start < end`.
    pub fn is_well_formed(&self) -> bool {
        self.start_jd.is_finite() && self.end_jd.is_finite() && self.start_jd < self.end_jd
    }
}
