//! Frame descriptors.

use orrery_error::{Result, SpaceTimeError};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Id of the default authoritative frame.
pub const HELIOCENTRIC_ECLIPTIC_J2000: &str = "HELIOCENTRIC_ECLIPTIC_J2000";

/// Role of a frame in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameType {
    /// The single physical ground-truth frame.
    Authoritative,
    /// Presentation-only transform.
    DerivedDisplay,
}

/// Description of a coordinate frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceFrameInfo {
    pub frame_id: String,
    pub name: String,
    /// Body or point at the frame origin.
    pub origin: String,
    /// Axis convention, e.g. "ECLIPTIC_J2000".
    pub axes: String,
    #[serde(rename = "type")]
    pub frame_type: FrameType,
    pub position_unit: String,
    pub velocity_unit: String,
    pub time_unit: String,
}

impl ReferenceFrameInfo {
    /// Sun-centred, ecliptic and equinox of J2000, km / km·s⁻¹ / JD.
    pub fn heliocentric_ecliptic_j2000() -> Self {
        Self {
            frame_id: HELIOCENTRIC_ECLIPTIC_J2000.to_owned(),
            name: "Heliocentric Ecliptic J2000".to_owned(),
            origin: "sun".to_owned(),
            axes: "ECLIPTIC_J2000".to_owned(),
            frame_type: FrameType::Authoritative,
            position_unit: "km".to_owned(),
            velocity_unit: "km/s".to_owned(),
            time_unit: "JD".to_owned(),
        }
    }

    /// A display frame with the authoritative units.
    pub fn derived_display(
        frame_id: impl Into<String>,
        name: impl Into<String>,
        origin: impl Into<String>,
        axes: impl Into<String>,
    ) -> Self {
        Self {
            frame_id: frame_id.into(),
            name: name.into(),
            origin: origin.into(),
            axes: axes.into(),
            frame_type: FrameType::DerivedDisplay,
            position_unit: "km".to_owned(),
            velocity_unit: "km/s".to_owned(),
            time_unit: "JD".to_owned(),
        }
    }

    pub fn is_authoritative(&self) -> bool {
        self.frame_type == FrameType::Authoritative
    }

    /// Every descriptive field must be non-blank.
    pub fn validate_fields(&self) -> Result<()> {
        let fields = [
            ("frame_id", &self.frame_id),
            ("name", &self.name),
            ("origin", &self.origin),
            ("axes", &self.axes),
            ("position_unit", &self.position_unit),
            ("velocity_unit", &self.velocity_unit),
            ("time_unit", &self.time_unit),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(SpaceTimeError::invalid_configuration(format!(
                    "frame field '{field}' must not be blank"
                ))
                .with_details(serde_json::json!({ "field": field })));
            }
        }
        Ok(())
    }
}
