//! Authoritative-frame singleton plus the derived display table.

use indexmap::IndexMap;
use orrery_error::{ErrorCode, Result, SpaceTimeError};
use serde_json::json;
use tracing::debug;

use crate::frame::{FrameType, ReferenceFrameInfo};

/// Owns exactly one authoritative frame and any number of derived frames.
#[derive(Debug, Clone)]
pub struct ReferenceFrameManager {
    primary_frame_id: String,
    authoritative: ReferenceFrameInfo,
    derived: IndexMap<String, ReferenceFrameInfo>,
}

impl ReferenceFrameManager {
    /// Build around `authoritative`, which becomes the configured primary.
    pub fn new(authoritative: ReferenceFrameInfo) -> Result<Self> {
        let primary = authoritative.frame_id.clone();
        Self::with_primary(&primary, authoritative)
    }

    /// Build around `authoritative`, checking it against the configured
    /// primary id.
    pub fn with_primary(primary_frame_id: &str, authoritative: ReferenceFrameInfo) -> Result<Self> {
        authoritative.validate_fields()?;
        if !authoritative.is_authoritative() {
            return Err(SpaceTimeError::invalid_configuration(format!(
                "frame '{}' is not authoritative",
                authoritative.frame_id
            )));
        }
        if authoritative.frame_id != primary_frame_id {
            return Err(SpaceTimeError::invalid_configuration(format!(
                "frame '{}' does not match configured primary '{primary_frame_id}'",
                authoritative.frame_id
            ))
            .with_details(json!({
                "frameId": authoritative.frame_id,
                "primaryFrameId": primary_frame_id,
            })));
        }
        Ok(Self {
            primary_frame_id: primary_frame_id.to_owned(),
            authoritative,
            derived: IndexMap::new(),
        })
    }

    pub fn authoritative_frame(&self) -> &ReferenceFrameInfo {
        &self.authoritative
    }

    pub fn primary_frame_id(&self) -> &str {
        &self.primary_frame_id
    }

    /// Register a display frame.
    pub fn add_derived_frame(&mut self, frame: ReferenceFrameInfo) -> Result<()> {
        if frame.frame_type == FrameType::Authoritative {
            return Err(SpaceTimeError::new(
                ErrorCode::MultipleAuthoritativeFrames,
                format!(
                    "'{}' is authoritative; '{}' already holds that role",
                    frame.frame_id, self.authoritative.frame_id
                ),
            ));
        }
        frame.validate_fields()?;
        if self.has_frame(&frame.frame_id) {
            return Err(SpaceTimeError::invalid_configuration(format!(
                "frame id '{}' already registered",
                frame.frame_id
            )));
        }
        debug!(frame_id = %frame.frame_id, "derived frame added");
        self.derived.insert(frame.frame_id.clone(), frame);
        Ok(())
    }

    /// Remove a display frame, returning its descriptor.
    pub fn remove_derived_frame(&mut self, frame_id: &str) -> Result<ReferenceFrameInfo> {
        if frame_id == self.authoritative.frame_id {
            return Err(SpaceTimeError::unauthorized("removeDerivedFrame")
                .with_details(json!({ "frameId": frame_id })));
        }
        match self.derived.shift_remove(frame_id) {
            Some(frame) => {
                debug!(frame_id, "derived frame removed");
                Ok(frame)
            }
            None => Err(SpaceTimeError::invalid_configuration(format!(
                "unknown frame id '{frame_id}'"
            ))),
        }
    }

    /// Exactly one authoritative frame exists and it is the configured primary.
    pub fn validate_phase1_constraints(&self) -> Result<()> {
        let authoritative_count = self.all_frames().filter(|f| f.is_authoritative()).count();
        if authoritative_count != 1 {
            return Err(SpaceTimeError::new(
                ErrorCode::MultipleAuthoritativeFrames,
                format!("{authoritative_count} authoritative frames present"),
            ));
        }
        if self.authoritative.frame_id != self.primary_frame_id {
            return Err(SpaceTimeError::invalid_configuration(format!(
                "authoritative frame '{}' differs from primary '{}'",
                self.authoritative.frame_id, self.primary_frame_id
            )));
        }
        Ok(())
    }

    pub fn frame_by_id(&self, frame_id: &str) -> Option<&ReferenceFrameInfo> {
        if frame_id == self.authoritative.frame_id {
            Some(&self.authoritative)
        } else {
            self.derived.get(frame_id)
        }
    }

    pub fn frame_type(&self, frame_id: &str) -> Option<FrameType> {
        self.frame_by_id(frame_id).map(|f| f.frame_type)
    }

    pub fn has_frame(&self, frame_id: &str) -> bool {
        self.frame_by_id(frame_id).is_some()
    }

    /// Derived frames in registration order.
    pub fn derived_frames(&self) -> impl Iterator<Item = &ReferenceFrameInfo> {
        self.derived.values()
    }

    /// Authoritative frame first, then derived frames.
    pub fn all_frames(&self) -> impl Iterator<Item = &ReferenceFrameInfo> {
        std::iter::once(&self.authoritative).chain(self.derived.values())
    }
}
