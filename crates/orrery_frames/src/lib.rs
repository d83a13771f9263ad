//! Reference-frame management.
//!
//! Exactly one [`FrameType::Authoritative`] frame exists per
//! [`ReferenceFrameManager`]; it is fixed at construction and can never be
//! replaced or removed. Presentation code may register
//! [`FrameType::DerivedDisplay`] frames in a separate table; those are
//! never used for physical computation.

pub mod frame;
pub mod manager;

pub use frame::{FrameType, HELIOCENTRIC_ECLIPTIC_J2000, ReferenceFrameInfo};
pub use manager::ReferenceFrameManager;
