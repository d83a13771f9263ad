//! Presentation-facing boundary of the space-time core.
//!
//! Presentation code receives a [`PresentationView`] and programs against
//! [`ReadOnlyApi`]; the administrative surface of
//! [`orrery_core::SpaceTimeCore`] is not reachable through it. The
//! [`validator`] module gives the same allow/deny answer as a pure function.

pub mod validator;
pub mod view;

pub use validator::{
    AccessDecision, CoreOperation, validate_operation_name, validate_presentation_access,
};
pub use view::{PresentationView, ReadOnlyApi, TimeCallback};
