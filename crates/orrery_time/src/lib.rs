//! Time progression for the space-time core.
//!
//! This crate provides:
//! - Julian Date ↔ calendar conversions and J2000-relative helpers
//! - [`TimeContinuityConstraints`], the fixed policy bounding time changes
//! - [`TimeAuthority`], the sole owner and mutator of the current epoch,
//!   with a synchronous subscription channel

pub mod authority;
pub mod constraints;
pub mod julian;
pub mod subscription;

pub use authority::{TickOutcome, TimeAuthority};
pub use constraints::TimeContinuityConstraints;
pub use julian::{
    DAYS_PER_JULIAN_CENTURY, J2000_JD, SECONDS_PER_DAY, calendar_to_jd, jd_to_calendar,
    julian_centuries_since, julian_centuries_since_j2000,
};
pub use subscription::{SubscriberResult, Subscription};
