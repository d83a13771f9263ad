//! Central finite-difference velocity.
//!
//! Accuracy trade-off: the O(δ²) truncation error with δ = 1 h is well
//! below the analytic-model error of mean-element positions, and it works
//! for any position function, including composed parent + child chains.

use tracing::warn;

use crate::AU_KM;
use crate::vector::Vector3;
use orrery_time::SECONDS_PER_DAY;

/// Half-width of the central difference: one hour, in days.
pub const FINITE_DIFFERENCE_STEP_DAYS: f64 = 1.0 / 24.0;

/// Velocity in km/s from an AU-valued position function of JD.
///
/// `v = (pos(t + δ) − pos(t − δ)) / 2δ`, converted from AU/day to km/s.
/// Any non-finite result yields [`Vector3::ZERO`] instead of an error.
pub fn finite_difference_velocity<F>(mut position_au: F, julian_date: f64) -> Vector3
where
    F: FnMut(f64) -> Vector3,
{
    let delta = FINITE_DIFFERENCE_STEP_DAYS;
    let ahead = position_au(julian_date + delta);
    let behind = position_au(julian_date - delta);
    let au_per_day = (ahead - behind) / (2.0 * delta);
    let km_per_s = au_per_day * (AU_KM / SECONDS_PER_DAY);

    if km_per_s.is_finite() {
        km_per_s
    } else {
        warn!(julian_date, "finite-difference velocity not finite; reporting zero");
        Vector3::ZERO
    }
}
