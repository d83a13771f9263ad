//! Pure orbital-mechanics functions.
//!
//! Positions come from osculating elements with linear secular rates:
//! correct the elements to the query epoch, solve Kepler's equation,
//! place the body in its orbital plane, then rotate into the reference
//! frame with the 3-1-3 Euler sequence `(ω, i, Ω)`. Velocity is a central
//! finite difference of position, never an analytic derivative.
//!
//! Nothing here returns an error. Kepler non-convergence yields the last
//! iterate and a failed velocity yields the zero vector, both with a
//! `tracing` warning, so position delivery is never blocked.

pub mod elements;
pub mod kepler;
pub mod position;
pub mod rotation;
pub mod vector;
pub mod velocity;

pub use elements::{ElementRates, ElementSet, OrbitalElements};
pub use kepler::{
    DEFAULT_KEPLER_MAX_ITERATIONS, DEFAULT_KEPLER_TOLERANCE, KeplerSolution, solve_kepler,
    solve_kepler_detailed,
};
pub use position::{OrbitalPosition, calculate_position};
pub use rotation::orbital_plane_to_reference;
pub use vector::Vector3;
pub use velocity::{FINITE_DIFFERENCE_STEP_DAYS, finite_difference_velocity};

/// Astronomical unit in kilometres (IAU 2012 Resolution B2).
pub const AU_KM: f64 = 149_597_870.7;

/// Normalize an angle to [0, 2π) radians.
pub fn normalize_radians(angle: f64) -> f64 {
    let r = angle % std::f64::consts::TAU;
    if r < 0.0 { r + std::f64::consts::TAU } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn normalize_wraps_negative() {
        assert!((normalize_radians(-PI / 2.0) - 1.5 * PI).abs() < 1e-15);
    }

    #[test]
    fn normalize_wraps_full_turns() {
        assert!(normalize_radians(TAU).abs() < 1e-15);
        assert!((normalize_radians(5.0 * TAU + 1.0) - 1.0).abs() < 1e-12);
    }
}
