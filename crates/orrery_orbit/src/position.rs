//! Heliocentric position from osculating elements.

use tracing::warn;

use crate::elements::OrbitalElements;
use crate::kepler::{DEFAULT_KEPLER_MAX_ITERATIONS, DEFAULT_KEPLER_TOLERANCE, solve_kepler_detailed};
use crate::normalize_radians;
use crate::rotation::orbital_plane_to_reference;
use crate::vector::Vector3;

/// Position in the elements' native length unit (AU) plus orbital radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Distance from the focus, `a(1 − e·cos E)`.
    pub r: f64,
}

impl OrbitalPosition {
    pub fn vector(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// Evaluate `elements` at `julian_date`.
pub fn calculate_position(elements: &OrbitalElements, julian_date: f64) -> OrbitalPosition {
    let el = elements.at_julian_date(julian_date);
    let w = el.arg_perihelion();
    let m = normalize_radians(el.mean_longitude - el.lon_perihelion);

    let solution = solve_kepler_detailed(
        m,
        el.e,
        DEFAULT_KEPLER_TOLERANCE,
        DEFAULT_KEPLER_MAX_ITERATIONS,
    );
    if !solution.converged {
        warn!(
            julian_date,
            eccentricity = el.e,
            mean_anomaly = m,
            iterations = solution.iterations,
            "kepler solver did not converge; using last iterate"
        );
    }
    let ea = solution.eccentric_anomaly;

    let nu = 2.0
        * ((1.0 + el.e).sqrt() * (ea / 2.0).sin()).atan2((1.0 - el.e).sqrt() * (ea / 2.0).cos());
    let r = el.a * (1.0 - el.e * ea.cos());

    let p = orbital_plane_to_reference(r * nu.cos(), r * nu.sin(), w, el.i, el.lon_node);
    OrbitalPosition {
        x: p.x,
        y: p.y,
        z: p.z,
        r,
    }
}
