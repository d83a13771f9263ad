//! Orbital-plane to reference-frame rotation.

use crate::vector::Vector3;

/// Rotate orbital-plane coordinates `(x', y', 0)` into the reference frame.
///
/// Applies the 3-1-3 Euler sequence `R_z(−Ω) · R_x(−i) · R_z(−ω)`, where
/// `w` is the argument of perihelion, `i` the inclination and `o` the
/// longitude of the ascending node, all in radians.
pub fn orbital_plane_to_reference(x_orb: f64, y_orb: f64, w: f64, i: f64, o: f64) -> Vector3 {
    let (sin_w, cos_w) = w.sin_cos();
    let (sin_i, cos_i) = i.sin_cos();
    let (sin_o, cos_o) = o.sin_cos();

    let x = (cos_w * cos_o - sin_w * sin_o * cos_i) * x_orb
        + (-sin_w * cos_o - cos_w * sin_o * cos_i) * y_orb;
    let y = (cos_w * sin_o + sin_w * cos_o * cos_i) * x_orb
        + (-sin_w * sin_o + cos_w * cos_o * cos_i) * y_orb;
    let z = (sin_w * sin_i) * x_orb + (cos_w * sin_i) * y_orb;

    Vector3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn identity_when_all_angles_zero() {
        let v = orbital_plane_to_reference(1.5, -0.5, 0.0, 0.0, 0.0);
        assert_eq!(v, Vector3::new(1.5, -0.5, 0.0));
    }

    #[test]
    fn node_rotation_about_z() {
        let v = orbital_plane_to_reference(1.0, 0.0, 0.0, 0.0, FRAC_PI_2);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-15);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn polar_orbit_lifts_y_into_z() {
        let v = orbital_plane_to_reference(0.0, 1.0, 0.0, FRAC_PI_2, 0.0);
        assert_relative_eq!(v.z, 1.0, epsilon = 1e-15);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn rotation_preserves_length() {
        let v = orbital_plane_to_reference(0.7, -1.3, 1.1, 0.4, 2.9);
        assert_relative_eq!(v.magnitude(), (0.7_f64.powi(2) + 1.3_f64.powi(2)).sqrt(), epsilon = 1e-14);
    }
}
