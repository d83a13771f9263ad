//! Osculating orbital elements with secular rates.
//!
//! Angles are stored in degrees and rates per Julian century, matching the
//! published mean-element tables (Standish, *Keplerian Elements for
//! Approximate Positions of the Major Planets*). [`OrbitalElements::at_centuries`]
//! returns the corrected set in radians, ready for the solver.

use orrery_time::{J2000_JD, julian_centuries_since};
use serde::{Deserialize, Serialize};

/// Per-century secular rates for each element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementRates {
    /// AU per century.
    pub a: f64,
    /// Per century.
    pub e: f64,
    /// Degrees per century.
    pub i: f64,
    /// Degrees per century.
    pub mean_longitude: f64,
    /// Degrees per century.
    pub lon_perihelion: f64,
    /// Degrees per century.
    pub lon_node: f64,
}

/// Elements at a reference epoch plus their secular rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis (AU).
    pub a: f64,
    /// Eccentricity.
    pub e: f64,
    /// Inclination (deg).
    pub i: f64,
    /// Mean longitude L (deg).
    pub mean_longitude: f64,
    /// Longitude of perihelion ϖ (deg).
    pub lon_perihelion: f64,
    /// Longitude of the ascending node Ω (deg).
    pub lon_node: f64,
    pub rates: ElementRates,
    /// Reference epoch of the base values (JD).
    #[serde(default = "default_epoch")]
    pub epoch_jd: f64,
}

fn default_epoch() -> f64 {
    J2000_JD
}

/// Element values at one instant, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementSet {
    pub a: f64,
    pub e: f64,
    pub i: f64,
    pub mean_longitude: f64,
    pub lon_perihelion: f64,
    pub lon_node: f64,
}

impl ElementSet {
    /// Argument of perihelion ω = ϖ − Ω.
    pub fn arg_perihelion(&self) -> f64 {
        self.lon_perihelion - self.lon_node
    }
}

impl OrbitalElements {
    /// J2000 elements with the given rates.
    #[allow(clippy::too_many_arguments)]
    pub const fn j2000(
        a: f64,
        e: f64,
        i: f64,
        mean_longitude: f64,
        lon_perihelion: f64,
        lon_node: f64,
        rates: ElementRates,
    ) -> Self {
        Self {
            a,
            e,
            i,
            mean_longitude,
            lon_perihelion,
            lon_node,
            rates,
            epoch_jd: J2000_JD,
        }
    }

    /// Julian centuries from the reference epoch to `jd`.
    pub fn centuries_at(&self, jd: f64) -> f64 {
        julian_centuries_since(jd, self.epoch_jd)
    }

    /// Apply the linear secular correction `base + rate·t` to every element.
    ///
    /// `t` is Julian centuries since the elements' reference epoch.
    pub fn at_centuries(&self, t: f64) -> ElementSet {
        let r = &self.rates;
        ElementSet {
            a: self.a + r.a * t,
            e: self.e + r.e * t,
            i: (self.i + r.i * t).to_radians(),
            mean_longitude: (self.mean_longitude + r.mean_longitude * t).to_radians(),
            lon_perihelion: (self.lon_perihelion + r.lon_perihelion * t).to_radians(),
            lon_node: (self.lon_node + r.lon_node * t).to_radians(),
        }
    }

    /// Corrected elements at `jd`.
    pub fn at_julian_date(&self, jd: f64) -> ElementSet {
        self.at_centuries(self.centuries_at(jd))
    }

    /// Structural sanity: finite values, bound elliptical orbit.
    pub fn is_well_formed(&self) -> bool {
        let finite = [
            self.a,
            self.e,
            self.i,
            self.mean_longitude,
            self.lon_perihelion,
            self.lon_node,
            self.rates.a,
            self.rates.e,
            self.rates.i,
            self.rates.mean_longitude,
            self.rates.lon_perihelion,
            self.rates.lon_node,
            self.epoch_jd,
        ]
        .iter()
        .all(|v| v.is_finite());
        finite && self.a > 0.0 && (0.0..1.0).contains(&self.e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> OrbitalElements {
        OrbitalElements::j2000(
            1.0,
            0.1,
            2.0,
            100.0,
            90.0,
            30.0,
            ElementRates {
                a: 0.01,
                e: -0.001,
                i: 0.5,
                mean_longitude: 36_000.0,
                lon_perihelion: 1.0,
                lon_node: -1.0,
            },
        )
    }

    #[test]
    fn zero_centuries_returns_base_in_radians() {
        let set = sample().at_centuries(0.0);
        assert_eq!(set.a, 1.0);
        assert_eq!(set.e, 0.1);
        assert_relative_eq!(set.i, 2.0_f64.to_radians());
        assert_relative_eq!(set.arg_perihelion(), 60.0_f64.to_radians(), epsilon = 1e-15);
    }

    #[test]
    fn linear_correction() {
        let set = sample().at_centuries(2.0);
        assert_relative_eq!(set.a, 1.02);
        assert_relative_eq!(set.e, 0.098);
        assert_relative_eq!(set.i, 3.0_f64.to_radians());
        assert_relative_eq!(set.mean_longitude, 72_100.0_f64.to_radians());
        assert_relative_eq!(set.lon_node, 28.0_f64.to_radians());
    }

    #[test]
    fn centuries_from_epoch() {
        let el = sample();
        assert_eq!(el.centuries_at(J2000_JD), 0.0);
        assert_relative_eq!(el.centuries_at(J2000_JD - 36_525.0), -1.0);
    }

    #[test]
    fn hyperbolic_is_not_well_formed() {
        let mut el = sample();
        assert!(el.is_well_formed());
        el.e = 1.2;
        assert!(!el.is_well_formed());
        el.e = 0.1;
        el.a = f64::NAN;
        assert!(!el.is_well_formed());
    }
}
