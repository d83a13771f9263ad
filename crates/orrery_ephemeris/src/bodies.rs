//! Body catalogue for the analytic provider.
//!
//! Planetary elements and rates are the J2000 mean-element table of
//! Standish (JPL SSD, *Keplerian Elements for Approximate Positions of the
//! Major Planets*, Table 1, valid 1800–2050), heliocentric, ecliptic and
//! equinox of J2000. "earth" uses the Earth–Moon barycenter row. The Moon
//! uses geocentric mean elements (Meeus, *Astronomical Algorithms*,
//! Ch. 47) and is composed onto Earth's position.

use orrery_orbit::{AU_KM, ElementRates, OrbitalElements};
use serde::{Deserialize, Serialize};

pub const SUN: &str = "sun";
pub const MERCURY: &str = "mercury";
pub const VENUS: &str = "venus";
pub const EARTH: &str = "earth";
pub const MOON: &str = "moon";
pub const MARS: &str = "mars";
pub const JUPITER: &str = "jupiter";
pub const SATURN: &str = "saturn";
pub const URANUS: &str = "uranus";
pub const NEPTUNE: &str = "neptune";
pub const PLUTO: &str = "pluto";

/// One body known to a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDefinition {
    pub id: String,
    pub name: String,
    /// Body whose position the elements are relative to. `None` for the
    /// frame origin.
    #[serde(default)]
    pub parent: Option<String>,
    pub radius_km: f64,
    pub accuracy_km: f64,
    /// `None` places the body at its parent's position (or the origin).
    #[serde(default)]
    pub elements: Option<OrbitalElements>,
}

impl BodyDefinition {
    fn new(
        id: &str,
        name: &str,
        parent: Option<&str>,
        radius_km: f64,
        accuracy_km: f64,
        elements: Option<OrbitalElements>,
    ) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            parent: parent.map(str::to_owned),
            radius_km,
            accuracy_km,
            elements,
        }
    }
}

#[allow(clippy::too_many_arguments)]
const fn planet(
    a: f64,
    e: f64,
    i: f64,
    l: f64,
    w_bar: f64,
    o: f64,
    a_dot: f64,
    e_dot: f64,
    i_dot: f64,
    l_dot: f64,
    w_bar_dot: f64,
    o_dot: f64,
) -> OrbitalElements {
    OrbitalElements::j2000(
        a,
        e,
        i,
        l,
        w_bar,
        o,
        ElementRates {
            a: a_dot,
            e: e_dot,
            i: i_dot,
            mean_longitude: l_dot,
            lon_perihelion: w_bar_dot,
            lon_node: o_dot,
        },
    )
}

/// Mean Earth–Moon distance in AU.
const MOON_A_AU: f64 = 384_400.0 / AU_KM;

/// Sun, planets, Pluto and Moon.
pub fn solar_system() -> Vec<BodyDefinition> {
    vec![
        BodyDefinition::new(SUN, "Sun", None, 695_700.0, 1.0, None),
        BodyDefinition::new(
            MERCURY,
            "Mercury",
            Some(SUN),
            2_439.7,
            2_000.0,
            Some(planet(
                0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593,
                0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081,
            )),
        ),
        BodyDefinition::new(
            VENUS,
            "Venus",
            Some(SUN),
            6_051.8,
            3_000.0,
            Some(planet(
                0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255,
                0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418,
            )),
        ),
        BodyDefinition::new(
            EARTH,
            "Earth",
            Some(SUN),
            6_371.0,
            10_000.0,
            Some(planet(
                1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0,
                0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0,
            )),
        ),
        BodyDefinition::new(
            MOON,
            "Moon",
            Some(EARTH),
            1_737.4,
            15_000.0,
            Some(planet(
                MOON_A_AU, 0.0549, 5.145, 218.3164477, 83.3532465, 125.0445479,
                0.0, 0.0, 0.0, 481267.88123421, 4069.0137287, -1934.1362891,
            )),
        ),
        BodyDefinition::new(
            MARS,
            "Mars",
            Some(SUN),
            3_389.5,
            15_000.0,
            Some(planet(
                1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891,
                0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343,
            )),
        ),
        BodyDefinition::new(
            JUPITER,
            "Jupiter",
            Some(SUN),
            69_911.0,
            300_000.0,
            Some(planet(
                5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909,
                -0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106,
            )),
        ),
        BodyDefinition::new(
            SATURN,
            "Saturn",
            Some(SUN),
            58_232.0,
            800_000.0,
            Some(planet(
                9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448,
                -0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794,
            )),
        ),
        BodyDefinition::new(
            URANUS,
            "Uranus",
            Some(SUN),
            25_362.0,
            2_000_000.0,
            Some(planet(
                19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503,
                -0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589,
            )),
        ),
        BodyDefinition::new(
            NEPTUNE,
            "Neptune",
            Some(SUN),
            24_622.0,
            2_500_000.0,
            Some(planet(
                30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574,
                0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664,
            )),
        ),
        BodyDefinition::new(
            PLUTO,
            "Pluto",
            Some(SUN),
            1_188.3,
            4_000_000.0,
            Some(planet(
                39.48211675, 0.24882730, 17.14001206, 238.92903833, 224.06891629, 110.30393684,
                -0.00031596, 0.00005170, 0.00004818, 145.20780515, -0.04062942, -0.01183482,
            )),
        ),
    ]
}
