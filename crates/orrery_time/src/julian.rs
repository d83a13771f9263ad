//! Julian Date arithmetic.
//!
//! Calendar conversions follow Meeus, *Astronomical Algorithms* (2nd ed.),
//! Chapter 7, using the Gregorian calendar from 1582-Oct-15 onward and the
//! Julian calendar before it.

/// Julian Date of the J2000.0 epoch (2000-Jan-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Days in one Julian century.
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// First Julian Day number of the Gregorian calendar (1582-Oct-15).
const GREGORIAN_START_JDN: f64 = 2_299_161.0;

/// Julian centuries elapsed from `epoch_jd` to `jd`.
pub fn julian_centuries_since(jd: f64, epoch_jd: f64) -> f64 {
    (jd - epoch_jd) / DAYS_PER_JULIAN_CENTURY
}

/// Julian centuries elapsed since J2000.0.
pub fn julian_centuries_since_j2000(jd: f64) -> f64 {
    julian_centuries_since(jd, J2000_JD)
}

/// Convert a calendar date to a Julian Date.
///
/// `day` may carry a fractional part (e.g. `1.5` is noon on the 1st).
/// Dates before 1582-Oct-15 are interpreted in the Julian calendar.
pub fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };

    let julian =
        (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day - 1524.5;

    let gregorian = year > 1582
        || (year == 1582 && (month > 10 || (month == 10 && day >= 15.0)));
    if gregorian {
        let a = (y / 100.0).floor();
        let b = 2.0 - a + (a / 4.0).floor();
        julian + b
    } else {
        julian
    }
}

/// Convert a Julian Date to `(year, month, fractional_day)`.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let shifted = jd + 0.5;
    let z = shifted.floor();
    let f = shifted - z;

    let a = if z < GREGORIAN_START_JDN {
        z
    } else {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };

    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

    (year as i32, month as u32, day)
}
