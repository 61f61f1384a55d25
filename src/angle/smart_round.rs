//! "Smart rounding" of raw spacings onto human-friendly values.
//!
//! Gridlines look best when they land on whole degrees that divide the
//! circle, whole arcminutes/arcseconds that divide the hour of arc, or
//! decimal fractions of an arcsecond. The candidate lists below are scanned
//! in ascending order and the first candidate with the smallest absolute
//! difference wins.

use crate::angle::SexagesimalAngle;
use crate::error::{Error, Result};

/// Divisors of 360.
const DIVISORS_360: [i64; 24] = [
    1, 2, 3, 4, 5, 6, 8, 9, 10, 12, 15, 18, 20, 24, 30, 36, 40, 45, 60, 72, 90, 120, 180, 360,
];
/// Divisors of 60.
const DIVISORS_60: [i64; 12] = [1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30, 60];
/// Divisors of 10.
const DIVISORS_10: [i64; 4] = [1, 2, 5, 10];

/// Smallest raw spacing accepted, in degrees (a nano-arcsecond).
const MIN_RAW_DEGREES: f64 = 1e-9 / 3600.0;

/// Candidate closest to `x`; ties go to the earlier (smaller) candidate.
fn closest(candidates: &[i64], x: f64) -> i64 {
    let mut best = candidates[0];
    let mut best_diff = (best as f64 - x).abs();
    for &c in &candidates[1..] {
        let diff = (c as f64 - x).abs();
        if diff < best_diff {
            best = c;
            best_diff = diff;
        }
    }
    best
}

fn check_raw(raw: f64, min: f64) -> Result<()> {
    if !raw.is_finite() || raw < min {
        return Err(Error::InvalidSpacing(format!(
            "cannot round a raw spacing of {raw}"
        )));
    }
    Ok(())
}

/// Round `x` (< 1) up through powers of ten onto `{1, 2, 5, 10} × 10⁻ⁿ`.
fn round_decimal_fraction(mut x: f64) -> f64 {
    let mut t = 1.0;
    loop {
        t *= 10.0;
        x *= 10.0;
        if x >= 1.0 {
            return closest(&DIVISORS_10, x) as f64 / t;
        }
    }
}

/// Round a raw angular increment (degrees) onto a sexagesimal-friendly
/// spacing.
///
/// With `hours` the rounding happens in units of time (the raw value is
/// divided by 15 first) and the result is scaled back by 15, so that a
/// spacing such as 1h = 15° or 2m = 30' is produced.
pub fn nice_spacing(raw: f64, is_latitude: bool, hours: bool) -> Result<SexagesimalAngle> {
    check_raw(raw, MIN_RAW_DEGREES)?;

    let mut x = if hours { raw / 15.0 } else { raw };
    let (mut d, mut m, mut s) = (0, 0, 0.0);

    if x >= 1.0 {
        d = closest(&DIVISORS_360, x);
    } else {
        x *= 60.0;
        if x >= 1.0 {
            m = closest(&DIVISORS_60, x);
        } else {
            x *= 60.0;
            if x >= 1.0 {
                s = closest(&DIVISORS_60, x) as f64;
            } else {
                s = round_decimal_fraction(x);
            }
        }
    }

    if hours {
        SexagesimalAngle::from_dms(d, m, s, false)?
            .scale(15)?
            .as_latitude(is_latitude)
    } else {
        SexagesimalAngle::from_dms(d, m, s, is_latitude)
    }
}

/// Round a raw increment (degrees) for decimal label formats such as
/// `ddd.dddd`: a divisor of 360 above one degree, `{1, 2, 5} × 10⁻ⁿ` below.
pub fn nice_decimal_spacing(raw: f64, is_latitude: bool) -> Result<SexagesimalAngle> {
    check_raw(raw, MIN_RAW_DEGREES)?;
    let degrees = if raw >= 1.0 {
        closest(&DIVISORS_360, raw) as f64
    } else {
        round_decimal_fraction(raw)
    };
    SexagesimalAngle::from_degrees(degrees, is_latitude)
}

/// Round a raw increment on a plain scalar axis onto `{1, 2, 5, 10} × 10ⁿ`.
pub fn nice_scalar_spacing(raw: f64) -> Result<f64> {
    check_raw(raw, f64::MIN_POSITIVE)?;
    let exponent = raw.log10().floor() as i32;
    let base = 10f64.powi(exponent);
    Ok(closest(&DIVISORS_10, raw / base) as f64 * base)
}
