//! Immutable degrees/minutes/seconds (or hours/minutes/seconds) angle.
//!
//! # Normalization
//!
//! Every constructor and arithmetic operation normalizes its result:
//!
//! 1. seconds are folded into `[0, 60)`, carrying into minutes,
//! 2. minutes are folded into `[0, 60)`, carrying into degrees,
//! 3. degrees are folded into `[0, 360)` (`[0, 24)` for hour angles).
//!
//! Latitudes are additionally folded into `[-90, 90]`: values in
//! `[270°, 360°)` are reflected and flagged negative, while values in the
//! band `(90°, 270°)` are rejected with [`Error::InvalidLatitude`]. An
//! excess of at most a micro-arcsecond over either pole snaps onto it. The
//! stored triple is then the magnitude and [`SexagesimalAngle::is_negative`]
//! carries the sign.

use std::fmt;

use crate::angle::{AnglePattern, Precision, Rounded};
use crate::error::{Error, Result};

/// Excess over a pole, in arcseconds, absorbed as rounding noise.
const POLE_TOLERANCE_ARCSEC: f64 = 1e-6;

/// Glyphs appended to the degree (hour), minute and second fields.
pub type Separators<'a> = (&'a str, &'a str, &'a str);

/// An angle stored as `(degrees, minutes, seconds)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SexagesimalAngle {
    degrees: i64,
    minutes: i64,
    seconds: f64,
    latitude: bool,
    negative: bool,
    hours: bool,
}

/// Fold a raw signed triple. Returns the normalized magnitude and sign.
fn normalize(
    degrees: i64,
    minutes: i64,
    seconds: f64,
    latitude: bool,
    hours: bool,
) -> Result<(i64, i64, f64, bool)> {
    // rem_euclid can return the modulus itself for tiny negative inputs
    let mut s = seconds.rem_euclid(60.0);
    let mut carry = ((seconds - s) / 60.0).round() as i64;
    if s >= 60.0 {
        s -= 60.0;
        carry += 1;
    }
    let s = s + 0.0; // -0.0 -> 0.0

    let m = minutes + carry;
    let mut d = degrees + m.div_euclid(60);
    let mut m = m.rem_euclid(60);
    let turn = if hours { 24 } else { 360 };
    d = d.rem_euclid(turn);

    if !latitude || hours {
        return Ok((d, m, s, false));
    }

    // snap values within the tolerance of either pole onto it
    if d == 90 && (m * 60) as f64 + s <= POLE_TOLERANCE_ARCSEC {
        return Ok((90, 0, 0.0, false));
    }
    if d == 269 && m == 59 && 60.0 - s <= POLE_TOLERANCE_ARCSEC {
        return Ok((90, 0, 0.0, true));
    }

    let beyond_pole = d > 90 || (d == 90 && (m > 0 || s > 0.0));
    if !beyond_pole {
        return Ok((d, m, s, false));
    }
    if d < 270 {
        return Err(Error::InvalidLatitude {
            degrees: d,
            minutes: m,
            seconds: s,
        });
    }

    d = 359 - d;
    m = 59 - m;
    let mut s = 60.0 - s;
    if s >= 60.0 {
        s -= 60.0;
        m += 1;
    }
    if m == 60 {
        m = 0;
        d += 1;
    }
    Ok((d, m, s, true))
}

impl SexagesimalAngle {
    fn build(degrees: i64, minutes: i64, seconds: f64, latitude: bool, hours: bool) -> Result<Self> {
        if !seconds.is_finite() {
            return Err(Error::NonFiniteAngle(seconds));
        }
        let (degrees, minutes, seconds, negative) =
            normalize(degrees, minutes, seconds, latitude, hours)?;
        Ok(Self {
            degrees,
            minutes,
            seconds,
            latitude,
            negative,
            hours,
        })
    }

    /// Construct from a decimal angle in degrees.
    ///
    /// The magnitude is split into whole degrees, whole minutes and
    /// fractional seconds; the sign is applied to all three fields before
    /// normalization, so `-10.5` becomes `349°30'` for a longitude and
    /// `-10°30'` for a latitude.
    pub fn from_degrees(value: f64, latitude: bool) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::NonFiniteAngle(value));
        }
        let magnitude = value.abs();
        let d = magnitude.trunc();
        let minutes = (magnitude - d) * 60.0;
        let m = minutes.trunc();
        let s = (minutes - m) * 60.0;

        let (d, m) = (d as i64, m as i64);
        if value < 0.0 {
            Self::build(-d, -m, -s, latitude, false)
        } else {
            Self::build(d, m, s, latitude, false)
        }
    }

    /// Construct from a raw `(degrees, minutes, seconds)` triple. The fields
    /// may be negative or out of range; they are normalized.
    pub fn from_dms(degrees: i64, minutes: i64, seconds: f64, latitude: bool) -> Result<Self> {
        Self::build(degrees, minutes, seconds, latitude, false)
    }

    /// Whole degrees (hours for an hour angle) of the magnitude.
    pub fn degrees(&self) -> i64 {
        self.degrees
    }

    /// Whole minutes of the magnitude.
    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    /// Seconds of the magnitude, in `[0, 60)`.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn is_latitude(&self) -> bool {
        self.latitude
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// `true` if the fields are hours/minutes/seconds of time.
    pub fn is_hours(&self) -> bool {
        self.hours
    }

    /// The triple with the sign applied to every field.
    fn signed(&self) -> (i64, i64, f64) {
        if self.negative {
            (-self.degrees, -self.minutes, -self.seconds)
        } else {
            (self.degrees, self.minutes, self.seconds)
        }
    }

    /// Decimal value in the angle's own unit (degrees, or hours for an
    /// hour angle).
    pub fn to_decimal(&self) -> f64 {
        let value = self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0;
        if self.negative {
            -value
        } else {
            value
        }
    }

    /// Decimal value in degrees.
    pub fn to_degrees(&self) -> f64 {
        if self.hours {
            self.to_decimal() * 15.0
        } else {
            self.to_decimal()
        }
    }

    /// Re-decompose into hours, minutes and seconds of time (1h = 15°,
    /// 1m = 15', 1s = 15"). Sign and latitude flag are preserved.
    pub fn to_hours(&self) -> Result<Self> {
        if self.hours {
            return Ok(*self);
        }
        let h = self.degrees / 15;
        let rd = self.degrees % 15;
        let m = self.minutes / 15 + rd * 4;
        let rm = self.minutes % 15;
        let s = self.seconds / 15.0 + (rm * 4) as f64;

        let mut angle = Self::build(h, m, s, self.latitude, true)?;
        angle.negative = self.negative;
        Ok(angle)
    }

    /// The same angle re-normalized with a different latitude flag.
    pub fn as_latitude(&self, latitude: bool) -> Result<Self> {
        let (d, m, s) = self.signed();
        Self::build(d, m, s, latitude, self.hours)
    }

    /// Sum of two angles. Mixed units are added in degrees and returned in
    /// the unit of `self`.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.hours != other.hours {
            let sum = Self::from_degrees(self.to_degrees() + other.to_degrees(), self.latitude)?;
            return if self.hours { sum.to_hours() } else { Ok(sum) };
        }
        let (d1, m1, s1) = self.signed();
        let (d2, m2, s2) = other.signed();
        Self::build(d1 + d2, m1 + m2, s1 + s2, self.latitude, self.hours)
    }

    /// Multiply every field by an integer factor, then renormalize.
    ///
    /// This is how a tick's integer world index is turned back into an
    /// absolute angle: `spacing.scale(index)`.
    pub fn scale(&self, factor: i64) -> Result<Self> {
        let (d, m, s) = self.signed();
        Self::build(d * factor, m * factor, s * factor as f64, self.latitude, self.hours)
    }

    /// Round to the given display precision, carrying 60 s into minutes and
    /// 60 m into degrees. A longitude that rounds up to a full turn wraps to 0.
    pub fn round_to(&self, precision: Precision) -> Rounded {
        let turn = if self.hours { 24 } else { 360 };
        let wrap = !self.latitude;
        let mut d = self.degrees;
        let mut m = self.minutes;

        match precision {
            Precision::Decimal(n) => {
                let scale = 10f64.powi(n as i32);
                let value = d as f64 + m as f64 / 60.0 + self.seconds / 3600.0;
                let mut rounded = (value * scale).round() / scale;
                if wrap && rounded >= turn as f64 {
                    rounded -= turn as f64;
                }
                Rounded::Decimal(rounded)
            }
            Precision::Minutes => {
                m = (m as f64 + self.seconds / 60.0).round() as i64;
                if m == 60 {
                    m = 0;
                    d += 1;
                }
                if wrap && d == turn {
                    d = 0;
                }
                Rounded::Minutes(d, m)
            }
            Precision::Seconds | Precision::DecimalSeconds(_) => {
                let n = match precision {
                    Precision::DecimalSeconds(n) => n,
                    _ => 0,
                };
                let scale = 10f64.powi(n as i32);
                let mut s = (self.seconds * scale).round() / scale;
                if s >= 60.0 {
                    s = 0.0;
                    m += 1;
                }
                if m == 60 {
                    m = 0;
                    d += 1;
                }
                if wrap && d == turn {
                    d = 0;
                }
                Rounded::Seconds(d, m, s)
            }
        }
    }

    /// Render the fields selected by `pattern` as separate strings, each
    /// followed by its separator. Latitudes carry an explicit `+`/`-` on the
    /// first field. A trailing `:` on the last field is dropped.
    pub fn format(&self, pattern: &AnglePattern, separators: Separators<'_>) -> Vec<String> {
        let (sep_d, sep_m, sep_s) = separators;
        let width = pattern.width;
        let mut fields = Vec::with_capacity(3);

        match self.round_to(pattern.precision) {
            Rounded::Decimal(value) => {
                let n = match pattern.precision {
                    Precision::Decimal(n) => n as usize,
                    _ => 0,
                };
                let w = if n > 0 { width + 1 + n } else { width };
                fields.push(format!("{:0w$.n$}{}", value, sep_d, w = w, n = n));
            }
            Rounded::Minutes(d, m) => {
                fields.push(format!("{:0w$}{}", d, sep_d, w = width));
                fields.push(format!("{:02}{}", m, sep_m));
            }
            Rounded::Seconds(d, m, s) => {
                fields.push(format!("{:0w$}{}", d, sep_d, w = width));
                fields.push(format!("{:02}{}", m, sep_m));
                match pattern.precision {
                    Precision::DecimalSeconds(n) => {
                        let n = n as usize;
                        fields.push(format!("{:0w$.n$}{}", s, sep_s, w = n + 3, n = n));
                    }
                    _ => fields.push(format!("{:02}{}", s as i64, sep_s)),
                }
            }
        }

        if let Some(last) = fields.last_mut() {
            if last.ends_with(':') {
                last.pop();
            }
        }
        if self.latitude {
            let sign = if self.negative { '-' } else { '+' };
            fields[0].insert(0, sign);
        }
        fields
    }

    /// Compare two angles in degrees within `tolerance_arcsec`.
    pub fn approx_eq(&self, other: &Self, tolerance_arcsec: f64) -> bool {
        let diff = (self.to_degrees() - other.to_degrees()).abs() * 3600.0;
        diff <= tolerance_arcsec || (diff - 360.0 * 3600.0).abs() <= tolerance_arcsec
    }
}

impl fmt::Display for SexagesimalAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern = AnglePattern {
            hours: self.hours,
            width: 2,
            precision: Precision::DecimalSeconds(2),
        };
        let separators = if self.hours {
            ("h", "m", "s")
        } else {
            ("\u{b0}", "'", "\"")
        };
        write!(f, "{}", self.format(&pattern, separators).concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DMS: Separators<'static> = ("\u{b0}", "'", "\"");

    fn pattern(text: &str) -> AnglePattern {
        text.parse().unwrap()
    }

    #[test]
    fn from_degrees_decomposes_fields() {
        let a = SexagesimalAngle::from_degrees(12.5125, false).unwrap();
        assert_eq!(a.degrees(), 12);
        assert_eq!(a.minutes(), 30);
        assert!((a.seconds() - 45.0).abs() < 1e-9, "seconds = {}", a.seconds());
        assert!(!a.is_negative());
    }

    #[test]
    fn negative_longitude_wraps() {
        let a = SexagesimalAngle::from_degrees(-10.5, false).unwrap();
        assert_eq!(a.degrees(), 349);
        assert_eq!(a.minutes(), 30);
        assert!(a.seconds().abs() < 1e-9);
        assert!((a.to_degrees() - 349.5).abs() < 1e-12);
    }

    #[test]
    fn negative_latitude_is_reflected() {
        let a = SexagesimalAngle::from_degrees(-10.5, true).unwrap();
        assert!(a.is_negative());
        assert_eq!(a.degrees(), 10);
        assert_eq!(a.minutes(), 30);
        assert!((a.to_degrees() + 10.5).abs() < 1e-9);
    }

    #[test]
    fn latitude_in_forbidden_band_fails() {
        let err = SexagesimalAngle::from_degrees(120.0, true).unwrap_err();
        assert!(matches!(err, Error::InvalidLatitude { degrees: 120, .. }));
        assert!(SexagesimalAngle::from_dms(90, 0, 1.0, true).is_err());
        assert!(SexagesimalAngle::from_dms(90, 0, 0.0, true).is_ok());
        assert!(SexagesimalAngle::from_dms(270, 0, 0.0, true).is_ok());
    }

    #[test]
    fn rounding_noise_at_the_poles_is_absorbed() {
        let north = SexagesimalAngle::from_dms(90, 0, 5.82e-11, true).unwrap();
        assert_eq!((north.degrees(), north.minutes(), north.seconds()), (90, 0, 0.0));
        assert!(!north.is_negative());

        let south = SexagesimalAngle::from_dms(269, 59, 60.0 - 1e-9, true).unwrap();
        assert_eq!((south.degrees(), south.minutes(), south.seconds()), (90, 0, 0.0));
        assert!(south.is_negative());

        // many small steps land on the pole with accumulated error
        let step = SexagesimalAngle::from_degrees(1e-5, true).unwrap();
        assert!((step.scale(9_000_000).unwrap().to_degrees() - 90.0).abs() < 1e-12);
        assert!((step.scale(-9_000_000).unwrap().to_degrees() + 90.0).abs() < 1e-12);
    }

    #[test]
    fn reflection_at_south_pole() {
        let a = SexagesimalAngle::from_dms(270, 0, 0.0, true).unwrap();
        assert!(a.is_negative());
        assert_eq!((a.degrees(), a.minutes()), (90, 0));
        assert!(a.seconds().abs() < 1e-12);
        assert!((a.to_degrees() + 90.0).abs() < 1e-12);
    }

    #[test]
    fn carries_out_of_range_fields() {
        let a = SexagesimalAngle::from_dms(10, 75, 90.0, false).unwrap();
        assert_eq!((a.degrees(), a.minutes()), (11, 16));
        assert!((a.seconds() - 30.0).abs() < 1e-12);

        let b = SexagesimalAngle::from_dms(0, 0, -30.0, false).unwrap();
        assert_eq!((b.degrees(), b.minutes()), (359, 59));
        assert!((b.seconds() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        assert!(matches!(
            SexagesimalAngle::from_degrees(f64::NAN, false),
            Err(Error::NonFiniteAngle(_))
        ));
        assert!(SexagesimalAngle::from_dms(0, 0, f64::INFINITY, false).is_err());
    }

    #[test]
    fn to_hours_redistributes_fields() {
        // 187.5° = 12h30m
        let a = SexagesimalAngle::from_degrees(187.5, false).unwrap().to_hours().unwrap();
        assert!(a.is_hours());
        assert_eq!((a.degrees(), a.minutes()), (12, 30));
        assert!(a.seconds().abs() < 1e-9);
        assert!((a.to_decimal() - 12.5).abs() < 1e-12);
        assert!((a.to_degrees() - 187.5).abs() < 1e-9);

        // 1' of arc = 4s of time
        let b = SexagesimalAngle::from_dms(0, 1, 0.0, false).unwrap().to_hours().unwrap();
        assert_eq!((b.degrees(), b.minutes()), (0, 0));
        assert!((b.seconds() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn to_hours_keeps_sign() {
        let a = SexagesimalAngle::from_degrees(-30.0, true).unwrap().to_hours().unwrap();
        assert!(a.is_negative());
        assert!(a.is_latitude());
        assert!((a.to_degrees() + 30.0).abs() < 1e-9);
    }

    #[test]
    fn scale_turns_index_into_angle() {
        let spacing = SexagesimalAngle::from_dms(0, 0, 15.0, false).unwrap();
        let a = spacing.scale(3001).unwrap();
        assert_eq!((a.degrees(), a.minutes()), (12, 30));
        assert!((a.seconds() - 15.0).abs() < 1e-9);

        let lat = SexagesimalAngle::from_dms(5, 0, 0.0, true).unwrap();
        let south = lat.scale(-3).unwrap();
        assert!(south.is_negative());
        assert!((south.to_degrees() + 15.0).abs() < 1e-12);
        assert!((south.scale(2).unwrap().to_degrees() + 30.0).abs() < 1e-12);
    }

    #[test]
    fn add_wraps_longitudes() {
        let a = SexagesimalAngle::from_degrees(350.0, false).unwrap();
        let b = SexagesimalAngle::from_degrees(20.0, false).unwrap();
        assert!((a.add(&b).unwrap().to_degrees() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn round_to_carries() {
        let a = SexagesimalAngle::from_dms(12, 59, 59.6, false).unwrap();
        assert_eq!(a.round_to(Precision::Seconds), Rounded::Seconds(13, 0, 0.0));
        assert_eq!(a.round_to(Precision::Minutes), Rounded::Minutes(13, 0));
        assert_eq!(a.round_to(Precision::DecimalSeconds(1)), Rounded::Seconds(12, 59, 59.6));

        let wrap = SexagesimalAngle::from_dms(359, 59, 59.9, false).unwrap();
        assert_eq!(wrap.round_to(Precision::Seconds), Rounded::Seconds(0, 0, 0.0));
        match wrap.round_to(Precision::Decimal(2)) {
            Rounded::Decimal(v) => assert!(v.abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn format_fields_and_sign() {
        let a = SexagesimalAngle::from_dms(5, 3, 7.25, true).unwrap();
        assert_eq!(a.format(&pattern("dd:mm:ss.ss"), DMS), vec!["+05\u{b0}", "03'", "07.25\""]);

        let b = SexagesimalAngle::from_degrees(-5.5, true).unwrap();
        assert_eq!(b.format(&pattern("dd:mm"), (":", ":", "")), vec!["-05:", "30"]);

        let c = SexagesimalAngle::from_degrees(123.456789, false).unwrap();
        assert_eq!(c.format(&pattern("ddd.dddd"), DMS), vec!["123.4568\u{b0}"]);
        assert_eq!(c.format(&pattern("ddd"), (":", ":", "")), vec!["123"]);
    }

    #[test]
    fn display_uses_letters_for_hours() {
        let a = SexagesimalAngle::from_degrees(187.5, false).unwrap();
        assert_eq!(a.to_string(), "187\u{b0}30'00.00\"");
        assert_eq!(a.to_hours().unwrap().to_string(), "12h30m00.00s");
    }

    #[test]
    fn approx_eq_handles_wrap() {
        let a = SexagesimalAngle::from_degrees(0.0, false).unwrap();
        let b = SexagesimalAngle::from_degrees(359.99999999, false).unwrap();
        assert!(a.approx_eq(&b, 0.001));
    }

    fn normalized_fields(a: &SexagesimalAngle) -> (i64, i64, f64, bool) {
        (a.degrees(), a.minutes(), a.seconds(), a.is_negative())
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(
            d in -1000i64..1000,
            m in -500i64..500,
            s in -5000.0..5000.0f64,
        ) {
            let once = SexagesimalAngle::from_dms(d, m, s, false).unwrap();
            let twice = SexagesimalAngle::from_dms(once.degrees(), once.minutes(), once.seconds(), false).unwrap();
            prop_assert_eq!(normalized_fields(&once), normalized_fields(&twice));
            prop_assert!(once.seconds() >= 0.0 && once.seconds() < 60.0);
            prop_assert!(once.minutes() >= 0 && once.minutes() < 60);
            prop_assert!(once.degrees() >= 0 && once.degrees() < 360);
        }

        #[test]
        fn prop_latitude_normalize_is_idempotent(value in -90.0..=90.0f64) {
            let once = SexagesimalAngle::from_degrees(value, true).unwrap();
            let again = once.as_latitude(true).unwrap();
            prop_assert_eq!(once.is_negative(), again.is_negative());
            prop_assert!(once.approx_eq(&again, 1e-6));
            prop_assert!(again.seconds() >= 0.0 && again.seconds() < 60.0);
        }

        #[test]
        fn prop_longitude_roundtrip(value in 0.0..360.0f64) {
            let a = SexagesimalAngle::from_degrees(value, false).unwrap();
            prop_assert!((a.to_degrees() - value).abs() < 1e-9);
        }

        #[test]
        fn prop_latitude_roundtrip(value in -90.0..=90.0f64) {
            let a = SexagesimalAngle::from_degrees(value, true).unwrap();
            prop_assert!((a.to_degrees() - value).abs() < 1e-9);
        }
    }
}
