//! Sexagesimal and decimal angle display patterns.
//!
//! Patterns are written with one letter per digit: `d` for degrees, `h` for
//! hours, `m` for minutes and `s` for seconds, e.g. `dd:mm:ss.ss`,
//! `hh:mm:ss`, `ddd.dddd`. The number of leading `d`/`h` characters sets the
//! zero-padded width of the first field; the number of fractional characters
//! sets the number of decimals.

use std::fmt;
use std::str::FromStr;

use crate::angle::SexagesimalAngle;
use crate::error::{Error, Result};

/// Largest number of decimals accepted in a pattern.
const MAX_DECIMALS: usize = 9;

/// Which fields of an angle are displayed, and how finely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    /// Decimal degrees (or hours) with the given number of decimals.
    Decimal(u8),
    /// Degrees and whole minutes.
    Minutes,
    /// Degrees, minutes and whole seconds.
    Seconds,
    /// Degrees, minutes and seconds with the given number of decimals.
    DecimalSeconds(u8),
}

impl Precision {
    /// Smallest step representable at this precision, in units of the first
    /// field (degrees or hours).
    pub fn step(&self) -> f64 {
        match *self {
            Precision::Decimal(n) => 10f64.powi(-(n as i32)),
            Precision::Minutes => 1.0 / 60.0,
            Precision::Seconds => 1.0 / 3600.0,
            Precision::DecimalSeconds(n) => 10f64.powi(-(n as i32)) / 3600.0,
        }
    }

    /// Number of displayed fields.
    pub fn fields(&self) -> usize {
        match self {
            Precision::Decimal(_) => 1,
            Precision::Minutes => 2,
            Precision::Seconds | Precision::DecimalSeconds(_) => 3,
        }
    }
}

/// Result of [`SexagesimalAngle::round_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rounded {
    /// Decimal value of the first field.
    Decimal(f64),
    /// `(degrees, minutes)`.
    Minutes(i64, i64),
    /// `(degrees, minutes, seconds)`; seconds are already rounded.
    Seconds(i64, i64, f64),
}

/// A parsed angle display pattern such as `hh:mm:ss.ss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnglePattern {
    /// `true` when the first field is hours (`hh…`).
    pub hours: bool,
    /// Zero-padded width of the first field.
    pub width: usize,
    /// Displayed fields and decimals.
    pub precision: Precision,
}

impl AnglePattern {
    /// Smallest angle this pattern can display faithfully, in degrees.
    ///
    /// For hour patterns one unit of the last field is 15 times larger
    /// than the matching degree unit.
    pub fn min_spacing_degrees(&self) -> f64 {
        let step = self.precision.step();
        if self.hours {
            step * 15.0
        } else {
            step
        }
    }

    /// [`Self::min_spacing_degrees`] as a (longitude) sexagesimal angle.
    pub fn min_spacing(&self) -> Result<SexagesimalAngle> {
        let angle = match self.precision {
            Precision::Decimal(_) => SexagesimalAngle::from_degrees(self.precision.step(), false)?,
            Precision::Minutes => SexagesimalAngle::from_dms(0, 1, 0.0, false)?,
            Precision::Seconds => SexagesimalAngle::from_dms(0, 0, 1.0, false)?,
            Precision::DecimalSeconds(n) => {
                SexagesimalAngle::from_dms(0, 0, 10f64.powi(-(n as i32)), false)?
            }
        };
        if self.hours {
            angle.scale(15)
        } else {
            Ok(angle)
        }
    }

    /// `true` for `ddd.dddd`-style patterns.
    pub fn is_decimal(&self) -> bool {
        matches!(self.precision, Precision::Decimal(_))
    }
}

impl FromStr for AnglePattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidFormat(s.to_string());

        let hours = s.contains('h');
        if hours && s.contains('d') {
            return Err(invalid());
        }
        let normalized = s.replace('h', "d");

        let (head, frac) = match normalized.split_once('.') {
            Some((head, frac)) => (head, Some(frac)),
            None => (normalized.as_str(), None),
        };
        if let Some(frac) = frac {
            if frac.is_empty() || frac.len() > MAX_DECIMALS {
                return Err(invalid());
            }
        }

        let parts: Vec<&str> = head.split(':').collect();
        let lead = parts[0];
        if lead.is_empty() || !lead.chars().all(|c| c == 'd') {
            return Err(invalid());
        }

        let precision = match (parts.as_slice(), frac) {
            ([_], None) => Precision::Decimal(0),
            ([_], Some(frac)) if frac.chars().all(|c| c == 'd') => {
                Precision::Decimal(frac.len() as u8)
            }
            ([_, "mm"], None) => Precision::Minutes,
            ([_, "mm", "ss"], None) => Precision::Seconds,
            ([_, "mm", "ss"], Some(frac)) if frac.chars().all(|c| c == 's') => {
                Precision::DecimalSeconds(frac.len() as u8)
            }
            _ => return Err(invalid()),
        };

        Ok(Self {
            hours,
            width: lead.len(),
            precision,
        })
    }
}

impl fmt::Display for AnglePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = if self.hours { "h" } else { "d" };
        write!(f, "{}", c.repeat(self.width))?;
        match self.precision {
            Precision::Decimal(0) => Ok(()),
            Precision::Decimal(n) => write!(f, ".{}", c.repeat(n as usize)),
            Precision::Minutes => write!(f, ":mm"),
            Precision::Seconds => write!(f, ":mm:ss"),
            Precision::DecimalSeconds(n) => write!(f, ":mm:ss.{}", "s".repeat(n as usize)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sexagesimal_patterns() {
        let p: AnglePattern = "dd:mm:ss.ss".parse().unwrap();
        assert!(!p.hours);
        assert_eq!(p.width, 2);
        assert_eq!(p.precision, Precision::DecimalSeconds(2));

        let p: AnglePattern = "hh:mm:ss".parse().unwrap();
        assert!(p.hours);
        assert_eq!(p.precision, Precision::Seconds);

        let p: AnglePattern = "ddd:mm".parse().unwrap();
        assert_eq!(p.width, 3);
        assert_eq!(p.precision, Precision::Minutes);
    }

    #[test]
    fn parse_decimal_patterns() {
        let p: AnglePattern = "ddd.dddd".parse().unwrap();
        assert_eq!(p.precision, Precision::Decimal(4));
        assert!(p.is_decimal());

        let p: AnglePattern = "hh.hh".parse().unwrap();
        assert!(p.hours);
        assert_eq!(p.precision, Precision::Decimal(2));

        let p: AnglePattern = "dd".parse().unwrap();
        assert_eq!(p.precision, Precision::Decimal(0));
    }

    #[test]
    fn reject_malformed_patterns() {
        for bad in ["", "dd:ss", "dd:mm:ss.dd", "hd:mm", "dd.", "xx", "dd:mm.mm", "dd:mm:ss:ss"] {
            assert!(
                matches!(bad.parse::<AnglePattern>(), Err(Error::InvalidFormat(_))),
                "pattern {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn display_roundtrips_pattern() {
        for text in ["dd:mm:ss.ss", "hh:mm:ss", "ddd.dddd", "dd:mm", "hh"] {
            let p: AnglePattern = text.parse().unwrap();
            assert_eq!(p.to_string(), text);
        }
    }

    #[test]
    fn min_spacing_for_hours_is_fifteen_times_larger() {
        let deg: AnglePattern = "dd:mm:ss".parse().unwrap();
        let hrs: AnglePattern = "hh:mm:ss".parse().unwrap();
        assert!((deg.min_spacing_degrees() - 1.0 / 3600.0).abs() < 1e-15);
        assert!((hrs.min_spacing_degrees() - 15.0 / 3600.0).abs() < 1e-15);

        let angle = hrs.min_spacing().unwrap();
        assert!((angle.to_degrees() - 15.0 / 3600.0).abs() < 1e-12);
    }
}
