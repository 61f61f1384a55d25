//! Label format strings and label styles.

use std::fmt;
use std::str::FromStr;

use crate::angle::{AnglePattern, Precision, Separators};
use crate::error::{Error, Result};
use crate::projection::{CelestialFrame, CoordKind};

/// Largest number of decimals accepted in a scalar format.
const MAX_DECIMALS: u8 = 9;

/// printf-style number format for scalar axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarFormat {
    /// `%.Nf` (`%d` is `Fixed(0)`).
    Fixed(u8),
    /// `%.Ne`.
    Exponential(u8),
    /// `%g`: six significant digits, trailing zeros removed.
    General,
}

/// Split a printf exponential rendering into mantissa and exponent.
fn exponential(value: f64, decimals: usize) -> (String, i32) {
    let text = format!("{:.*e}", decimals, value);
    match text.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), exp.parse().unwrap_or(0)),
        None => (text, 0),
    }
}

fn with_exponent(mantissa: &str, exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.abs())
}

fn trim_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

impl ScalarFormat {
    /// Smallest step representable, if the format has a fixed precision.
    pub fn min_step(&self) -> Option<f64> {
        match *self {
            ScalarFormat::Fixed(n) => Some(10f64.powi(-(n as i32))),
            _ => None,
        }
    }

    pub fn format(&self, value: f64) -> String {
        match *self {
            ScalarFormat::Fixed(n) => format!("{:.*}", n as usize, value),
            ScalarFormat::Exponential(n) => {
                let (mantissa, exp) = exponential(value, n as usize);
                with_exponent(&mantissa, exp)
            }
            ScalarFormat::General => {
                if value == 0.0 {
                    return "0".to_string();
                }
                let (mantissa, exp) = exponential(value, 5);
                if !(-4..6).contains(&exp) {
                    with_exponent(trim_zeros(&mantissa), exp)
                } else {
                    let decimals = (5 - exp) as usize;
                    trim_zeros(&format!("{:.*}", decimals, value)).to_string()
                }
            }
        }
    }
}

impl FromStr for ScalarFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidFormat(s.to_string());
        let spec = s.strip_prefix('%').ok_or_else(invalid)?;
        let (precision, conversion) = match spec.char_indices().last() {
            Some((i, c)) => (&spec[..i], c),
            None => return Err(invalid()),
        };
        let decimals = match precision {
            "" => None,
            p => {
                let digits = p.strip_prefix('.').ok_or_else(invalid)?;
                let n: u8 = digits.parse().map_err(|_| invalid())?;
                if n > MAX_DECIMALS {
                    return Err(invalid());
                }
                Some(n)
            }
        };
        match (conversion, decimals) {
            ('f', n) => Ok(ScalarFormat::Fixed(n.unwrap_or(6))),
            ('e', n) => Ok(ScalarFormat::Exponential(n.unwrap_or(6))),
            ('g', None) => Ok(ScalarFormat::General),
            ('d' | 'i', None) => Ok(ScalarFormat::Fixed(0)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ScalarFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarFormat::Fixed(n) => write!(f, "%.{n}f"),
            ScalarFormat::Exponential(n) => write!(f, "%.{n}e"),
            ScalarFormat::General => write!(f, "%g"),
        }
    }
}

/// How tick values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LabelFormat {
    /// Sexagesimal or decimal angle, e.g. `hh:mm:ss.ss` or `ddd.dddd`.
    Angle(AnglePattern),
    /// Plain number, e.g. `%g`.
    Scalar(ScalarFormat),
}

impl LabelFormat {
    /// Default format for a coordinate of `kind` in `frame`.
    ///
    /// Equatorial longitudes use `hh:mm:ss.ss` and latitudes `dd:mm:ss.s`;
    /// other frames use `ddd.dddd` / `dd.dddd`; scalar axes use `%g`.
    pub fn default_for(kind: CoordKind, frame: CelestialFrame) -> Self {
        let pattern = |hours: bool, width: usize, precision: Precision| {
            LabelFormat::Angle(AnglePattern {
                hours,
                width,
                precision,
            })
        };
        match (kind, frame) {
            (CoordKind::Scalar, _) => LabelFormat::Scalar(ScalarFormat::General),
            (CoordKind::Longitude, CelestialFrame::Equatorial) => {
                pattern(true, 2, Precision::DecimalSeconds(2))
            }
            (CoordKind::Latitude, CelestialFrame::Equatorial) => {
                pattern(false, 2, Precision::DecimalSeconds(1))
            }
            (CoordKind::Longitude, _) => pattern(false, 3, Precision::Decimal(4)),
            (CoordKind::Latitude, _) => pattern(false, 2, Precision::Decimal(4)),
        }
    }

    /// `true` if the format can label a coordinate of `kind`.
    pub fn accepts(&self, kind: CoordKind) -> bool {
        matches!(
            (self, kind),
            (LabelFormat::Angle(_), CoordKind::Longitude | CoordKind::Latitude)
                | (LabelFormat::Scalar(_), CoordKind::Scalar)
        )
    }
}

impl FromStr for LabelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.starts_with('%') {
            Ok(LabelFormat::Scalar(s.parse()?))
        } else {
            Ok(LabelFormat::Angle(s.parse()?))
        }
    }
}

impl fmt::Display for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFormat::Angle(p) => write!(f, "{p}"),
            LabelFormat::Scalar(s) => write!(f, "{s}"),
        }
    }
}

/// Separator glyphs used between label fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LabelStyle {
    /// `12°30'15"` or `12h30m15s`.
    #[default]
    Plain,
    /// `12:30:15`.
    Colons,
    /// `$12^{\circ}30^{\prime}15^{\prime\prime}$`.
    Latex,
}

impl LabelStyle {
    pub fn separators(self, hours: bool) -> Separators<'static> {
        match (self, hours) {
            (LabelStyle::Plain, false) => ("\u{b0}", "'", "\""),
            (LabelStyle::Plain, true) => ("h", "m", "s"),
            (LabelStyle::Colons, _) => (":", ":", ""),
            (LabelStyle::Latex, false) => ("^{\\circ}", "^{\\prime}", "^{\\prime\\prime}"),
            (LabelStyle::Latex, true) => ("^{h}", "^{m}", "^{s}"),
        }
    }
}

impl FromStr for LabelStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(LabelStyle::Plain),
            "colons" => Ok(LabelStyle::Colons),
            "latex" => Ok(LabelStyle::Latex),
            _ => Err(Error::InvalidStyle(s.to_string())),
        }
    }
}

impl fmt::Display for LabelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LabelStyle::Plain => "plain",
            LabelStyle::Colons => "colons",
            LabelStyle::Latex => "latex",
        };
        f.write_str(name)
    }
}
