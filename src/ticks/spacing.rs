//! Automatic tick spacing and spacing/format consistency.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::angle::{nice_decimal_spacing, nice_scalar_spacing, nice_spacing, SexagesimalAngle};
use crate::error::{Error, Result};
use crate::labels::LabelFormat;
use crate::projection::{AxisRole, CoordKind, Projection};
use crate::ticks::sample;
use crate::viewport::{Edge, Viewport};

/// Number of intervals the visible span is divided into.
const TARGET_INTERVALS: f64 = 5.0;

/// Relative slack allowed when testing that a spacing is a whole multiple
/// of the format precision.
const MULTIPLE_TOLERANCE: f64 = 1e-6;

/// Requested tick spacing for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickSpacing {
    /// Recomputed from the viewport on every change.
    #[default]
    Auto,
    /// Fixed spacing in degrees (celestial axes) or world units (scalar axes).
    Fixed(f64),
}

impl FromStr for TickSpacing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(TickSpacing::Auto);
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(TickSpacing::Fixed(v)),
            _ => Err(Error::InvalidSpacing(format!(
                "{s:?} (expected \"auto\" or a positive number)"
            ))),
        }
    }
}

/// A resolved tick spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Spacing {
    Angle(SexagesimalAngle),
    Scalar(f64),
}

impl Spacing {
    /// Spacing in degrees (celestial) or world units (scalar).
    pub fn value(&self) -> f64 {
        match self {
            Spacing::Angle(a) => a.to_degrees().abs(),
            Spacing::Scalar(v) => *v,
        }
    }

    /// Turn a user-supplied fixed spacing into a spacing for an axis of
    /// `kind`.
    pub fn fixed(value: f64, kind: CoordKind) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidSpacing(format!("{value}")));
        }
        match kind {
            CoordKind::Scalar => Ok(Spacing::Scalar(value)),
            _ => Ok(Spacing::Angle(SexagesimalAngle::from_degrees(
                value,
                kind == CoordKind::Latitude,
            )?)),
        }
    }
}

impl fmt::Display for Spacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spacing::Angle(a) => write!(f, "{a}"),
            Spacing::Scalar(v) => write!(f, "{v}"),
        }
    }
}

/// Visible `(min, max)` of a set of angles in degrees.
///
/// The largest gap between consecutive (sorted, wrapped) values is taken to
/// be the outside of the visible range, so a view spanning 350° → 10°
/// yields `(-10, 10)`. Returns `None` for an empty input.
pub fn smart_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut sorted: Vec<f64> = values.iter().map(|v| v.rem_euclid(360.0)).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mut min_span = 360.0;
    let (mut lo, mut hi) = (0, n - 1);
    for i in 0..n - 1 {
        let span = 360.0 - (sorted[i + 1] - sorted[i]).abs();
        if span < min_span {
            min_span = span;
            lo = i + 1;
            hi = i;
        }
    }
    if sorted[n - 1] - sorted[0] < min_span {
        lo = 0;
        hi = n - 1;
    }

    let (mut xmin, xmax) = (sorted[lo], sorted[hi]);
    if xmin > xmax {
        xmin -= 360.0;
    }
    Some((xmin, xmax))
}

fn plain_range(values: &[f64]) -> Option<(f64, f64)> {
    let lo = values.iter().copied().reduce(f64::min)?;
    let hi = values.iter().copied().reduce(f64::max)?;
    Some((lo, hi))
}

/// Recommend a spacing for `role` in the current viewport.
///
/// Samples the axis' own edge (bottom for x, left for y), divides the
/// visible span into five, rounds onto a human-friendly value matching the
/// label format and raises it to the finest spacing the format can show.
/// Returns `None` when the visible span is zero.
pub fn recommend<P: Projection + ?Sized>(
    role: AxisRole,
    projection: &P,
    viewport: &Viewport,
    format: &LabelFormat,
) -> Result<Option<Spacing>> {
    let edge = match role {
        AxisRole::X => Edge::Bottom,
        AxisRole::Y => Edge::Left,
    };
    let sample = sample(projection, edge, viewport)?;
    let kind = sample.kind(role);
    if !format.accepts(kind) {
        return Err(Error::InvalidFormat(format!(
            "{format} cannot label a {kind:?} axis"
        )));
    }

    let values = sample.world(role);
    let range = match kind {
        CoordKind::Scalar => plain_range(values),
        CoordKind::Longitude | CoordKind::Latitude => smart_range(values),
    };
    let Some((lo, hi)) = range else {
        return Ok(None);
    };
    let raw = (hi - lo) / TARGET_INTERVALS;
    if !raw.is_finite() || raw <= 0.0 {
        debug!("{:?} axis: zero visible span, no spacing", role);
        return Ok(None);
    }

    let spacing = match format {
        LabelFormat::Angle(pattern) => {
            let latitude = kind == CoordKind::Latitude;
            let nice = match (pattern.is_decimal(), pattern.hours) {
                (true, false) => nice_decimal_spacing(raw, latitude)?,
                (true, true) => nice_decimal_spacing(raw / 15.0, false)?
                    .scale(15)?
                    .as_latitude(latitude)?,
                (false, hours) => nice_spacing(raw, latitude, hours)?,
            };
            let min = pattern.min_spacing()?;
            if nice.to_degrees().abs() < min.to_degrees() {
                debug!(
                    "{:?} axis: raising spacing {} to format minimum {}",
                    role, nice, min
                );
                Spacing::Angle(min.as_latitude(latitude)?)
            } else {
                Spacing::Angle(nice)
            }
        }
        LabelFormat::Scalar(scalar) => {
            let nice = nice_scalar_spacing(raw)?;
            match scalar.min_step() {
                Some(step) if nice < step => Spacing::Scalar(step),
                _ => Spacing::Scalar(nice),
            }
        }
    };

    debug!(
        "{:?} axis: span [{:.6}, {:.6}] -> spacing {} ({})",
        role, lo, hi, spacing, format
    );
    Ok(Some(spacing))
}

/// Check that `spacing` is a whole multiple (at least one) of the finest
/// step `format` can display.
pub fn check_consistency(format: &LabelFormat, spacing: &Spacing) -> Result<()> {
    let (step, precision) = match (format, spacing) {
        (LabelFormat::Angle(pattern), Spacing::Angle(_)) => {
            (pattern.min_spacing_degrees(), pattern.min_spacing()?.to_string())
        }
        (LabelFormat::Scalar(scalar), Spacing::Scalar(_)) => match scalar.min_step() {
            Some(step) => (step, step.to_string()),
            None => return Ok(()),
        },
        _ => {
            return Err(Error::InvalidSpacing(format!(
                "spacing {spacing} does not match label format {format}"
            )))
        }
    };

    let ratio = spacing.value() / step;
    let whole = ratio.round();
    if whole < 1.0 || (ratio - whole).abs() > MULTIPLE_TOLERANCE * ratio.max(1.0) {
        return Err(Error::InconsistentSpacing {
            spacing: spacing.to_string(),
            format: format.to_string(),
            precision,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{LinearProjection, TanProjection};

    fn angle(d: i64, m: i64, s: f64) -> Spacing {
        Spacing::Angle(SexagesimalAngle::from_dms(d, m, s, false).unwrap())
    }

    fn fmt(text: &str) -> LabelFormat {
        text.parse().unwrap()
    }

    #[test]
    fn smart_range_handles_wraparound() {
        let (lo, hi) = smart_range(&[350.0, 355.0, 0.0, 5.0, 10.0]).unwrap();
        assert_eq!((lo, hi), (-10.0, 10.0));

        let (lo, hi) = smart_range(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!((lo, hi), (10.0, 30.0));

        // continuity-corrected input is wrapped first
        let (lo, hi) = smart_range(&[358.0, 362.0]).unwrap();
        assert_eq!((lo, hi), (-2.0, 2.0));

        assert!(smart_range(&[]).is_none());
    }

    #[test]
    fn parse_tick_spacing() {
        assert_eq!("auto".parse::<TickSpacing>().unwrap(), TickSpacing::Auto);
        assert_eq!("AUTO".parse::<TickSpacing>().unwrap(), TickSpacing::Auto);
        assert_eq!("0.5".parse::<TickSpacing>().unwrap(), TickSpacing::Fixed(0.5));
        for bad in ["", "-1", "0", "nan", "often"] {
            assert!(matches!(
                bad.parse::<TickSpacing>(),
                Err(Error::InvalidSpacing(_))
            ));
        }
    }

    #[test]
    fn half_arcsecond_needs_seconds_in_the_format() {
        let spacing = angle(0, 0, 0.5);
        assert!(matches!(
            check_consistency(&fmt("dd:mm"), &spacing),
            Err(Error::InconsistentSpacing { .. })
        ));
        assert!(check_consistency(&fmt("dd:mm:ss.ss"), &spacing).is_ok());
        assert!(check_consistency(&fmt("dd:mm:ss"), &spacing).is_err());
    }

    #[test]
    fn spacing_must_be_whole_multiple() {
        assert!(check_consistency(&fmt("dd:mm"), &angle(0, 1, 30.0)).is_err());
        assert!(check_consistency(&fmt("dd:mm"), &angle(0, 2, 0.0)).is_ok());
        // 1m of time is 15'
        assert!(check_consistency(&fmt("hh:mm"), &angle(0, 15, 0.0)).is_ok());
        assert!(check_consistency(&fmt("hh:mm"), &angle(0, 10, 0.0)).is_err());
        assert!(check_consistency(&fmt("ddd.dd"), &angle(0, 0, 36.0)).is_ok());
        assert!(check_consistency(&fmt("%.1f"), &Spacing::Scalar(0.25)).is_err());
        assert!(check_consistency(&fmt("%.2f"), &Spacing::Scalar(0.25)).is_ok());
        assert!(check_consistency(&fmt("%g"), &Spacing::Scalar(0.123)).is_ok());
        assert!(matches!(
            check_consistency(&fmt("%g"), &angle(1, 0, 0.0)),
            Err(Error::InvalidSpacing(_))
        ));
    }

    #[test]
    fn recommend_for_small_tan_field() {
        let proj = TanProjection::new([180.0, 0.0], [8.5, 8.5], [-0.01, 0.01]).unwrap();
        let vp = Viewport::full_image(16, 16);

        let x = recommend(AxisRole::X, &proj, &vp, &fmt("hh:mm:ss.ss"))
            .unwrap()
            .unwrap();
        match x {
            Spacing::Angle(a) => {
                assert_eq!((a.degrees(), a.minutes()), (0, 1));
                assert!((a.seconds() - 30.0).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }

        // 0.16° / 5 = 115" -> 2'
        let y = recommend(AxisRole::Y, &proj, &vp, &fmt("dd:mm:ss.s"))
            .unwrap()
            .unwrap();
        assert!((y.value() - 2.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn recommend_is_clamped_by_format() {
        let proj = TanProjection::new([180.0, 0.0], [8.5, 8.5], [-0.001, 0.001]).unwrap();
        let vp = Viewport::full_image(16, 16);
        let y = recommend(AxisRole::Y, &proj, &vp, &fmt("dd:mm")).unwrap().unwrap();
        assert!((y.value() - 1.0 / 60.0).abs() < 1e-12);
        assert!(check_consistency(&fmt("dd:mm"), &y).is_ok());
    }

    #[test]
    fn recommend_scalar_and_decimal_hours() {
        let proj = LinearProjection::new(
            [0.0, 0.0],
            [1.0, 1.0],
            [3.0, 0.001],
            [CoordKind::Scalar, CoordKind::Scalar],
        )
        .unwrap();
        let vp = Viewport::full_image(100, 100);
        let x = recommend(AxisRole::X, &proj, &vp, &fmt("%g")).unwrap().unwrap();
        // 300 / 5 = 60 -> 50
        assert_eq!(x, Spacing::Scalar(50.0));
        let y = recommend(AxisRole::Y, &proj, &vp, &fmt("%.1f")).unwrap().unwrap();
        assert!(matches!(y, Spacing::Scalar(v) if (v - 0.1).abs() < 1e-15));

        let sky = LinearProjection::celestial([100.0, 0.0], [1.0, 1.0], [-0.05, 0.05]).unwrap();
        let x = recommend(AxisRole::X, &sky, &vp, &fmt("hh.hh")).unwrap().unwrap();
        assert!(check_consistency(&fmt("hh.hh"), &x).is_ok());
    }

    #[test]
    fn zero_span_gives_no_spacing() {
        let proj = TanProjection::new([180.0, 0.0], [8.5, 8.5], [-0.01, 0.01]).unwrap();
        let vp = Viewport::new(5.0, 5.0, 5.0, 5.0).unwrap();
        assert_eq!(recommend(AxisRole::X, &proj, &vp, &fmt("dd:mm")).unwrap(), None);
    }

    #[test]
    fn format_must_match_axis_kind() {
        let proj = TanProjection::new([180.0, 0.0], [8.5, 8.5], [-0.01, 0.01]).unwrap();
        let vp = Viewport::full_image(16, 16);
        assert!(matches!(
            recommend(AxisRole::X, &proj, &vp, &fmt("%g")),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn fixed_spacing_validation() {
        assert!(Spacing::fixed(0.0, CoordKind::Longitude).is_err());
        assert_eq!(Spacing::fixed(2.5, CoordKind::Scalar).unwrap(), Spacing::Scalar(2.5));
        let lat = Spacing::fixed(5.0, CoordKind::Latitude).unwrap();
        assert!((lat.value() - 5.0).abs() < 1e-12);
    }
}
