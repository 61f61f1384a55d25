//! Tick label rendering with redundancy suppression.

use crate::angle::SexagesimalAngle;
use crate::error::{Error, Result};
use crate::labels::{LabelFormat, LabelStyle};
use crate::projection::CoordKind;
use crate::ticks::Spacing;

/// Absolute angle of tick `index`, folded for latitudes and converted to
/// hours when the pattern asks for it.
fn tick_angle(
    index: i64,
    spacing: &SexagesimalAngle,
    hours: bool,
    kind: CoordKind,
) -> Result<SexagesimalAngle> {
    let angle = spacing
        .as_latitude(kind == CoordKind::Latitude)?
        .scale(index)?;
    if hours {
        angle.to_hours()
    } else {
        Ok(angle)
    }
}

/// Render the label of tick `index`.
///
/// When `neighbor` is given, leading fields identical to the neighbor's
/// label are dropped; the last field is always kept. Scalar labels are
/// never shortened.
pub fn format_tick(
    index: i64,
    spacing: &Spacing,
    format: &LabelFormat,
    style: LabelStyle,
    kind: CoordKind,
    neighbor: Option<i64>,
) -> Result<String> {
    let text = match (format, spacing) {
        (LabelFormat::Angle(pattern), Spacing::Angle(step)) => {
            let separators = style.separators(pattern.hours);
            let fields = tick_angle(index, step, pattern.hours, kind)?.format(pattern, separators);
            let shared = match neighbor {
                Some(n) => {
                    let other = tick_angle(n, step, pattern.hours, kind)?.format(pattern, separators);
                    fields
                        .iter()
                        .zip(&other)
                        .take(fields.len().saturating_sub(1))
                        .take_while(|(a, b)| a == b)
                        .count()
                }
                None => 0,
            };
            fields[shared..].concat()
        }
        (LabelFormat::Scalar(scalar), Spacing::Scalar(step)) => scalar.format(index as f64 * step),
        _ => {
            return Err(Error::InvalidSpacing(format!(
                "spacing {spacing} does not match label format {format}"
            )))
        }
    };

    Ok(match style {
        LabelStyle::Latex => format!("${text}$"),
        _ => text,
    })
}
