//! Sub-pixel location of ticks along a sampled edge.
//!
//! The world sequence is divided by the spacing, so that every integer value
//! `w` marks a tick. For each consecutive pair `(a, b)` a tick is emitted for
//! every integer with `a ≤ w < b` or `b < w ≤ a` (the segment's start is
//! inclusive, its end exclusive), except on the final segment where the end
//! point is included as well. Each sample point therefore produces at most
//! one tick.
//!
//! Ticks are returned in ascending `w`, then in scan order. They are not
//! re-sorted by pixel position.

use crate::projection::{AxisRole, CoordKind};
use crate::ticks::AxisSample;

/// A tick: pixel position on the edge and integer world index.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick {
    pub px: f64,
    pub py: f64,
    /// `index × spacing` is the world value at the tick.
    pub index: i64,
}

impl Tick {
    /// World value of the tick, wrapped into `[0, 360)` for longitudes and
    /// folded into `[-90, 90]` for latitudes.
    pub fn world_value(&self, spacing: f64, kind: CoordKind) -> f64 {
        world_value(self.index, spacing, kind)
    }
}

/// Where a gridline of one coordinate crosses a viewport edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub px: f64,
    pub py: f64,
    pub index: i64,
    /// Display value of the gridline (see [`world_value`]).
    pub value: f64,
    /// Interpolated value of the other world coordinate at the crossing.
    pub other: f64,
}

/// `index × spacing` expressed in the canonical range of `kind`.
pub fn world_value(index: i64, spacing: f64, kind: CoordKind) -> f64 {
    let value = index as f64 * spacing;
    match kind {
        CoordKind::Longitude => value.rem_euclid(360.0),
        CoordKind::Latitude if value > 90.0 => value - 360.0,
        _ => value,
    }
}

/// `(segment, fraction, w)` for every integer crossing of `values / spacing`.
fn scan(values: &[f64], spacing: f64) -> Vec<(usize, f64, i64)> {
    if values.len() < 2 || !spacing.is_finite() || spacing <= 0.0 {
        return Vec::new();
    }
    let scaled: Vec<f64> = values.iter().map(|v| v / spacing).collect();
    let last = scaled.len() - 2;
    let mut hits = Vec::new();

    for (i, pair) in scaled.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        if a == b {
            continue;
        }
        let lo = a.min(b).ceil() as i64;
        let hi = a.max(b).floor() as i64;
        for w in lo..=hi {
            let wf = w as f64;
            if wf == b && i != last {
                continue;
            }
            hits.push((i, (wf - a) / (b - a), w));
        }
    }

    // stable: equal `w` keep scan order
    hits.sort_by_key(|&(_, _, w)| w);
    hits
}

fn lerp(values: &[f64], segment: usize, t: f64) -> f64 {
    values[segment] + t * (values[segment + 1] - values[segment])
}

/// Ticks of the coordinate associated with `role` at multiples of `spacing`.
///
/// Degenerate samples (fewer than two points, constant values) and
/// non-positive spacings give no ticks.
pub fn locate(sample: &AxisSample, spacing: f64, role: AxisRole) -> Vec<Tick> {
    scan(sample.world(role), spacing)
        .into_iter()
        .map(|(i, t, index)| Tick {
            px: lerp(&sample.px, i, t),
            py: lerp(&sample.py, i, t),
            index,
        })
        .collect()
}

/// Like [`locate`], additionally interpolating the other world coordinate.
pub fn locate_crossings(sample: &AxisSample, spacing: f64, role: AxisRole) -> Vec<Crossing> {
    let kind = sample.kind(role);
    let other = sample.world(role.other());
    scan(sample.world(role), spacing)
        .into_iter()
        .map(|(i, t, index)| Crossing {
            px: lerp(&sample.px, i, t),
            py: lerp(&sample.py, i, t),
            index,
            value: world_value(index, spacing, kind),
            other: lerp(other, i, t),
        })
        .collect()
}

/// Minor ticks at `spacing / frequency`, skipping positions that coincide
/// with major ticks. Indices are in units of the minor spacing.
pub fn locate_minor(
    sample: &AxisSample,
    spacing: f64,
    frequency: u32,
    role: AxisRole,
) -> Vec<Tick> {
    if frequency < 2 {
        return Vec::new();
    }
    let frequency = i64::from(frequency);
    locate(sample, spacing / frequency as f64, role)
        .into_iter()
        .filter(|t| t.index.rem_euclid(frequency) != 0)
        .collect()
}
