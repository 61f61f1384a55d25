//! Gridline geometry.
//!
//! A gridline is the curve along which one world coordinate (the *family*
//! coordinate) is constant. Lines are found from their crossings with the
//! four viewport edges, paired up along the other (*varying*) coordinate,
//! and traced through the projection so that they follow the true, possibly
//! curved, path.
//!
//! # Algorithm
//!
//! 1. Sample all four edges and collect every crossing of a multiple of the
//!    spacing, grouped by gridline value.
//! 2. Meridians gain an end point at a celestial pole lying inside the
//!    viewport.
//! 3. Crossings are sorted along the varying coordinate and connected
//!    pairwise. For a periodic (longitude) varying coordinate the pairing
//!    phase is chosen by testing whether the midpoint of the first pair lies
//!    inside the viewport; the last pair then wraps through 360°.
//! 4. Each pair is traced with [`LINE_POINTS`] points through
//!    `world_to_pixel`; points without a pixel position split the polyline.
//! 5. Latitude circles that never reach the boundary (around a pole inside
//!    the viewport) are found by probing outward from the boundary's
//!    latitude range one spacing at a time.
//!
//! An odd crossing count is a geometry inconsistency: it is logged with
//! `tracing::warn!` and the gridline is skipped.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::Result;
use crate::projection::{world_to_pixel_point, AxisRole, CoordKind, Projection};
use crate::ticks::{locate_crossings, sample, AxisSample, Crossing};
use crate::viewport::{Edge, Viewport};

/// Points per traced gridline piece.
pub const LINE_POINTS: usize = 100;

/// Crossings closer than this (pixels) are the same boundary point, e.g. a
/// line through a corner found on two edges.
const DUPLICATE_PIXELS: f64 = 1e-6;

/// One continuous polyline of a gridline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLineSegment {
    /// Axis whose world coordinate is constant along the line.
    pub family: AxisRole,
    /// The constant world value (wrapped / folded like tick values).
    pub value: f64,
    /// `true` for a full circle that never crosses the viewport boundary.
    pub closed: bool,
    pub points: Vec<(f64, f64)>,
}

/// World `(x, y)` for a point on a gridline of `family`.
fn world_pair(family: AxisRole, constant: f64, varying: f64) -> (f64, f64) {
    match family {
        AxisRole::X => (constant, varying),
        AxisRole::Y => (varying, constant),
    }
}

fn canonical(value: f64, kind: CoordKind) -> f64 {
    match kind {
        CoordKind::Longitude => value.rem_euclid(360.0),
        CoordKind::Latitude if value > 90.0 => value - 360.0,
        _ => value,
    }
}

/// Grouping key for a crossing; longitudes are keyed by value so that
/// crossings found on different unwrapped branches meet.
fn group_key(crossing: &Crossing, kind: CoordKind) -> i64 {
    match kind {
        CoordKind::Longitude => ((crossing.value * 1e6).round() as i64).rem_euclid(360_000_000),
        _ => crossing.index,
    }
}

fn inside<P: Projection + ?Sized>(
    projection: &P,
    viewport: &Viewport,
    wx: f64,
    wy: f64,
) -> Result<Option<(f64, f64)>> {
    Ok(world_to_pixel_point(projection, wx, wy)?.filter(|&(x, y)| viewport.contains(x, y)))
}

/// Trace the gridline `family = value` from `from` to `to` along the
/// varying coordinate.
fn trace<P: Projection + ?Sized>(
    projection: &P,
    family: AxisRole,
    value: f64,
    (from, to): (f64, f64),
    closed: bool,
    out: &mut Vec<GridLineSegment>,
) -> Result<()> {
    let varying: Vec<f64> = (0..LINE_POINTS)
        .map(|i| from + (to - from) * i as f64 / (LINE_POINTS - 1) as f64)
        .collect();
    let constant = vec![value; LINE_POINTS];
    let (px, py) = match family {
        AxisRole::X => projection.world_to_pixel(&constant, &varying)?,
        AxisRole::Y => projection.world_to_pixel(&varying, &constant)?,
    };

    let mut pieces: Vec<Vec<(f64, f64)>> = vec![Vec::new()];
    for (x, y) in px.into_iter().zip(py) {
        if x.is_finite() && y.is_finite() {
            if let Some(piece) = pieces.last_mut() {
                piece.push((x, y));
            }
        } else if pieces.last().is_some_and(|p| !p.is_empty()) {
            pieces.push(Vec::new());
        }
    }
    pieces.retain(|p| p.len() >= 2);
    let whole = closed && pieces.len() == 1 && pieces[0].len() == LINE_POINTS;

    out.extend(pieces.into_iter().map(|points| GridLineSegment {
        family,
        value,
        closed: whole,
        points,
    }));
    Ok(())
}

/// Connect sorted crossings pairwise along the varying coordinate.
fn pair_up<P: Projection + ?Sized>(
    projection: &P,
    viewport: &Viewport,
    family: AxisRole,
    value: f64,
    others: &[f64],
    periodic: bool,
) -> Result<Vec<(f64, f64)>> {
    let n = others.len();
    let in_phase = !periodic || {
        let (wx, wy) = world_pair(family, value, 0.5 * (others[0] + others[1]));
        inside(projection, viewport, wx, wy)?.is_some()
    };
    if in_phase {
        return Ok(others.chunks_exact(2).map(|p| (p[0], p[1])).collect());
    }
    Ok((0..n / 2)
        .map(|k| {
            let a = others[2 * k + 1];
            let b = if 2 * k + 2 < n {
                others[2 * k + 2]
            } else {
                others[0] + 360.0
            };
            (a, b)
        })
        .collect())
}

/// Gridlines of `family` that cross the viewport boundary.
fn crossing_lines<P: Projection + ?Sized>(
    projection: &P,
    viewport: &Viewport,
    samples: &[AxisSample],
    family: AxisRole,
    spacing: f64,
    out: &mut Vec<GridLineSegment>,
) -> Result<()> {
    let kind = projection.coord_kind(family);
    let other_kind = projection.coord_kind(family.other());

    let mut groups: BTreeMap<i64, Vec<Crossing>> = BTreeMap::new();
    for s in samples {
        for mut crossing in locate_crossings(s, spacing, family) {
            crossing.other = canonical(crossing.other, other_kind);
            groups
                .entry(group_key(&crossing, kind))
                .or_default()
                .push(crossing);
        }
    }

    let meridians = kind == CoordKind::Longitude && other_kind == CoordKind::Latitude;
    for mut crossings in groups.into_values() {
        let first = crossings[0];
        if meridians {
            for pole in [90.0, -90.0] {
                let (wx, wy) = world_pair(family, first.value, pole);
                if let Some((px, py)) = inside(projection, viewport, wx, wy)? {
                    crossings.push(Crossing {
                        px,
                        py,
                        other: pole,
                        ..first
                    });
                }
            }
        }

        crossings.sort_by(|a, b| a.other.total_cmp(&b.other));
        crossings.dedup_by(|a, b| (a.px - b.px).hypot(a.py - b.py) < DUPLICATE_PIXELS);
        if crossings.len() % 2 == 1 {
            warn!(
                "{:?} gridline at {} crosses the viewport boundary {} times, skipping",
                family,
                first.value,
                crossings.len()
            );
            continue;
        }

        let others: Vec<f64> = crossings.iter().map(|c| c.other).collect();
        let periodic = other_kind == CoordKind::Longitude;
        for pair in pair_up(projection, viewport, family, first.value, &others, periodic)? {
            trace(projection, family, first.value, pair, false, out)?;
        }
    }
    Ok(())
}

/// Latitude circles around a pole that never reach the boundary.
fn closed_circles<P: Projection + ?Sized>(
    projection: &P,
    viewport: &Viewport,
    samples: &[AxisSample],
    family: AxisRole,
    spacing: f64,
    out: &mut Vec<GridLineSegment>,
) -> Result<()> {
    let latitudes = samples.iter().flat_map(|s| s.world(family).iter().copied());
    let (lo, hi) = latitudes.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return Ok(());
    }

    for step in [1i64, -1] {
        let mut k = if step > 0 {
            (hi / spacing).floor() as i64 + 1
        } else {
            (lo / spacing).ceil() as i64 - 1
        };
        loop {
            let lat = k as f64 * spacing;
            if lat.abs() >= 90.0 {
                break;
            }
            let (wx, wy) = world_pair(family, lat, 0.0);
            if inside(projection, viewport, wx, wy)?.is_none() {
                break;
            }
            debug!("closed {:?} gridline at {}", family, lat);
            trace(projection, family, lat, (0.0, 360.0), true, out)?;
            k += step;
        }
    }
    Ok(())
}

/// Build gridline segments for both coordinate families.
///
/// Spacings are in degrees (celestial) or world units (scalar); a
/// non-positive or non-finite spacing disables that family.
pub fn build<P: Projection + ?Sized>(
    projection: &P,
    viewport: &Viewport,
    xspacing: f64,
    yspacing: f64,
) -> Result<Vec<GridLineSegment>> {
    let samples = Edge::ALL
        .iter()
        .map(|&edge| sample(projection, edge, viewport))
        .collect::<Result<Vec<_>>>()?;

    let mut segments = Vec::new();
    for (family, spacing) in [(AxisRole::X, xspacing), (AxisRole::Y, yspacing)] {
        if !spacing.is_finite() || spacing <= 0.0 {
            continue;
        }
        crossing_lines(projection, viewport, &samples, family, spacing, &mut segments)?;
        if projection.coord_kind(family) == CoordKind::Latitude
            && projection.coord_kind(family.other()) == CoordKind::Longitude
        {
            closed_circles(projection, viewport, &samples, family, spacing, &mut segments)?;
        }
    }

    debug!("built {} gridline segments", segments.len());
    Ok(segments)
}
