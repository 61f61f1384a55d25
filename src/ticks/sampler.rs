//! Sampling of the pixel → world mapping along one viewport edge.
//!
//! Samples are taken at (at most) unit pixel steps and always include both
//! end points of the edge. Longitude sequences are continuity-corrected so
//! that interpolation never straddles the 0°/360° branch cut, and latitude
//! sequences are folded back into `(-90, 90]`.

use crate::error::{Error, Result};
use crate::projection::{AxisRole, CoordKind, Projection};
use crate::viewport::{Edge, Viewport};

/// Pixel and world coordinates along one viewport edge.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSample {
    pub edge: Edge,
    pub px: Vec<f64>,
    pub py: Vec<f64>,
    /// World-x, continuity-corrected or folded according to `kinds[0]`.
    pub wx: Vec<f64>,
    /// World-y, continuity-corrected or folded according to `kinds[1]`.
    pub wy: Vec<f64>,
    pub kinds: [CoordKind; 2],
}

impl AxisSample {
    pub fn len(&self) -> usize {
        self.px.len()
    }

    pub fn is_empty(&self) -> bool {
        self.px.is_empty()
    }

    /// World sequence of the coordinate associated with `role`.
    pub fn world(&self, role: AxisRole) -> &[f64] {
        match role {
            AxisRole::X => &self.wx,
            AxisRole::Y => &self.wy,
        }
    }

    pub fn kind(&self, role: AxisRole) -> CoordKind {
        self.kinds[role.index()]
    }
}

/// Remove artificial ±360° jumps from a longitude sequence.
///
/// Whenever two consecutive raw values differ by more than 180°, every
/// following element is shifted by ∓360°.
pub fn unwrap_longitudes(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut offset = 0.0;
    let mut prev: Option<f64> = None;
    for &v in values {
        if let Some(p) = prev {
            let diff = v - p;
            if diff > 180.0 {
                offset -= 360.0;
            } else if diff < -180.0 {
                offset += 360.0;
            }
        }
        out.push(v + offset);
        prev = Some(v);
    }
    out
}

/// Fold latitudes above 90° back by one turn.
pub fn fold_latitudes(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|&v| if v > 90.0 { v - 360.0 } else { v })
        .collect()
}

/// Evenly spaced positions from `lo` to `hi` with steps of at most one pixel.
fn unit_steps(lo: f64, hi: f64) -> Vec<f64> {
    let span = hi - lo;
    let n = (span.ceil().max(1.0) as usize) + 1;
    (0..n)
        .map(|i| lo + span * i as f64 / (n - 1) as f64)
        .collect()
}

fn correct(values: Vec<f64>, kind: CoordKind) -> Vec<f64> {
    match kind {
        CoordKind::Longitude => unwrap_longitudes(&values),
        CoordKind::Latitude => fold_latitudes(&values),
        CoordKind::Scalar => values,
    }
}

/// Sample `projection` along `edge` of `viewport`.
pub fn sample<P: Projection + ?Sized>(
    projection: &P,
    edge: Edge,
    viewport: &Viewport,
) -> Result<AxisSample> {
    let (px, py) = match edge {
        Edge::Bottom | Edge::Top => {
            let px = unit_steps(viewport.xmin, viewport.xmax);
            let y = if edge == Edge::Bottom {
                viewport.ymin
            } else {
                viewport.ymax
            };
            let py = vec![y; px.len()];
            (px, py)
        }
        Edge::Left | Edge::Right => {
            let py = unit_steps(viewport.ymin, viewport.ymax);
            let x = if edge == Edge::Left {
                viewport.xmin
            } else {
                viewport.xmax
            };
            let px = vec![x; py.len()];
            (px, py)
        }
    };

    let (wx, wy) = projection.pixel_to_world(&px, &py)?;
    if wx.len() != px.len() || wy.len() != py.len() {
        return Err(Error::Projection(format!(
            "projection returned {} / {} world values for {} pixels",
            wx.len(),
            wy.len(),
            px.len()
        )));
    }
    if let Some(i) = wx
        .iter()
        .zip(&wy)
        .position(|(a, b)| !a.is_finite() || !b.is_finite())
    {
        return Err(Error::Projection(format!(
            "non-finite world coordinate at pixel ({}, {}) on the {:?} edge",
            px[i], py[i], edge
        )));
    }

    let kinds = [
        projection.coord_kind(AxisRole::X),
        projection.coord_kind(AxisRole::Y),
    ];
    Ok(AxisSample {
        edge,
        px,
        py,
        wx: correct(wx, kinds[0]),
        wy: correct(wy, kinds[1]),
        kinds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{LinearProjection, TanProjection};

    #[test]
    fn unwrap_removes_branch_cut() {
        assert_eq!(
            unwrap_longitudes(&[355.0, 358.0, 2.0, 5.0]),
            vec![355.0, 358.0, 362.0, 365.0]
        );
        assert_eq!(
            unwrap_longitudes(&[5.0, 2.0, 358.0, 355.0]),
            vec![5.0, 2.0, -2.0, -5.0]
        );
        assert!(unwrap_longitudes(&[]).is_empty());
    }

    #[test]
    fn fold_only_touches_values_above_ninety() {
        assert_eq!(fold_latitudes(&[89.0, 90.0, 271.0]), vec![89.0, 90.0, -89.0]);
    }

    #[test]
    fn unit_steps_include_both_ends() {
        let steps = unit_steps(0.5, 16.5);
        assert_eq!(steps.len(), 17);
        assert_eq!(steps[0], 0.5);
        assert_eq!(*steps.last().unwrap(), 16.5);

        let steps = unit_steps(1.0, 3.5);
        assert_eq!(steps.len(), 4);
        assert!(steps.windows(2).all(|w| w[1] - w[0] <= 1.0));
    }

    #[test]
    fn bottom_edge_across_zero_meridian_is_continuous() {
        let proj = TanProjection::new([0.0, 0.0], [50.5, 50.5], [-0.1, 0.1]).unwrap();
        let vp = Viewport::full_image(100, 100);
        let s = sample(&proj, Edge::Bottom, &vp).unwrap();
        assert_eq!(s.len(), 101);
        assert!(s.py.iter().all(|&y| y == 0.5));
        // longitude decreases left to right without jumps
        assert!(s.wx.windows(2).all(|w| w[1] < w[0] && (w[1] - w[0]).abs() < 1.0));
    }

    #[test]
    fn left_edge_varies_y() {
        let proj = LinearProjection::new(
            [0.0, 0.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [CoordKind::Scalar, CoordKind::Scalar],
        )
        .unwrap();
        let vp = Viewport::full_image(4, 4);
        let s = sample(&proj, Edge::Left, &vp).unwrap();
        assert!(s.px.iter().all(|&x| x == 0.5));
        assert_eq!(s.world(AxisRole::Y).first(), Some(&-1.0));
        assert_eq!(s.world(AxisRole::Y).last(), Some(&7.0));
    }

    #[test]
    fn projection_failure_propagates() {
        let proj = LinearProjection::celestial([0.0, 89.0], [1.0, 1.0], [1.0, 1.0]).unwrap();
        let vp = Viewport::full_image(10, 10);
        assert!(matches!(
            sample(&proj, Edge::Left, &vp),
            Err(Error::Projection(_))
        ));
    }
}
