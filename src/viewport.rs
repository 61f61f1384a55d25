//! Pixel-space viewport, its edges, and the change-notification interface.

use crate::error::{Error, Result};
use crate::projection::AxisRole;

/// Visible pixel rectangle `[xmin, xmax] × [ymin, ymax]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Viewport {
    /// Viewport with validated bounds.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self> {
        let finite = [xmin, xmax, ymin, ymax].iter().all(|v| v.is_finite());
        if !finite || xmin > xmax || ymin > ymax {
            return Err(Error::InvalidViewport(format!(
                "bounds [{xmin}, {xmax}] x [{ymin}, {ymax}]"
            )));
        }
        Ok(Self {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// The whole of an `nx × ny` image in FITS pixel convention.
    pub fn full_image(nx: usize, ny: usize) -> Self {
        Self {
            xmin: 0.5,
            xmax: nx as f64 + 0.5,
            ymin: 0.5,
            ymax: ny as f64 + 0.5,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.xmin + self.xmax),
            0.5 * (self.ymin + self.ymax),
        )
    }

    /// Shift by `(dx, dy)` pixels.
    pub fn pan(&self, dx: f64, dy: f64) -> Self {
        Self {
            xmin: self.xmin + dx,
            xmax: self.xmax + dx,
            ymin: self.ymin + dy,
            ymax: self.ymax + dy,
        }
    }

    /// Scale about the centre; `factor > 1` zooms in.
    pub fn zoom(&self, factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(Error::InvalidViewport(format!("zoom factor {factor}")));
        }
        let (cx, cy) = self.center();
        let hw = 0.5 * self.width() / factor;
        let hh = 0.5 * self.height() / factor;
        Ok(Self {
            xmin: cx - hw,
            xmax: cx + hw,
            ymin: cy - hh,
            ymax: cy + hh,
        })
    }

    /// Inclusive containment test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

/// One side of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    Bottom,
    Top,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Bottom, Edge::Top, Edge::Left, Edge::Right];

    /// The two edges ticks of `role` are drawn on.
    pub fn for_axis(role: AxisRole) -> [Edge; 2] {
        match role {
            AxisRole::X => [Edge::Bottom, Edge::Top],
            AxisRole::Y => [Edge::Left, Edge::Right],
        }
    }

    /// `true` if pixel x varies along the edge.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Edge::Bottom | Edge::Top)
    }
}

/// Observer notified by the host whenever the visible region changes.
pub trait ViewportListener {
    fn on_change(&mut self, viewport: Viewport);
}
