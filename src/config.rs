//! Per-axis and gridline configuration.

use crate::labels::{LabelFormat, LabelStyle};
use crate::projection::{AxisRole, CelestialFrame, CoordKind};
use crate::ticks::{Spacing, TickSpacing};
use crate::viewport::Edge;

/// Default number of minor intervals per major interval.
pub const DEFAULT_MINOR_FREQUENCY: u32 = 5;

/// Tick and label settings for one axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisConfig {
    /// Requested spacing. Default: [`TickSpacing::Auto`].
    pub spacing: TickSpacing,
    /// Label format; the default depends on the coordinate kind and frame
    /// (see [`LabelFormat::default_for`]).
    pub format: LabelFormat,
    /// Separator glyphs. Default: [`LabelStyle::Plain`].
    pub style: LabelStyle,
    /// Edge carrying the labels. Default: bottom for x, left for y.
    pub label_edge: Edge,
    /// Minor intervals per major interval; `0` or `1` disables minor ticks.
    /// Default: 5.
    pub minor_frequency: u32,
    /// Spacing resolved by the last successful recompute.
    pub current: Option<Spacing>,
}

impl AxisConfig {
    /// Defaults for the axis `role` carrying a coordinate of `kind`.
    pub fn new(role: AxisRole, kind: CoordKind, frame: CelestialFrame) -> Self {
        Self {
            spacing: TickSpacing::Auto,
            format: LabelFormat::default_for(kind, frame),
            style: LabelStyle::Plain,
            label_edge: Edge::for_axis(role)[0],
            minor_frequency: DEFAULT_MINOR_FREQUENCY,
            current: None,
        }
    }
}

/// Spacing of one gridline family.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridSpacing {
    /// Follow the axis' tick spacing.
    #[default]
    Tick,
    /// Recommend a spacing independently of the ticks.
    Auto,
    /// Fixed spacing in degrees or world units.
    Fixed(f64),
}

/// Gridline settings.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Whether gridlines are built at all. Default: `false`.
    pub visible: bool,
    pub x_spacing: GridSpacing,
    pub y_spacing: GridSpacing,
}

impl GridConfig {
    pub fn spacing(&self, role: AxisRole) -> GridSpacing {
        match role {
            AxisRole::X => self.x_spacing,
            AxisRole::Y => self.y_spacing,
        }
    }

    pub fn spacing_mut(&mut self, role: AxisRole) -> &mut GridSpacing {
        match role {
            AxisRole::X => &mut self.x_spacing,
            AxisRole::Y => &mut self.y_spacing,
        }
    }
}
