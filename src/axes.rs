//! Orchestration: configuration, recompute on viewport change, render frames.
//!
//! [`CelestialAxes`] owns the projection, the viewport and both
//! [`AxisConfig`]s. Every setter validates its input first, then recomputes
//! the whole [`RenderFrame`] into locals; configuration, spacings and frame
//! are committed together only when everything succeeded. A failed setter
//! or recompute leaves the previous state untouched.

use tracing::{debug, warn};

use crate::config::{AxisConfig, GridConfig, GridSpacing};
use crate::error::{Error, Result};
use crate::grid::{self, GridLineSegment};
use crate::labels::{format_tick, LabelFormat, LabelStyle};
use crate::projection::{AxisRole, Projection};
use crate::ticks::{
    check_consistency, locate, locate_minor, recommend, sample, Spacing, Tick, TickSpacing,
};
use crate::viewport::{Edge, Viewport, ViewportListener};

/// Major and minor ticks on one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeTicks {
    pub edge: Edge,
    pub major: Vec<Tick>,
    pub minor: Vec<Tick>,
}

/// A rendered label anchored at a major tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub px: f64,
    pub py: f64,
    pub index: i64,
    pub text: String,
}

/// Everything drawn for one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTicks {
    pub role: AxisRole,
    /// `None` when the visible span is zero.
    pub spacing: Option<Spacing>,
    pub edges: Vec<EdgeTicks>,
    pub labels: Vec<TickLabel>,
}

impl AxisTicks {
    pub fn edge(&self, edge: Edge) -> Option<&EdgeTicks> {
        self.edges.iter().find(|e| e.edge == edge)
    }
}

/// One complete redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub x: AxisTicks,
    pub y: AxisTicks,
    pub grid: Vec<GridLineSegment>,
}

impl RenderFrame {
    pub fn axis(&self, role: AxisRole) -> &AxisTicks {
        match role {
            AxisRole::X => &self.x,
            AxisRole::Y => &self.y,
        }
    }

    /// Hand the frame to a rendering backend.
    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        sink.draw_ticks(&self.x);
        sink.draw_ticks(&self.y);
        if !self.grid.is_empty() {
            sink.draw_gridlines(&self.grid);
        }
    }
}

/// Rendering backend consuming ticks, labels and gridlines.
pub trait RenderSink {
    fn draw_ticks(&mut self, axis: &AxisTicks);
    fn draw_gridlines(&mut self, segments: &[GridLineSegment]);
}

/// Ticks, labels and gridlines for a projection in a moving viewport.
#[derive(Debug, Clone)]
pub struct CelestialAxes<P> {
    projection: P,
    viewport: Viewport,
    axes: [AxisConfig; 2],
    grid: GridConfig,
    frame: Option<RenderFrame>,
}

impl<P: Projection> CelestialAxes<P> {
    /// Axes with default configuration; nothing is computed until the first
    /// [`recompute`](Self::recompute) or setter call.
    pub fn new(projection: P, viewport: Viewport) -> Self {
        let frame = projection.frame();
        let axes = AxisRole::ALL
            .map(|role| AxisConfig::new(role, projection.coord_kind(role), frame));
        Self {
            projection,
            viewport,
            axes,
            grid: GridConfig::default(),
            frame: None,
        }
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self, role: AxisRole) -> &AxisConfig {
        &self.axes[role.index()]
    }

    pub fn grid_config(&self) -> &GridConfig {
        &self.grid
    }

    /// The last successfully computed frame.
    pub fn frame(&self) -> Option<&RenderFrame> {
        self.frame.as_ref()
    }

    /// Spacing resolved by the last successful recompute.
    pub fn spacing(&self, role: AxisRole) -> Option<Spacing> {
        self.axes[role.index()].current
    }

    /// Draw the last frame, if any.
    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        if let Some(frame) = &self.frame {
            frame.render(sink);
        }
    }

    /// Recompute the frame for the current configuration and viewport.
    pub fn recompute(&mut self) -> Result<&RenderFrame> {
        let axes = self.axes.clone();
        let grid = self.grid.clone();
        self.commit(axes, grid, self.viewport)
    }

    /// Move to a new viewport; on failure the previous viewport and frame
    /// are kept.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<&RenderFrame> {
        let axes = self.axes.clone();
        let grid = self.grid.clone();
        self.commit(axes, grid, viewport)
    }

    /// Set the tick spacing: `"auto"` or a number of degrees (world units
    /// for scalar axes).
    pub fn set_spacing(&mut self, role: AxisRole, spacing: &str) -> Result<&RenderFrame> {
        let requested: TickSpacing = spacing.parse()?;
        let mut axes = self.axes.clone();
        let config = &mut axes[role.index()];
        if let TickSpacing::Fixed(value) = requested {
            let resolved = Spacing::fixed(value, self.projection.coord_kind(role))?;
            check_consistency(&config.format, &resolved)?;
        }
        config.spacing = requested;
        self.commit(axes, self.grid.clone(), self.viewport)
    }

    /// Set the label format, e.g. `"hh:mm:ss.ss"`, `"ddd.dddd"` or `"%.2f"`.
    pub fn set_format(&mut self, role: AxisRole, format: &str) -> Result<&RenderFrame> {
        let format: LabelFormat = format.parse()?;
        let kind = self.projection.coord_kind(role);
        if !format.accepts(kind) {
            return Err(Error::InvalidFormat(format!(
                "{format} cannot label a {kind:?} axis"
            )));
        }
        let mut axes = self.axes.clone();
        let config = &mut axes[role.index()];
        if let TickSpacing::Fixed(value) = config.spacing {
            check_consistency(&format, &Spacing::fixed(value, kind)?)?;
        }
        config.format = format;
        self.commit(axes, self.grid.clone(), self.viewport)
    }

    /// Set the label style: `"plain"`, `"colons"` or `"latex"`.
    pub fn set_style(&mut self, role: AxisRole, style: &str) -> Result<&RenderFrame> {
        let style: LabelStyle = style.parse()?;
        let mut axes = self.axes.clone();
        axes[role.index()].style = style;
        self.commit(axes, self.grid.clone(), self.viewport)
    }

    pub fn set_grid_visible(&mut self, visible: bool) -> Result<&RenderFrame> {
        let mut grid = self.grid.clone();
        grid.visible = visible;
        self.commit(self.axes.clone(), grid, self.viewport)
    }

    pub fn set_grid_spacing(
        &mut self,
        role: AxisRole,
        spacing: GridSpacing,
    ) -> Result<&RenderFrame> {
        if let GridSpacing::Fixed(value) = spacing {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidSpacing(format!("grid spacing {value}")));
            }
        }
        let mut grid = self.grid.clone();
        *grid.spacing_mut(role) = spacing;
        self.commit(self.axes.clone(), grid, self.viewport)
    }

    /// Minor intervals per major interval; `0` or `1` disables minor ticks.
    pub fn set_minor_frequency(
        &mut self,
        role: AxisRole,
        frequency: u32,
    ) -> Result<&RenderFrame> {
        let mut axes = self.axes.clone();
        axes[role.index()].minor_frequency = frequency;
        self.commit(axes, self.grid.clone(), self.viewport)
    }

    /// Move the labels of `role` to `edge`, which must be one of its two
    /// edges.
    pub fn set_label_edge(&mut self, role: AxisRole, edge: Edge) -> Result<&RenderFrame> {
        if !Edge::for_axis(role).contains(&edge) {
            return Err(Error::InvalidEdge(format!(
                "{edge:?} edge cannot carry {role:?} labels"
            )));
        }
        let mut axes = self.axes.clone();
        axes[role.index()].label_edge = edge;
        self.commit(axes, self.grid.clone(), self.viewport)
    }

    fn commit(
        &mut self,
        mut axes: [AxisConfig; 2],
        grid: GridConfig,
        viewport: Viewport,
    ) -> Result<&RenderFrame> {
        let frame = compute(&self.projection, &axes, &grid, &viewport)?;
        axes[0].current = frame.x.spacing;
        axes[1].current = frame.y.spacing;
        self.axes = axes;
        self.grid = grid;
        self.viewport = viewport;
        Ok(&*self.frame.insert(frame))
    }
}

impl<P: Projection> ViewportListener for CelestialAxes<P> {
    fn on_change(&mut self, viewport: Viewport) {
        if let Err(e) = self.set_viewport(viewport) {
            warn!("keeping previous ticks and gridlines: {}", e);
        }
    }
}

/// Ticks and labels for one axis.
fn axis_ticks<P: Projection + ?Sized>(
    projection: &P,
    role: AxisRole,
    config: &AxisConfig,
    viewport: &Viewport,
) -> Result<AxisTicks> {
    let kind = projection.coord_kind(role);
    let spacing = match config.spacing {
        TickSpacing::Auto => recommend(role, projection, viewport, &config.format)?,
        TickSpacing::Fixed(value) => Some(Spacing::fixed(value, kind)?),
    };

    let mut ticks = AxisTicks {
        role,
        spacing,
        edges: Vec::with_capacity(2),
        labels: Vec::new(),
    };
    let Some(spacing) = spacing else {
        return Ok(ticks);
    };

    for edge in Edge::for_axis(role) {
        let s = sample(projection, edge, viewport)?;
        ticks.edges.push(EdgeTicks {
            edge,
            major: locate(&s, spacing.value(), role),
            minor: locate_minor(&s, spacing.value(), config.minor_frequency, role),
        });
    }

    if let Some(edge) = ticks.edge(config.label_edge) {
        let major = &edge.major;
        let mut labels = Vec::with_capacity(major.len());
        for (i, tick) in major.iter().enumerate() {
            // x labels are shortened against the previous tick, y labels
            // against the next one
            let neighbor = match role {
                AxisRole::X => i.checked_sub(1).map(|j| major[j].index),
                AxisRole::Y => major.get(i + 1).map(|t| t.index),
            };
            let text = format_tick(
                tick.index,
                &spacing,
                &config.format,
                config.style,
                kind,
                neighbor,
            )?;
            labels.push(TickLabel {
                px: tick.px,
                py: tick.py,
                index: tick.index,
                text,
            });
        }
        ticks.labels = labels;
    }
    Ok(ticks)
}

fn grid_spacing<P: Projection + ?Sized>(
    projection: &P,
    role: AxisRole,
    requested: GridSpacing,
    ticks: &AxisTicks,
    format: &LabelFormat,
    viewport: &Viewport,
) -> Result<f64> {
    let spacing = match requested {
        GridSpacing::Tick => ticks.spacing,
        GridSpacing::Auto => recommend(role, projection, viewport, format)?,
        GridSpacing::Fixed(value) => return Ok(value),
    };
    // zero disables the family
    Ok(spacing.map_or(0.0, |s| s.value()))
}

/// Build a complete frame without touching any state.
fn compute<P: Projection + ?Sized>(
    projection: &P,
    axes: &[AxisConfig; 2],
    grid: &GridConfig,
    viewport: &Viewport,
) -> Result<RenderFrame> {
    let x = axis_ticks(projection, AxisRole::X, &axes[0], viewport)?;
    let y = axis_ticks(projection, AxisRole::Y, &axes[1], viewport)?;

    let segments = if grid.visible {
        let xs = grid_spacing(
            projection,
            AxisRole::X,
            grid.x_spacing,
            &x,
            &axes[0].format,
            viewport,
        )?;
        let ys = grid_spacing(
            projection,
            AxisRole::Y,
            grid.y_spacing,
            &y,
            &axes[1].format,
            viewport,
        )?;
        grid::build(projection, viewport, xs, ys)?
    } else {
        Vec::new()
    };

    debug!(
        "frame: x spacing {:?}, {} x labels, y spacing {:?}, {} y labels, {} grid segments",
        x.spacing.map(|s| s.to_string()),
        x.labels.len(),
        y.spacing.map(|s| s.to_string()),
        y.labels.len(),
        segments.len()
    );

    Ok(RenderFrame {
        viewport: *viewport,
        x,
        y,
        grid: segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{CoordKind, LinearProjection, TanProjection};

    fn small_field() -> CelestialAxes<TanProjection> {
        let proj = TanProjection::new([180.0, 0.0], [8.5, 8.5], [-0.01, 0.01]).unwrap();
        CelestialAxes::new(proj, Viewport::full_image(16, 16))
    }

    #[test]
    fn defaults_follow_projection() {
        let axes = small_field();
        assert_eq!(axes.config(AxisRole::X).format.to_string(), "hh:mm:ss.ss");
        assert_eq!(axes.config(AxisRole::Y).format.to_string(), "dd:mm:ss.s");
        assert!(axes.frame().is_none());
    }

    #[test]
    fn recompute_commits_spacing_and_labels() {
        let mut axes = small_field();
        let frame = axes.recompute().unwrap().clone();
        assert!(!frame.x.labels.is_empty());
        assert!(!frame.y.labels.is_empty());
        assert_eq!(frame.x.edges.len(), 2);
        assert!(frame.grid.is_empty());
        assert_eq!(axes.spacing(AxisRole::X), frame.x.spacing);
        // ticks run in index order: 179.925° is the first, and its
        // successors only differ in seconds
        assert_eq!(frame.x.labels[0].text, "11h59m42.00s");
        assert_eq!(frame.x.labels[1].text, "48.00s");
        assert!(frame.x.labels.iter().any(|l| l.text == "12h00m00.00s"));
    }

    #[test]
    fn invalid_setters_keep_state() {
        let mut axes = small_field();
        axes.recompute().unwrap();
        let before = axes.frame().cloned();

        assert!(matches!(
            axes.set_style(AxisRole::X, "fancy"),
            Err(Error::InvalidStyle(_))
        ));
        assert!(matches!(
            axes.set_format(AxisRole::X, "dd:xx"),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            axes.set_format(AxisRole::X, "%g"),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            axes.set_spacing(AxisRole::Y, "-3"),
            Err(Error::InvalidSpacing(_))
        ));
        assert!(matches!(
            axes.set_label_edge(AxisRole::X, Edge::Left),
            Err(Error::InvalidEdge(_))
        ));
        assert!(axes.set_grid_spacing(AxisRole::X, GridSpacing::Fixed(0.0)).is_err());

        assert_eq!(axes.frame().cloned(), before);
        assert_eq!(axes.config(AxisRole::X).style, LabelStyle::Plain);
    }

    #[test]
    fn explicit_spacing_must_match_format() {
        let mut axes = small_field();
        axes.set_format(AxisRole::Y, "dd:mm").unwrap();
        let half_arcsec = format!("{}", 0.5 / 3600.0);
        assert!(matches!(
            axes.set_spacing(AxisRole::Y, &half_arcsec),
            Err(Error::InconsistentSpacing { .. })
        ));
        assert_eq!(axes.config(AxisRole::Y).spacing, TickSpacing::Auto);

        axes.set_format(AxisRole::Y, "dd:mm:ss.ss").unwrap();
        axes.set_spacing(AxisRole::Y, &half_arcsec).unwrap();
        // the format can no longer be coarsened
        assert!(axes.set_format(AxisRole::Y, "dd:mm").is_err());
        assert_eq!(axes.config(AxisRole::Y).format.to_string(), "dd:mm:ss.ss");
    }

    #[test]
    fn grid_follows_tick_spacing() {
        let mut axes = small_field();
        let frame = axes.set_grid_visible(true).unwrap();
        assert!(!frame.grid.is_empty());
        assert!(frame.grid.iter().any(|l| l.family == AxisRole::X));
        assert!(frame.grid.iter().any(|l| l.family == AxisRole::Y));

        let frame = axes.set_grid_spacing(AxisRole::Y, GridSpacing::Fixed(0.05)).unwrap();
        let parallels = frame.grid.iter().filter(|l| l.family == AxisRole::Y).count();
        // -0.05, 0, 0.05
        assert_eq!(parallels, 3);
    }

    #[test]
    fn label_edge_and_style() {
        let mut axes = small_field();
        let frame = axes.set_label_edge(AxisRole::Y, Edge::Right).unwrap();
        assert!(frame.y.labels.iter().all(|l| (l.px - 16.5).abs() < 1e-9));
        let frame = axes.set_style(AxisRole::Y, "latex").unwrap();
        assert!(frame.y.labels.iter().all(|l| l.text.starts_with('$') && l.text.ends_with('$')));
    }

    #[test]
    fn minor_ticks_can_be_disabled() {
        let mut axes = small_field();
        let frame = axes.recompute().unwrap();
        assert!(frame.x.edges.iter().any(|e| !e.minor.is_empty()));
        let frame = axes.set_minor_frequency(AxisRole::X, 1).unwrap();
        assert!(frame.x.edges.iter().all(|e| e.minor.is_empty()));
    }

    #[test]
    fn scalar_axes() {
        let proj = LinearProjection::new(
            [0.0, 100.0],
            [1.0, 1.0],
            [0.5, 10.0],
            [CoordKind::Scalar, CoordKind::Scalar],
        )
        .unwrap();
        let mut axes = CelestialAxes::new(proj, Viewport::full_image(20, 20));
        let frame = axes.recompute().unwrap();
        assert_eq!(frame.x.spacing, Some(Spacing::Scalar(2.0)));
        assert!(frame.x.labels.iter().any(|l| l.text == "4"));
        axes.set_format(AxisRole::Y, "%.1f").unwrap();
        let frame = axes.set_spacing(AxisRole::Y, "25").unwrap();
        assert!(frame.y.labels.iter().any(|l| l.text == "150.0"));
    }

    struct Recorder {
        axes: usize,
        segments: usize,
    }

    impl RenderSink for Recorder {
        fn draw_ticks(&mut self, _axis: &AxisTicks) {
            self.axes += 1;
        }

        fn draw_gridlines(&mut self, segments: &[GridLineSegment]) {
            self.segments += segments.len();
        }
    }

    #[test]
    fn render_to_sink() {
        let mut axes = small_field();
        let mut sink = Recorder { axes: 0, segments: 0 };
        axes.render(&mut sink);
        assert_eq!(sink.axes, 0);

        let count = axes.set_grid_visible(true).unwrap().grid.len();
        axes.render(&mut sink);
        assert_eq!(sink.axes, 2);
        assert_eq!(sink.segments, count);
    }
}
