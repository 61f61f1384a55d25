//! # skygrid
//!
//! Tick, gridline and label placement for celestial (WCS) image plots.
//!
//! Given a pixel ↔ world [`Projection`] and the visible pixel [`Viewport`],
//! `skygrid` decides where the axis ticks go, what their labels say and how
//! the coordinate grid runs across the image. It produces plain geometry;
//! drawing is left to a [`RenderSink`].
//!
//! ## Features
//!
//! - **Nice spacings**: tick spacings snap to "round" sexagesimal values
//!   (15', 30", 2<sup>s</sup>, ...) or 1-2-5 decimal steps
//! - **Sexagesimal labels**: `hh:mm:ss.ss`, `dd:mm:ss`, `ddd.dddd` or
//!   printf-like scalar formats, with plain, colon or LaTeX separators
//! - **Redundancy suppression**: a label only repeats the fields that
//!   changed since its neighbour
//! - **Wrap-aware**: ticks and gridlines survive the 0°/360° branch cut and
//!   the celestial poles
//! - **Atomic updates**: a failed setter or recompute keeps the previous
//!   frame
//!
//! ## Example
//!
//! ```
//! use skygrid::{AxisRole, CelestialAxes, TanProjection, Viewport};
//!
//! // 16×16 image at RA 12h, Dec 0°, 36" pixels
//! let proj = TanProjection::new([180.0, 0.0], [8.5, 8.5], [-0.01, 0.01])?;
//! let mut axes = CelestialAxes::new(proj, Viewport::full_image(16, 16));
//!
//! axes.set_grid_visible(true)?;
//! let frame = axes.set_format(AxisRole::Y, "dd:mm:ss")?;
//! for label in &frame.y.labels {
//!     println!("{:>10} at y = {:.2}", label.text, label.py);
//! }
//! println!("{} gridline segments", frame.grid.len());
//! # Ok::<(), skygrid::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! 1. **Sampling**: each viewport edge is sampled at one-pixel steps and
//!    converted to world coordinates, unwrapping longitudes
//! 2. **Spacing**: the visible span is divided into about five intervals
//!    and rounded to a nice value no finer than the label format can show
//! 3. **Location**: ticks are placed wherever the sampled coordinate
//!    crosses a multiple of the spacing
//! 4. **Labelling**: each major tick on the label edge is formatted,
//!    dropping fields shared with its neighbour
//! 5. **Gridlines**: edge crossings of the same line are paired and traced
//!    through the projection; parallels around a visible pole become closed
//!    circles

pub mod angle;
pub mod axes;
pub mod config;
pub mod error;
pub mod grid;
pub mod labels;
pub mod projection;
pub mod ticks;
pub mod viewport;

pub use angle::{AnglePattern, Precision, SexagesimalAngle, Separators};
pub use axes::{AxisTicks, CelestialAxes, EdgeTicks, RenderFrame, RenderSink, TickLabel};
pub use config::{AxisConfig, GridConfig, GridSpacing};
pub use error::{Error, Result};
pub use grid::GridLineSegment;
pub use labels::{LabelFormat, LabelStyle, ScalarFormat};
pub use projection::{
    AxisRole, CelestialFrame, CoordKind, LinearProjection, Projection, TanProjection,
};
pub use ticks::{Spacing, Tick, TickSpacing};
pub use viewport::{Edge, Viewport, ViewportListener};
