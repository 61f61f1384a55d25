//! The WCS boundary: pixel ↔ world transforms consumed by the placement engine.
//!
//! The engine treats the projection as a black-box bijection. Anything that
//! implements [`Projection`] can be plotted; two reference implementations
//! are provided:
//!
//! - [`TanProjection`]: gnomonic (TAN) projection with a CD matrix
//! - [`LinearProjection`]: independent linear axes (CAR-like celestial
//!   axes, or plain scalar axes such as velocity or wavelength)
//!
//! # Coordinate conventions
//!
//! - **Pixel coordinates** follow FITS: the centre of the first pixel is
//!   `(1, 1)`, so an `nx × ny` image spans `[0.5, nx + 0.5] × [0.5, ny + 0.5]`.
//! - **World coordinates** are returned in the order of the pixel axes they
//!   are associated with (world-x, world-y), in degrees for celestial axes.

pub mod linear;
pub mod tan;

pub use linear::LinearProjection;
pub use tan::TanProjection;

use crate::error::{Error, Result};

/// Which plot axis a quantity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisRole {
    X,
    Y,
}

impl AxisRole {
    pub const ALL: [AxisRole; 2] = [AxisRole::X, AxisRole::Y];

    /// Index into `(x, y)` pairs.
    pub fn index(self) -> usize {
        match self {
            AxisRole::X => 0,
            AxisRole::Y => 1,
        }
    }

    pub fn other(self) -> AxisRole {
        match self {
            AxisRole::X => AxisRole::Y,
            AxisRole::Y => AxisRole::X,
        }
    }
}

/// What kind of coordinate a world axis carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoordKind {
    /// Periodic angle in `[0, 360)`.
    Longitude,
    /// Angle in `[-90, 90]`.
    Latitude,
    /// Plain, non-angular quantity.
    Scalar,
}

impl CoordKind {
    pub fn is_celestial(self) -> bool {
        !matches!(self, CoordKind::Scalar)
    }
}

/// Celestial reference frame of a projection; selects default label formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CelestialFrame {
    /// RA/Dec; longitudes are labelled in hours by default.
    #[default]
    Equatorial,
    Galactic,
    Ecliptic,
    /// Anything else, including non-celestial data.
    Other,
}

/// A pixel ↔ world coordinate transform.
///
/// Both transforms are pure and vectorized over equal-length slices.
/// `pixel_to_world` must return finite values for every pixel inside the
/// plotted image; failures surface as [`Error::Projection`]. `world_to_pixel`
/// may return NaN for points that have no pixel position (e.g. the far
/// hemisphere of a gnomonic projection).
pub trait Projection {
    /// Map pixel positions to `(world-x, world-y)`.
    fn pixel_to_world(&self, x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)>;

    /// Map `(world-x, world-y)` to pixel positions.
    fn world_to_pixel(&self, wx: &[f64], wy: &[f64]) -> Result<(Vec<f64>, Vec<f64>)>;

    /// Kind of the world coordinate associated with a pixel axis.
    fn coord_kind(&self, role: AxisRole) -> CoordKind;

    /// Approximate angular size of a pixel in degrees (world units per pixel
    /// for scalar axes).
    fn pixel_scale(&self) -> f64;

    fn frame(&self) -> CelestialFrame {
        CelestialFrame::Equatorial
    }
}

impl<P: Projection + ?Sized> Projection for &P {
    fn pixel_to_world(&self, x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        (**self).pixel_to_world(x, y)
    }

    fn world_to_pixel(&self, wx: &[f64], wy: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        (**self).world_to_pixel(wx, wy)
    }

    fn coord_kind(&self, role: AxisRole) -> CoordKind {
        (**self).coord_kind(role)
    }

    fn pixel_scale(&self) -> f64 {
        (**self).pixel_scale()
    }

    fn frame(&self) -> CelestialFrame {
        (**self).frame()
    }
}

impl<P: Projection + ?Sized> Projection for Box<P> {
    fn pixel_to_world(&self, x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        (**self).pixel_to_world(x, y)
    }

    fn world_to_pixel(&self, wx: &[f64], wy: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        (**self).world_to_pixel(wx, wy)
    }

    fn coord_kind(&self, role: AxisRole) -> CoordKind {
        (**self).coord_kind(role)
    }

    fn pixel_scale(&self) -> f64 {
        (**self).pixel_scale()
    }

    fn frame(&self) -> CelestialFrame {
        (**self).frame()
    }
}

/// Reject mismatched input slices.
pub(crate) fn check_lengths(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::Projection(format!(
            "coordinate arrays differ in length ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

/// Map both world coordinates of a single point; returns `None` when the
/// point has no finite pixel position.
pub(crate) fn world_to_pixel_point<P: Projection + ?Sized>(
    projection: &P,
    wx: f64,
    wy: f64,
) -> Result<Option<(f64, f64)>> {
    let (px, py) = projection.world_to_pixel(&[wx], &[wy])?;
    match (px.first(), py.first()) {
        (Some(&x), Some(&y)) if x.is_finite() && y.is_finite() => Ok(Some((x, y))),
        _ => Ok(None),
    }
}
