//! Gnomonic (TAN) projection with a CD matrix.
//!
//! # Pipeline
//!
//! ```text
//! pixel → subtract CRPIX → CD (degrees) → inverse TAN at CRVAL → (lon, lat)
//! (lon, lat) → TAN at CRVAL → CD⁻¹ → add CRPIX → pixel
//! ```
//!
//! Reference: Calabretta & Greisen (2002), FITS WCS Paper II, §5.1.1.

use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};

use crate::error::{Error, Result};
use crate::projection::{check_lengths, AxisRole, CelestialFrame, CoordKind, Projection};

/// Points closer than this to the tangent plane's horizon (cosine of the
/// angular distance from CRVAL) have no projection.
const HORIZON: f64 = 1e-12;

/// Unit vector for `(lon, lat)` in degrees.
fn unit_vector(lon: f64, lat: f64) -> Vector3<f64> {
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

/// Rotation whose rows are the local east, north and outward directions
/// at `(lon, lat)` in degrees.
fn native_frame(lon: f64, lat: f64) -> Matrix3<f64> {
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    Matrix3::new(
        -sin_lon,
        cos_lon,
        0.0,
        -sin_lat * cos_lon,
        -sin_lat * sin_lon,
        cos_lat,
        cos_lat * cos_lon,
        cos_lat * sin_lon,
        sin_lat,
    )
}

/// Gnomonic projection described by FITS-style CRVAL/CRPIX/CD keywords.
#[derive(Debug, Clone)]
pub struct TanProjection {
    /// Reference point `(lon, lat)` in degrees.
    pub crval: [f64; 2],
    /// Reference pixel (1-based FITS convention).
    pub crpix: [f64; 2],
    /// Pixel → intermediate world matrix, degrees per pixel.
    cd: Matrix2<f64>,
    cd_inv: Matrix2<f64>,
    /// Celestial → (east, north, outward) at CRVAL.
    native: Matrix3<f64>,
    frame: CelestialFrame,
    /// World latitude is associated with the pixel x axis.
    transposed: bool,
}

impl TanProjection {
    /// Projection with a diagonal CD matrix (`CDELT1`, `CDELT2`).
    ///
    /// FITS images usually have `cdelt[0] < 0` so that longitude increases
    /// to the left.
    pub fn new(crval: [f64; 2], crpix: [f64; 2], cdelt: [f64; 2]) -> Result<Self> {
        Self::with_cd(crval, crpix, [[cdelt[0], 0.0], [0.0, cdelt[1]]])
    }

    /// Projection with a full CD matrix (rows: ξ, η), degrees per pixel.
    pub fn with_cd(crval: [f64; 2], crpix: [f64; 2], cd: [[f64; 2]; 2]) -> Result<Self> {
        if !(-90.0..=90.0).contains(&crval[1]) {
            return Err(Error::Projection(format!(
                "reference latitude {} outside [-90, 90]",
                crval[1]
            )));
        }
        let cd = Matrix2::new(cd[0][0], cd[0][1], cd[1][0], cd[1][1]);
        let cd_inv = cd
            .try_inverse()
            .filter(|inv| inv.iter().all(|v| v.is_finite()))
            .ok_or_else(|| Error::Projection("singular CD matrix".to_string()))?;
        Ok(Self {
            crval,
            crpix,
            cd,
            cd_inv,
            native: native_frame(crval[0], crval[1]),
            frame: CelestialFrame::Equatorial,
            transposed: false,
        })
    }

    pub fn with_frame(mut self, frame: CelestialFrame) -> Self {
        self.frame = frame;
        self
    }

    /// Associate latitude with the pixel x axis and longitude with y.
    pub fn transposed(mut self) -> Self {
        self.transposed = !self.transposed;
        self
    }

    /// Tangent-plane coordinates `(ξ, η)` in degrees, or `None` on or
    /// behind the horizon.
    fn to_plane(&self, lon: f64, lat: f64) -> Option<Vector2<f64>> {
        let n = self.native * unit_vector(lon, lat);
        (n.z > HORIZON).then(|| Vector2::new(n.x / n.z, n.y / n.z).map(f64::to_degrees))
    }

    /// `(lon, lat)` in degrees of tangent-plane `(ξ, η)` in degrees.
    fn from_plane(&self, plane: Vector2<f64>) -> (f64, f64) {
        let plane = plane.map(f64::to_radians);
        let v = self.native.tr_mul(&Vector3::new(plane.x, plane.y, 1.0));
        let lon = v.y.atan2(v.x).to_degrees().rem_euclid(360.0);
        let lat = v.z.atan2(v.x.hypot(v.y)).to_degrees();
        (lon, lat)
    }

    fn pixel_to_lonlat(&self, x: f64, y: f64) -> (f64, f64) {
        self.from_plane(self.cd * Vector2::new(x - self.crpix[0], y - self.crpix[1]))
    }

    fn lonlat_to_pixel(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self.to_plane(lon, lat) {
            Some(plane) => {
                let offset = self.cd_inv * plane;
                (offset.x + self.crpix[0], offset.y + self.crpix[1])
            }
            None => (f64::NAN, f64::NAN),
        }
    }
}

impl Projection for TanProjection {
    fn pixel_to_world(&self, x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        check_lengths(x, y)?;
        let mut wx = Vec::with_capacity(x.len());
        let mut wy = Vec::with_capacity(x.len());
        for (&px, &py) in x.iter().zip(y) {
            if !px.is_finite() || !py.is_finite() {
                return Err(Error::Projection(format!(
                    "non-finite pixel position ({px}, {py})"
                )));
            }
            let (lon, lat) = self.pixel_to_lonlat(px, py);
            if self.transposed {
                wx.push(lat);
                wy.push(lon);
            } else {
                wx.push(lon);
                wy.push(lat);
            }
        }
        Ok((wx, wy))
    }

    fn world_to_pixel(&self, wx: &[f64], wy: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        check_lengths(wx, wy)?;
        let (lons, lats) = if self.transposed { (wy, wx) } else { (wx, wy) };
        Ok(lons
            .iter()
            .zip(lats)
            .map(|(&lon, &lat)| self.lonlat_to_pixel(lon, lat))
            .unzip())
    }

    fn coord_kind(&self, role: AxisRole) -> CoordKind {
        match (role, self.transposed) {
            (AxisRole::X, false) | (AxisRole::Y, true) => CoordKind::Longitude,
            (AxisRole::Y, false) | (AxisRole::X, true) => CoordKind::Latitude,
        }
    }

    fn pixel_scale(&self) -> f64 {
        self.cd.determinant().abs().sqrt()
    }

    fn frame(&self) -> CelestialFrame {
        self.frame
    }
}
