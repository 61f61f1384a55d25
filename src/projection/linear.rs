//! Independent linear pixel ↔ world axes.
//!
//! `world = crval + cdelt × (pixel − crpix)` per axis. Longitude axes wrap
//! into `[0, 360)`; on the way back the branch nearest to `crval` is used.
//! Useful for plate-carrée style celestial images and for non-celestial
//! axes (position–velocity diagrams, spectra).

use crate::error::{Error, Result};
use crate::projection::{check_lengths, AxisRole, CelestialFrame, CoordKind, Projection};

#[derive(Debug, Clone)]
pub struct LinearProjection {
    /// World value at the reference pixel, per axis.
    pub crval: [f64; 2],
    /// Reference pixel (1-based FITS convention).
    pub crpix: [f64; 2],
    /// World units per pixel, per axis.
    pub cdelt: [f64; 2],
    kinds: [CoordKind; 2],
    frame: CelestialFrame,
}

impl LinearProjection {
    pub fn new(
        crval: [f64; 2],
        crpix: [f64; 2],
        cdelt: [f64; 2],
        kinds: [CoordKind; 2],
    ) -> Result<Self> {
        if cdelt.iter().any(|d| *d == 0.0 || !d.is_finite()) {
            return Err(Error::Projection(format!("invalid CDELT {:?}", cdelt)));
        }
        let frame = if kinds.iter().any(|k| k.is_celestial()) {
            CelestialFrame::Equatorial
        } else {
            CelestialFrame::Other
        };
        Ok(Self {
            crval,
            crpix,
            cdelt,
            kinds,
            frame,
        })
    }

    /// Longitude on x, latitude on y.
    pub fn celestial(crval: [f64; 2], crpix: [f64; 2], cdelt: [f64; 2]) -> Result<Self> {
        Self::new(crval, crpix, cdelt, [CoordKind::Longitude, CoordKind::Latitude])
    }

    pub fn with_frame(mut self, frame: CelestialFrame) -> Self {
        self.frame = frame;
        self
    }

    fn to_world(&self, axis: usize, pixel: f64) -> Result<f64> {
        let value = self.crval[axis] + self.cdelt[axis] * (pixel - self.crpix[axis]);
        match self.kinds[axis] {
            CoordKind::Longitude => Ok(value.rem_euclid(360.0)),
            CoordKind::Latitude if !(-90.0..=90.0).contains(&value) => Err(Error::Projection(
                format!("pixel {pixel} maps to latitude {value} beyond the pole"),
            )),
            _ => Ok(value),
        }
    }

    fn to_pixel(&self, axis: usize, world: f64) -> f64 {
        let mut offset = world - self.crval[axis];
        if self.kinds[axis] == CoordKind::Longitude {
            offset = (offset + 180.0).rem_euclid(360.0) - 180.0;
        }
        self.crpix[axis] + offset / self.cdelt[axis]
    }
}

impl Projection for LinearProjection {
    fn pixel_to_world(&self, x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        check_lengths(x, y)?;
        let mut wx = Vec::with_capacity(x.len());
        let mut wy = Vec::with_capacity(y.len());
        for (&px, &py) in x.iter().zip(y) {
            if !px.is_finite() || !py.is_finite() {
                return Err(Error::Projection(format!(
                    "non-finite pixel position ({px}, {py})"
                )));
            }
            wx.push(self.to_world(0, px)?);
            wy.push(self.to_world(1, py)?);
        }
        Ok((wx, wy))
    }

    fn world_to_pixel(&self, wx: &[f64], wy: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        check_lengths(wx, wy)?;
        Ok(wx
            .iter()
            .zip(wy)
            .map(|(&a, &b)| (self.to_pixel(0, a), self.to_pixel(1, b)))
            .unzip())
    }

    fn coord_kind(&self, role: AxisRole) -> CoordKind {
        self.kinds[role.index()]
    }

    fn pixel_scale(&self) -> f64 {
        (self.cdelt[0] * self.cdelt[1]).abs().sqrt()
    }

    fn frame(&self) -> CelestialFrame {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_mapping() {
        let proj = LinearProjection::new(
            [0.0, 1420.0],
            [1.0, 1.0],
            [2.0, 0.5],
            [CoordKind::Scalar, CoordKind::Scalar],
        )
        .unwrap();
        let (wx, wy) = proj.pixel_to_world(&[1.0, 11.0], &[1.0, 5.0]).unwrap();
        assert_eq!(wx, vec![0.0, 20.0]);
        assert_eq!(wy, vec![1420.0, 1422.0]);
        assert_eq!(proj.frame(), CelestialFrame::Other);
    }

    #[test]
    fn test_longitude_wraps_and_returns_nearest_branch() {
        let proj = LinearProjection::celestial([2.0, 0.0], [10.0, 10.0], [-1.0, 1.0]).unwrap();
        let (wx, _) = proj.pixel_to_world(&[15.0], &[10.0]).unwrap();
        assert!((wx[0] - 357.0).abs() < 1e-12);
        let (px, _) = proj.world_to_pixel(&[357.0], &[0.0]).unwrap();
        assert!((px[0] - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_latitude_beyond_pole_fails() {
        let proj = LinearProjection::celestial([0.0, 85.0], [1.0, 1.0], [1.0, 1.0]).unwrap();
        assert!(matches!(
            proj.pixel_to_world(&[1.0], &[20.0]),
            Err(Error::Projection(_))
        ));
    }

    #[test]
    fn test_zero_cdelt_rejected() {
        assert!(LinearProjection::celestial([0.0, 0.0], [1.0, 1.0], [0.0, 1.0]).is_err());
    }
}
