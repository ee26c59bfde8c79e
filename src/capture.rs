//! Equirectangular radiance capture around a viewpoint.
//!
//! Rows map the polar angle `theta` over `[0, π]` (both poles included),
//! columns map the azimuth `phi` over `[0, 2π)`. There are always twice as
//! many columns as rows.

use std::f64::consts::PI;

use rayon::prelude::*;

use crate::error::{invalid_argument, Result};
use crate::light::LightField;
use crate::math::{Point3, Radiance, Vector3};

/// A 2:1 image of radiance samples, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct RadianceSphere {
    height: usize,
    pixels: Vec<Radiance>,
}

impl RadianceSphere {
    /// A black sphere with `height` rows and `2 * height` columns.
    pub fn new(height: usize) -> Self {
        Self {
            height,
            pixels: vec![Radiance::zeros(); 2 * height * height],
        }
    }

    /// Wrap an existing row-major buffer. `width` must be exactly twice
    /// `height` and `pixels` must hold `width * height` samples.
    pub fn from_pixels(height: usize, width: usize, pixels: Vec<Radiance>) -> Result<Self> {
        if width != 2 * height {
            return Err(invalid_argument(format!(
                "radiance sphere must be 2:1, got {width}x{height}"
            )));
        }
        if pixels.len() != width * height {
            return Err(invalid_argument(format!(
                "expected {} pixels for {width}x{height}, got {}",
                width * height,
                pixels.len()
            )));
        }
        Ok(Self { height, pixels })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        2 * self.height
    }

    /// Panics if `row` or `col` is out of range.
    pub fn get(&self, row: usize, col: usize) -> Radiance {
        self.pixels[self.offset(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, radiance: Radiance) {
        let i = self.offset(row, col);
        self.pixels[i] = radiance;
    }

    pub fn pixels(&self) -> &[Radiance] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Radiance]> {
        self.pixels.chunks(self.width().max(1))
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(row < self.height && col < self.width(), "pixel ({row}, {col}) out of range");
        row * self.width() + col
    }
}

/// Polar angle of `row` in a sphere of `height` rows. `height` must be at
/// least 2.
pub(crate) fn theta(row: usize, height: usize) -> f64 {
    PI * row as f64 / (height - 1) as f64
}

/// Azimuth of `col` in a sphere of `height` rows.
pub(crate) fn phi(col: usize, height: usize) -> f64 {
    2.0 * PI * col as f64 / (2 * height) as f64
}

/// Unit direction for polar angle `theta` and azimuth `phi` (+Z at `theta = 0`).
pub fn direction(theta: f64, phi: f64) -> Vector3 {
    Vector3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos())
}

/// Sample `field` from `viewpoint` in every pixel direction of a sphere with
/// `resolution` rows. Rows are rendered in parallel; the field is only read.
pub fn render(field: &LightField, viewpoint: Point3, resolution: usize) -> Result<RadianceSphere> {
    if resolution < 2 {
        return Err(invalid_argument(format!(
            "capture needs at least 2 rows to span both poles, got {resolution}"
        )));
    }
    let width = 2 * resolution;
    let mut pixels = vec![Radiance::zeros(); width * resolution];

    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out)| {
            let th = theta(row, resolution);
            for (col, px) in out.iter_mut().enumerate() {
                *px = field.sample(viewpoint, direction(th, phi(col, resolution)));
            }
        });

    RadianceSphere::from_pixels(resolution, width, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn angles_cover_poles_and_full_azimuth() {
        assert_relative_eq!(theta(0, 5), 0.0);
        assert_relative_eq!(theta(4, 5), PI);
        assert_relative_eq!(phi(5, 5), PI);
        assert!(phi(9, 5) < 2.0 * PI);
    }

    #[test]
    fn degenerate_resolutions_are_rejected_before_sampling() {
        let field = LightField::new(1.0).unwrap();
        assert!(render(&field, Point3::origin(), 0).is_err());
        assert!(render(&field, Point3::origin(), 1).is_err());
    }

    #[test]
    fn direction_is_unit() {
        let d = direction(1.1, 4.0);
        assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-12);
    }
}
