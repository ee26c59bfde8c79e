//! PNG export.
//!
//! Radiance is multiplied by an exposure factor and saturated to `[0, 255]`
//! per channel. Pixel `(x, y)` of the image is column `x`, row `y` of the
//! sphere; channels are written R, G, B.

use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::PathBuf;

use image::{ImageFormat, Rgb, RgbImage};
use log::info;

use super::SphereSink;
use crate::capture::RadianceSphere;
use crate::error::Result;

/// Convert a sphere to an 8-bit RGB image.
pub fn encode_rgb8(sphere: &RadianceSphere, exposure: f64) -> RgbImage {
    RgbImage::from_fn(sphere.width() as u32, sphere.height() as u32, |x, y| {
        let r = sphere.get(y as usize, x as usize) * exposure;
        Rgb([quantize(r.x), quantize(r.y), quantize(r.z)])
    })
}

/// Write a sphere as PNG to the given writer.
pub fn write_png<W: Write + Seek>(
    sphere: &RadianceSphere,
    exposure: f64,
    writer: &mut W,
) -> Result<()> {
    encode_rgb8(sphere, exposure).write_to(writer, ImageFormat::Png)?;
    Ok(())
}

fn quantize(v: f64) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, 255.0) as u8
    }
}

/// Writes each capture to `<directory>/<destination>.png`.
#[derive(Clone, Debug)]
pub struct PngSink {
    directory: PathBuf,
    exposure: f64,
}

impl PngSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            exposure: 1.0,
        }
    }

    pub fn with_exposure(mut self, exposure: f64) -> Self {
        self.exposure = exposure;
        self
    }

    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.directory.join(format!("{destination}.png"))
    }
}

impl SphereSink for PngSink {
    fn write(&mut self, sphere: &RadianceSphere, destination: &str) -> Result<()> {
        fs::create_dir_all(&self.directory)?;
        let path = self.path_for(destination);
        let mut file = BufWriter::new(File::create(&path)?);
        write_png(sphere, self.exposure, &mut file)?;
        file.flush()?;
        info!("wrote {}x{} sphere to {}", sphere.width(), sphere.height(), path.display());
        Ok(())
    }
}
