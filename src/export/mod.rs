//! Writers for captured radiance spheres.
//!
//! The simulation hands every capture to a [`SphereSink`] together with a
//! destination name; the sink owns encoding and I/O.
//! - **PNG** — 8-bit RGB, exposure-scaled and saturated
//! - **Memory** — keeps every capture, for tests and embedding

pub mod png;

pub use png::{encode_rgb8, write_png, PngSink};

use crate::capture::RadianceSphere;
use crate::error::Result;

/// Destination for captured spheres.
pub trait SphereSink {
    fn write(&mut self, sphere: &RadianceSphere, destination: &str) -> Result<()>;
}

impl<S: SphereSink + ?Sized> SphereSink for &mut S {
    fn write(&mut self, sphere: &RadianceSphere, destination: &str) -> Result<()> {
        (**self).write(sphere, destination)
    }
}

/// Keeps every capture in memory, in the order received.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub frames: Vec<(String, RadianceSphere)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SphereSink for MemorySink {
    fn write(&mut self, sphere: &RadianceSphere, destination: &str) -> Result<()> {
        self.frames.push((destination.to_string(), sphere.clone()));
        Ok(())
    }
}
