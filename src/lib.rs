//! Growth of a branching plant and the light it casts, one step at a time.
//!
//! A [`plant::BranchTree`] grows and subdivides its edges, [`raster`] turns it
//! into occupied voxel cells, [`light::LightField`] answers nearest-hit ray
//! queries against those cells, and [`capture::render`] sweeps every direction
//! from a viewpoint into an equirectangular [`capture::RadianceSphere`].
//! [`bonsai::Bonsai`] runs the whole pipeline per simulation step.

pub mod bonsai;
pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod light;
pub mod math;
pub mod plant;
pub mod raster;
pub mod voxel;

pub use bonsai::{Bonsai, RunSummary, StepReport};
pub use error::{Error, Result};
