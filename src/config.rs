//! Tunable constants for growth and for the per-step capture.

use crate::error::{invalid_argument, Result};
use crate::math::{Point3, Radiance};

/// Settings controlling how a [`BranchTree`](crate::plant::BranchTree) grows.
///
/// Lengths are in meters, times in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthSettings {
    /// Edge elongation speed (m/s).
    pub speed: f64,
    /// Edges at or above this length stop growing.
    pub saturation_length: f64,
    /// Edges strictly longer than this are split in two by `replicate`.
    pub split_threshold: f64,
    /// Length of the edge leading to a freshly sprouted growth tip.
    pub initial_edge_length: f64,
    /// Distance of the synthetic root anchor below the shoot anchor.
    pub anchor_offset: f64,
    /// Radius assigned to new nodes.
    pub node_radius: f64,
    /// Largest `dt` accepted by a single growth step. The speed is calibrated
    /// for sub-minute steps.
    pub max_step: f64,
}

impl Default for GrowthSettings {
    fn default() -> Self {
        Self {
            speed: 0.1e-3 / 60.0,
            saturation_length: 0.01,
            split_threshold: 0.003,
            initial_edge_length: 0.0001,
            anchor_offset: 0.0001,
            node_radius: 0.0001,
            max_step: 60.0,
        }
    }
}

impl GrowthSettings {
    /// Check that the settings describe a tree that can grow.
    ///
    /// One full step must not grow a split edge past twice the split
    /// threshold, so a single `replicate` pass leaves every edge at or below
    /// the threshold.
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("speed", self.speed),
            ("saturation_length", self.saturation_length),
            ("split_threshold", self.split_threshold),
            ("initial_edge_length", self.initial_edge_length),
            ("anchor_offset", self.anchor_offset),
            ("node_radius", self.node_radius),
            ("max_step", self.max_step),
        ];
        if let Some((name, v)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid_argument(format!("{name} must be finite, got {v}")));
        }
        if self.speed < 0.0 {
            return Err(invalid_argument(format!("speed must be non-negative, got {}", self.speed)));
        }
        if self.node_radius < 0.0 {
            return Err(invalid_argument(format!(
                "node radius must be non-negative, got {}",
                self.node_radius
            )));
        }
        if self.anchor_offset <= 0.0 {
            return Err(invalid_argument(format!(
                "anchor offset must be positive, got {}",
                self.anchor_offset
            )));
        }
        if self.max_step <= 0.0 {
            return Err(invalid_argument(format!(
                "max step must be positive, got {}",
                self.max_step
            )));
        }
        if !(self.split_threshold > 0.0 && self.split_threshold <= self.saturation_length) {
            return Err(invalid_argument(format!(
                "split threshold must lie in (0, {}], got {}",
                self.saturation_length, self.split_threshold
            )));
        }
        if !(self.initial_edge_length > 0.0 && self.initial_edge_length <= self.split_threshold) {
            return Err(invalid_argument(format!(
                "initial edge length must lie in (0, {}], got {}",
                self.split_threshold, self.initial_edge_length
            )));
        }
        if self.speed * self.max_step > self.split_threshold {
            return Err(invalid_argument(format!(
                "growth of {} m per step exceeds the split threshold {}",
                self.speed * self.max_step,
                self.split_threshold
            )));
        }
        Ok(())
    }
}

/// Settings for the simulation loop and the sphere captured each step.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationSettings {
    pub growth: GrowthSettings,
    /// Time advanced by each step of `Bonsai::run`.
    pub dt: f64,
    /// Voxel edge length used both for rasterizing and for the light field.
    pub cell_size: f64,
    /// Rows of the captured sphere; columns are twice this.
    pub resolution: usize,
    /// Observation point of the capture.
    pub viewpoint: Point3,
    /// Radiance given to every voxel of the rasterized plant.
    pub voxel_radiance: Radiance,
    /// Radiance returned for rays that hit nothing.
    pub escaped_radiance: Radiance,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            growth: GrowthSettings::default(),
            dt: 60.0,
            cell_size: 0.001,
            resolution: 250,
            viewpoint: Point3::new(0.03, 0.03, 0.03),
            voxel_radiance: Radiance::new(100.0, 200.0, 100.0),
            escaped_radiance: Radiance::new(100.0, 50.0, 50.0),
        }
    }
}

impl SimulationSettings {
    /// Check the capture settings, the growth settings and that `dt` is a
    /// step the tree accepts.
    pub fn validate(&self) -> Result<()> {
        self.growth.validate()?;
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(invalid_argument(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.resolution < 2 {
            return Err(invalid_argument(format!(
                "resolution must be at least 2, got {}",
                self.resolution
            )));
        }
        if !(self.dt.is_finite() && self.dt >= 0.0 && self.dt <= self.growth.max_step) {
            return Err(invalid_argument(format!(
                "dt must lie in [0, {}], got {}",
                self.growth.max_step, self.dt
            )));
        }
        Ok(())
    }
}
