//! The simulation loop.
//!
//! Each step grows the plant, rasterizes it, turns the occupied cells into a
//! light field and captures a radiance sphere from a fixed viewpoint, which
//! is handed to the configured [`SphereSink`].

use log::{info, warn};

use crate::capture::render;
use crate::config::SimulationSettings;
use crate::error::Result;
use crate::export::SphereSink;
use crate::light::LightField;
use crate::math::Point3;
use crate::plant::BranchTree;
use crate::raster::rasterize_with_cell_size;

/// What one step produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Zero-based index of the step.
    pub index: u64,
    /// Simulated time after the step, in seconds.
    pub timestamp: f64,
    pub nodes: usize,
    pub voxels: usize,
}

/// Outcome of [`Bonsai::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub skipped: usize,
}

/// A single plant growing at the origin, photographed every step.
pub struct Bonsai<S: SphereSink> {
    tree: BranchTree,
    settings: SimulationSettings,
    sink: S,
    /// Simulated seconds since creation.
    timestamp: f64,
    steps: u64,
}

impl<S: SphereSink> Bonsai<S> {
    /// A plant with default settings.
    pub fn new(sink: S) -> Self {
        let settings = SimulationSettings::default();
        Self {
            tree: BranchTree::new(Point3::origin()),
            settings,
            sink,
            timestamp: 0.0,
            steps: 0,
        }
    }

    /// Fails if `settings` does not pass [`SimulationSettings::validate`].
    pub fn with_settings(settings: SimulationSettings, sink: S) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            tree: BranchTree::with_settings(Point3::origin(), settings.growth.clone())?,
            settings,
            sink,
            timestamp: 0.0,
            steps: 0,
        })
    }

    pub fn tree(&self) -> &BranchTree {
        &self.tree
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Advance by `dt` seconds and capture the result.
    ///
    /// An invalid `dt` is rejected before anything changes. If the capture
    /// or the sink fails, the growth has still happened and the clock has
    /// still advanced.
    pub fn step(&mut self, dt: f64) -> Result<StepReport> {
        self.tree.step(dt)?;
        let index = self.steps;
        self.timestamp += dt;
        self.steps += 1;

        let s = &self.settings;
        let occupancy = rasterize_with_cell_size(&self.tree, s.cell_size)?;
        let field = LightField::from_occupancy(&occupancy, s.cell_size, s.voxel_radiance)?
            .with_escaped(s.escaped_radiance);
        let sphere = render(&field, s.viewpoint, s.resolution)?;
        self.sink.write(&sphere, &format!("step-{index:05}"))?;

        let report = StepReport {
            index,
            timestamp: self.timestamp,
            nodes: self.tree.len(),
            voxels: occupancy.len(),
        };
        info!(
            "step {}: t={:.0}s, {} nodes, {} voxels",
            report.index, report.timestamp, report.nodes, report.voxels
        );
        Ok(report)
    }

    /// Run `steps` steps of the configured `dt`. A failing step is logged and
    /// skipped; the run carries on with the next one.
    pub fn run(&mut self, steps: usize) -> RunSummary {
        let dt = self.settings.dt;
        let mut summary = RunSummary::default();
        for _ in 0..steps {
            match self.step(dt) {
                Ok(_) => summary.completed += 1,
                Err(e) => {
                    warn!("skipping step {}: {e}", self.steps);
                    summary.skipped += 1;
                }
            }
        }
        summary
    }
}
