use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bonsai::capture::render;
use bonsai::config::SimulationSettings;
use bonsai::export::{PngSink, SphereSink};
use bonsai::light::LightField;
use bonsai::math::Point3;
use bonsai::Bonsai;

/// Bonsai - grow a plant and photograph the light around it
#[derive(Parser, Debug)]
#[command(name = "bonsai-sim", version, about)]
struct Cli {
    /// Number of simulation steps
    #[arg(long, default_value_t = 100)]
    steps: usize,

    /// Simulated seconds per step (at most 60)
    #[arg(long, default_value_t = 60.0)]
    dt: f64,

    /// Rows of each captured sphere; columns are twice this
    #[arg(long, default_value_t = 250)]
    resolution: usize,

    /// Directory receiving one PNG per step
    #[arg(long, value_name = "DIR", default_value = "out")]
    out: PathBuf,

    /// Multiplier applied to radiance before 8-bit quantization
    #[arg(long, default_value_t = 1.0)]
    exposure: f64,

    /// Render a single sphere of a random light field with this seed instead
    /// of running the simulation
    #[arg(long, value_name = "SEED")]
    fixture_seed: Option<u64>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let settings = SimulationSettings {
        dt: cli.dt,
        resolution: cli.resolution,
        ..SimulationSettings::default()
    };
    let sink = PngSink::new(cli.out.clone()).with_exposure(cli.exposure);

    let outcome = match cli.fixture_seed {
        Some(seed) => run_fixture(seed, &settings, sink),
        None => run_simulation(cli.steps, settings, sink),
    };
    if let Err(e) = outcome {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run_simulation(steps: usize, settings: SimulationSettings, sink: PngSink) -> bonsai::Result<()> {
    let mut bonsai = Bonsai::with_settings(settings, sink)?;
    let summary = bonsai.run(steps);
    info!(
        "finished: {} steps completed, {} skipped, t={:.0}s, {} nodes",
        summary.completed,
        summary.skipped,
        bonsai.timestamp(),
        bonsai.tree().len()
    );
    Ok(())
}

fn run_fixture(seed: u64, settings: &SimulationSettings, mut sink: PngSink) -> bonsai::Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let field = LightField::random(&mut rng, 100, 50, settings.cell_size)?
        .with_escaped(settings.escaped_radiance);
    let sphere = render(&field, Point3::origin(), settings.resolution)?;
    sink.write(&sphere, &format!("fixture-{seed}"))?;
    Ok(())
}
