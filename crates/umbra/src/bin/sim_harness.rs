//! # UMBRA Simulation Harness
//!
//! Headless fixed-tick runner.
//!
//! ```bash
//! # Defaults: 600 ticks at 60 Hz, 16 actors
//! ./sim_harness
//!
//! # With a config file and verbose runtime logs
//! RUST_LOG=umbra_core=debug ./sim_harness harness.toml
//! ```

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use umbra::{HarnessConfig, SimResult, Simulation};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "harness failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> SimResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "loading harness config");
            HarnessConfig::load(path)?
        }
        None => HarnessConfig::default(),
    };
    info!(
        ticks = config.ticks,
        delta_time = config.delta_time,
        actors = config.actors,
        "starting simulation"
    );

    let mut simulation = Simulation::new(&config)?;
    simulation.spawn_actors(config.actors)?;
    simulation.run(config.ticks, config.delta_time)?;

    if let Some(path) = &config.snapshot_path {
        let json = simulation.snapshot_json()?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "snapshot written");
    }
    Ok(())
}
