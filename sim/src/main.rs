//! Runs a simulation described by a JSON configuration file.
//!
//! ```text
//! aero-sim <config.json> [--time-max <seconds>]
//! ```
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use aero_sim::{config, Session};

/// Simulated time when `--time-max` is not given (s).
const DEFAULT_TIME_MAX: f64 = 1.0;

/// Propagates the bodies described in a JSON configuration file.
#[derive(Parser, Debug)]
#[command(name = "aero-sim", version)]
struct Args {
    /// Path to the JSON configuration file
    config_path: PathBuf,
    /// Simulated time to run for, in seconds
    #[arg(long, default_value_t = DEFAULT_TIME_MAX)]
    time_max: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = config::load(&args.config_path)?;
    let mut session = Session::build(&config).context("Failed to set up the simulation")?;

    let elapsed = session.run(args.time_max).context("Simulation failed")?;
    info!("simulated {elapsed} s");

    for name in session.feed().names() {
        if let Some(state) = session.feed().latest(name) {
            println!(
                "{name}: t = {:.3} s, lat {:.6} deg, lon {:.6} deg, alt {:.3} m, speed {:.3} m/s, heading {:.3} deg, fpa {:.3} deg, energy {:.3} J/kg",
                state.time() - session.start(),
                state.latitude().to_degrees(),
                state.longitude().to_degrees(),
                state.altitude(),
                state.speed(),
                state.heading().to_degrees(),
                state.flight_path_angle().to_degrees(),
                state.total_energy(),
            );
        }
    }

    let path = session.write_signals().context("Failed to write telemetry")?;
    info!("telemetry written to {}", path.display());
    Ok(())
}
