//! Builds a runnable [`Simulation`] from a validated [`Config`].
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use aero_physics::{Body, Earth, Epoch, Simulation, SimulationError};
use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::config::{Config, EarthModel};
use crate::feed::SnapshotFeed;

/// Name of the telemetry file written into the configured log directory.
pub const SIGNALS_FILE_NAME: &str = "signals.csv";

pub fn epoch_from_datetime(time: DateTime<Utc>) -> Epoch {
    let seconds = time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) * 1e-9;
    Epoch::from_unix_seconds(seconds)
}

pub struct Session {
    simulation: Simulation,
    feed: SnapshotFeed,
    start: Epoch,
    log_file_path: PathBuf,
}

impl Session {
    /// One Earth model is shared by every body, so the geoid orientation cache is shared too.
    pub fn build(config: &Config) -> Result<Self, SimulationError> {
        let earth = Arc::new(match config.earth {
            EarthModel::Geoid => Earth::geoid(),
            EarthModel::Spherical => Earth::spherical(),
        });
        let start = epoch_from_datetime(config.start_time);
        info!(
            "starting at {} ({start}) with a {:?} Earth",
            config.start_time, config.earth
        );

        let mut simulation = Simulation::new(config.time_step)?;
        for entry in &config.bodies {
            let body = Body::new(
                entry.name.as_str(),
                Arc::clone(&earth),
                start,
                entry.position,
                entry.velocity,
            )
            .map_err(|source| SimulationError::Body {
                name: entry.name.clone(),
                source,
            })?
            .with_logger(entry.logger.into_fn())
            .with_log_period(entry.log_period);

            debug!(
                "{}: {:?}, {} acceleration, {} logging, initial orientation {:?}",
                entry.name,
                entry.object_type,
                entry.acceleration.name(),
                entry.logger.name(),
                entry.orientation
            );
            simulation.add_body(body, entry.solver, entry.acceleration.into_fn())?;
        }

        let feed = SnapshotFeed::attach(&mut simulation);
        Ok(Self {
            simulation,
            feed,
            start,
            log_file_path: config.log_file_path.clone(),
        })
    }

    pub fn run(&mut self, time_max: f64) -> Result<f64, SimulationError> {
        self.simulation.run(time_max)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn feed(&self) -> &SnapshotFeed {
        &self.feed
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    /// Writes every recorded signal as `signal,time,value` rows, time in seconds since the start.
    pub fn write_signals(&self) -> csv::Result<PathBuf> {
        fs::create_dir_all(&self.log_file_path)?;
        let path = self.log_file_path.join(SIGNALS_FILE_NAME);
        let mut writer = csv::Writer::from_path(&path)?;

        writer.write_record(["signal", "time", "value"])?;
        for (key, signal) in self.simulation.signals().iter() {
            for (time, value) in signal.data() {
                let time = (*time - self.start).to_string();
                writer.write_record([key, time.as_str(), value.to_string().as_str()])?;
            }
        }
        writer.flush()?;
        Ok(path)
    }
}
