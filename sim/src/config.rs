//! Simulation configuration, read from JSON.
//!
//! Parsing happens in two passes: serde fills the raw file structs (names kept
//! as strings), then [`Config::from_file`] resolves every name against the
//! built-in registries and checks the values, so a bad file fails before any
//! body is built.
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use aero_physics::{AccelerationLaw, LoggerKind, SolverKind};
use aero_utils::{CoordinateSystem, FrameError, Position, Quantity, ReferenceFrame, Vector, Velocity};
use anyhow::Context;
use chrono::{DateTime, Utc};
use log::warn;
use nalgebra::Vector3;
use serde::Deserialize;
use thiserror::Error;

/// Default integration step (s).
pub const DEFAULT_TIME_STEP: f64 = 1e-3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration file")]
    Parse(#[from] serde_json::Error),

    #[error("configuration must describe at least one sim object")]
    NoObjects,

    #[error("more than one sim object is named {0:?}")]
    DuplicateName(String),

    #[error("{object}: unknown {field} {value:?}")]
    UnknownName {
        object: String,
        field: &'static str,
        value: String,
    },

    #[error("{object}: bad initial {quantity}")]
    Vector {
        object: String,
        quantity: &'static str,
        #[source]
        source: FrameError,
    },

    #[error("{object}: initial conditions can only be given in the ECI or ECEF frame, not {frame}")]
    InitialFrame { object: String, frame: ReferenceFrame },

    #[error("unknown earth model {0:?}")]
    UnknownEarth(String),

    #[error("start time {value:?} is neither \"now\" nor an RFC 3339 timestamp")]
    StartTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("time step must be positive and finite, got {0}")]
    BadTimeStep(f64),

    #[error("{object}: logging period must be positive and finite, got {value}")]
    BadLogPeriod { object: String, value: f64 },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    sim_objects: Vec<SimObjectEntry>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default = "default_time_step")]
    time_step: f64,
    #[serde(default)]
    earth: Option<String>,
    #[serde(default)]
    log_file_path: Option<PathBuf>,
}

fn default_time_step() -> f64 {
    DEFAULT_TIME_STEP
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct SimObjectEntry {
    name: String,
    #[serde(default)]
    object_type: Option<String>,
    #[serde(default)]
    acceleration_function: Option<String>,
    #[serde(default)]
    logging_function: Option<String>,
    #[serde(default)]
    logging_period: Option<f64>,
    initial_conditions: InitialConditionsEntry,
    #[serde(default)]
    solver: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct InitialConditionsEntry {
    position: VectorEntry,
    velocity: VectorEntry,
    #[serde(default)]
    orientation: InitialOrientation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct VectorEntry {
    data: [f64; 3],
    reference_frame: String,
    #[serde(default)]
    coordinate_system: Option<String>,
}

/// Initial attitude angles in radians. Recorded with the body; the state
/// pipeline derives heading and flight path angle from velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct InitialOrientation {
    #[serde(default)]
    pub heading_angle: f64,
    #[serde(default)]
    pub flight_path_angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectType {
    #[default]
    General,
    Ground,
    /// a point fixed to the Earth's surface; always stepped with the Fixed solver.
    FixedPoint,
}

impl ObjectType {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "general" => Some(Self::General),
            "ground" => Some(Self::Ground),
            "fixed point" => Some(Self::FixedPoint),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarthModel {
    /// WGS84 ellipsoid with provider orientation.
    #[default]
    Geoid,
    Spherical,
}

impl EarthModel {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "default" | "geoid" => Some(Self::Geoid),
            "spherical" => Some(Self::Spherical),
            _ => None,
        }
    }
}

/// One validated sim object.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub object_type: ObjectType,
    pub acceleration: AccelerationLaw,
    pub logger: LoggerKind,
    /// seconds between kept telemetry samples; `None` keeps every step.
    pub log_period: Option<f64>,
    pub position: Position,
    pub velocity: Velocity,
    pub orientation: InitialOrientation,
    pub solver: SolverKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bodies: Vec<BodyConfig>,
    pub start_time: DateTime<Utc>,
    pub time_step: f64,
    pub earth: EarthModel,
    pub log_file_path: PathBuf,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_file(serde_json::from_str(json)?)
    }

    fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        if file.sim_objects.is_empty() {
            return Err(ConfigError::NoObjects);
        }
        if !(file.time_step.is_finite() && file.time_step > 0.0) {
            return Err(ConfigError::BadTimeStep(file.time_step));
        }

        let earth = match file.earth {
            Some(name) => EarthModel::parse(&name).ok_or(ConfigError::UnknownEarth(name))?,
            None => EarthModel::default(),
        };

        let start_time = match file.start_time {
            Some(value) => parse_start_time(&value)?,
            None => Utc::now(),
        };

        let mut seen = HashSet::new();
        let mut bodies = Vec::with_capacity(file.sim_objects.len());
        for entry in file.sim_objects {
            if !seen.insert(entry.name.clone()) {
                return Err(ConfigError::DuplicateName(entry.name));
            }
            bodies.push(body_config(entry)?);
        }

        Ok(Self {
            bodies,
            start_time,
            time_step: file.time_step,
            earth,
            log_file_path: file.log_file_path.unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

/// Reads and validates the configuration at `path`.
pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open configuration file: {:?}", path))?;
    let raw: ConfigFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse configuration file: {:?}", path))?;
    Config::from_file(raw).with_context(|| format!("Invalid configuration in {:?}", path))
}

fn parse_start_time(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    if value.trim().eq_ignore_ascii_case("now") {
        return Ok(Utc::now());
    }
    DateTime::parse_from_rfc3339(value.trim())
        .map(|time| time.with_timezone(&Utc))
        .map_err(|source| ConfigError::StartTime {
            value: value.to_owned(),
            source,
        })
}

fn named<T>(
    object: &str,
    field: &'static str,
    value: Option<String>,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| {
            parse(&value).ok_or_else(|| ConfigError::UnknownName {
                object: object.to_owned(),
                field,
                value,
            })
        })
        .transpose()
}

fn body_config(entry: SimObjectEntry) -> Result<BodyConfig, ConfigError> {
    let name = entry.name;
    let object_type = named(&name, "object type", entry.object_type, ObjectType::parse)?.unwrap_or_default();
    let acceleration = named(&name, "acceleration function", entry.acceleration_function, |v| {
        v.parse::<AccelerationLaw>().ok()
    })?
        .unwrap_or(AccelerationLaw::Zero);
    let logger = named(&name, "logging function", entry.logging_function, |v| v.parse::<LoggerKind>().ok())?.unwrap_or_default();
    let log_period = match entry.logging_period {
        Some(value) if !(value.is_finite() && value > 0.0) => {
            return Err(ConfigError::BadLogPeriod { object: name, value })
        }
        period => period,
    };
    let requested = named(&name, "solver", entry.solver, |v| v.parse::<SolverKind>().ok())?;

    let solver = match (object_type, requested) {
        (ObjectType::FixedPoint, Some(other)) if other != SolverKind::Fixed => {
            warn!("{name}: fixed points always use the fixed solver, ignoring {other:?}");
            SolverKind::Fixed
        }
        (ObjectType::FixedPoint, _) => SolverKind::Fixed,
        (ObjectType::General | ObjectType::Ground, requested) => requested.unwrap_or_default(),
    };

    let position = initial_vector(&name, "position", entry.initial_conditions.position)?;
    let velocity = initial_vector(&name, "velocity", entry.initial_conditions.velocity)?;

    Ok(BodyConfig {
        name,
        object_type,
        acceleration,
        logger,
        log_period,
        position,
        velocity,
        orientation: entry.initial_conditions.orientation,
        solver,
    })
}

fn initial_vector<Q: Quantity>(
    object: &str,
    quantity: &'static str,
    entry: VectorEntry,
) -> Result<Vector<Q>, ConfigError> {
    let vector_error = |source| ConfigError::Vector {
        object: object.to_owned(),
        quantity,
        source,
    };

    let frame: ReferenceFrame = entry.reference_frame.parse().map_err(vector_error)?;
    let coordinates: CoordinateSystem = match entry.coordinate_system {
        Some(name) => name.parse().map_err(vector_error)?,
        None => CoordinateSystem::Cartesian,
    };

    match frame {
        ReferenceFrame::EarthCenteredInertial | ReferenceFrame::EarthCenteredEarthFixed => {
            Ok(Vector::new(Vector3::from(entry.data), frame, coordinates))
        }
        frame => Err(ConfigError::InitialFrame {
            object: object.to_owned(),
            frame,
        }),
    }
}
