//! Telemetry signals recorded from body snapshots.
//!
//! A [`SignalRegistry`] belongs to one simulation session. Bodies hand it
//! samples through their logging function once per installed snapshot.
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::StateError;
use crate::state::StateSnapshot;
use crate::time::Epoch;

/// One named time series. With a `period`, samples closer than that to the
/// last kept sample are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSignal {
    name: String,
    period: Option<f64>,
    data: Vec<(Epoch, f64)>,
}

impl LogSignal {
    pub fn new(name: impl Into<String>, period: Option<f64>) -> Self {
        Self {
            name: name.into(),
            period,
            data: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> Option<f64> {
        self.period
    }

    pub fn data(&self) -> &[(Epoch, f64)] {
        &self.data
    }

    pub fn last(&self) -> Option<(Epoch, f64)> {
        self.data.last().copied()
    }

    /// Returns whether the sample was kept.
    pub fn add_data(&mut self, time: Epoch, value: f64) -> bool {
        let accept = match (self.data.last(), self.period) {
            (None, _) | (_, None) => true,
            (Some((last, _)), Some(period)) => time - *last >= period,
        };
        if accept {
            self.data.push((time, value));
        }
        accept
    }
}

/// A value produced by a logging function for the signal `name`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub name: &'static str,
    pub value: f64,
}

impl Sample {
    pub fn new(name: &'static str, value: f64) -> Self {
        Self { name, value }
    }
}

/// `(snapshot) -> samples`, called with every snapshot a body installs.
pub type LoggingFn = Arc<dyn Fn(&StateSnapshot) -> Result<Vec<Sample>, StateError> + Send + Sync>;

/// Wraps a closure as a [`LoggingFn`].
pub fn logging_fn<F>(f: F) -> LoggingFn
where
    F: Fn(&StateSnapshot) -> Result<Vec<Sample>, StateError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Signals keyed by `path/name`.
#[derive(Debug, Clone, Default)]
pub struct SignalRegistry {
    signals: BTreeMap<String, LogSignal>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &str, name: &str) -> String {
        format!("{path}/{name}")
    }

    /// Registers `signal` under `path`. A signal already registered at the same key is kept.
    pub fn register(&mut self, path: &str, signal: LogSignal) -> &mut LogSignal {
        self.signals.entry(Self::key(path, signal.name())).or_insert(signal)
    }

    pub fn get(&self, path: &str, name: &str) -> Option<&LogSignal> {
        self.signals.get(&Self::key(path, name))
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// `(key, signal)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LogSignal)> {
        self.signals.iter().map(|(key, signal)| (key.as_str(), signal))
    }
}

/// Built-in logging functions that configuration can refer to by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggerKind {
    #[default]
    None,
    /// inertial distance from the Earth's centre, and altitude.
    Position,
    /// longitude, latitude (degrees) and altitude.
    Geodetic,
}

impl LoggerKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Position => "position",
            Self::Geodetic => "geodetic",
        }
    }

    /// `None` has nothing to record.
    pub fn into_fn(self) -> Option<LoggingFn> {
        match self {
            Self::None => None,
            Self::Position => Some(logging_fn(|state| {
                Ok(vec![
                    Sample::new("radius", state.position().norm()),
                    Sample::new("altitude", state.altitude()),
                ])
            })),
            Self::Geodetic => Some(logging_fn(|state| {
                Ok(vec![
                    Sample::new("longitude", state.longitude().to_degrees()),
                    Sample::new("latitude", state.latitude().to_degrees()),
                    Sample::new("altitude", state.altitude()),
                ])
            })),
        }
    }
}

impl FromStr for LoggerKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "position" => Ok(Self::Position),
            "geodetic" => Ok(Self::Geodetic),
            other => Err(format!("unknown logging function {other:?}")),
        }
    }
}
