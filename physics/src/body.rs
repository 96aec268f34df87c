//! A simulated body: its name, current snapshot, and the Earth it is resolved against.
use std::fmt;
use std::sync::Arc;

use aero_utils::{Position, Velocity};

use crate::error::StateError;
use crate::solver::{state_constructor, StateConstructor};
use crate::state::{Earth, StateSnapshot};
use crate::telemetry::{LogSignal, LoggingFn, SignalRegistry};
use crate::time::Epoch;

pub struct Body {
    name: String,
    state: StateSnapshot,
    earth: Arc<Earth>,
    logger: Option<LoggingFn>,
    /// minimum spacing of kept samples (s), `None` keeps every sample.
    log_period: Option<f64>,
}

impl Body {
    /// Resolves the initial conditions into the body's first snapshot.
    pub fn new(
        name: impl Into<String>,
        earth: Arc<Earth>,
        time: Epoch,
        position: Position,
        velocity: Velocity,
    ) -> Result<Self, StateError> {
        let state = earth.construct_state(time, position, velocity)?;
        Ok(Self {
            name: name.into(),
            state,
            earth,
            logger: None,
            log_period: None,
        })
    }

    pub fn with_logger(mut self, logger: Option<LoggingFn>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_log_period(mut self, period: Option<f64>) -> Self {
        self.log_period = period;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &StateSnapshot {
        &self.state
    }

    pub fn earth(&self) -> &Arc<Earth> {
        &self.earth
    }

    /// The pipeline bound to this body's Earth, for handing to a solver.
    pub fn state_constructor(&self) -> StateConstructor {
        let earth = Arc::clone(&self.earth);
        state_constructor(move |time, position, velocity| earth.construct_state(time, position, velocity))
    }

    /// Replaces the current snapshot.
    pub fn install(&mut self, state: StateSnapshot) {
        self.state = state;
    }

    /// Records the current snapshot with the logging function, if any.
    pub fn log(&self, signals: &mut SignalRegistry) -> Result<(), StateError> {
        let Some(logger) = &self.logger else {
            return Ok(());
        };
        for sample in logger(&self.state)? {
            signals
                .register(&self.name, LogSignal::new(sample.name, self.log_period))
                .add_data(self.state.time(), sample.value);
        }
        Ok(())
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("logged", &self.logger.is_some())
            .field("log_period", &self.log_period)
            .finish_non_exhaustive()
    }
}
