//! The simulation driver: owns every body with its solver and steps them on a fixed clock.
use std::collections::BTreeMap;

use log::{debug, info, trace};

use crate::body::Body;
use crate::error::SimulationError;
use crate::solver::{AccelerationFn, Solver, SolverKind};
use crate::telemetry::SignalRegistry;

/// Called with each body after a step installs its new snapshot.
pub type Observer = Box<dyn FnMut(&Body) + Send>;

pub struct Simulation {
    bodies: BTreeMap<String, (Body, Box<dyn Solver>)>,
    signals: SignalRegistry,
    time_step: f64,
    steps_taken: u64,
    observers: Vec<Observer>,
}

impl Simulation {
    pub fn new(time_step: f64) -> Result<Self, SimulationError> {
        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(SimulationError::BadTimeStep(time_step));
        }
        Ok(Self {
            bodies: BTreeMap::new(),
            signals: SignalRegistry::new(),
            time_step,
            steps_taken: 0,
            observers: Vec::new(),
        })
    }

    /// Adds `body`, building its solver once. The initial snapshot is logged straight away.
    pub fn add_body(
        &mut self,
        body: Body,
        solver: SolverKind,
        acceleration: AccelerationFn,
    ) -> Result<(), SimulationError> {
        if self.bodies.contains_key(body.name()) {
            return Err(SimulationError::DuplicateBody(body.name().to_owned()));
        }

        body.log(&mut self.signals).map_err(|source| SimulationError::Body {
            name: body.name().to_owned(),
            source,
        })?;

        let solver = solver.build(acceleration, body.state_constructor());
        debug!("added body {:?} with {} solver", body.name(), solver.name());
        self.bodies.insert(body.name().to_owned(), (body, solver));
        Ok(())
    }

    pub fn add_observer(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Simulated seconds since the start, counted in whole steps.
    pub fn elapsed(&self) -> f64 {
        self.steps_taken as f64 * self.time_step
    }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.get(name).map(|(body, _)| body)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values().map(|(body, _)| body)
    }

    pub fn signals(&self) -> &SignalRegistry {
        &self.signals
    }

    /// Advances every body by one time step. Every next state is computed before
    /// any is installed, so a failing body leaves all of them at the old time.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        let mut next_states = Vec::with_capacity(self.bodies.len());
        for (name, (body, solver)) in self.bodies.iter_mut() {
            let next = solver
                .next_state(body.state(), self.time_step)
                .map_err(|source| SimulationError::Body {
                    name: name.clone(),
                    source,
                })?;
            next_states.push(next);
        }

        for ((body, _), next) in self.bodies.values_mut().zip(next_states) {
            body.install(next);
        }
        self.steps_taken += 1;
        trace!("step {} done, t = {:.6} s", self.steps_taken, self.elapsed());

        for (name, (body, _)) in self.bodies.iter() {
            body.log(&mut self.signals).map_err(|source| SimulationError::Body {
                name: name.clone(),
                source,
            })?;
            for observer in self.observers.iter_mut() {
                observer(body);
            }
        }
        Ok(())
    }

    /// Steps until the elapsed time reaches `time_max` seconds. Returns the elapsed time.
    pub fn run(&mut self, time_max: f64) -> Result<f64, SimulationError> {
        info!(
            "running {} bodies to t = {time_max} s with dt = {} s",
            self.bodies.len(),
            self.time_step
        );

        while self.elapsed() < time_max {
            self.step()?;
        }

        info!("finished after {} steps", self.steps_taken);
        Ok(self.elapsed())
    }
}
