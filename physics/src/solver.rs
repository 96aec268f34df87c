//! Time-stepping integrators.
//!
//! Each solver is built once with the body's acceleration law and its state
//! constructor, then asked for the next snapshot every step. The solver never
//! touches frames or geometry itself; everything it produces goes back through
//! the constructor so the snapshot stays fully resolved.
//!
//! - **Fixed**: no physics, re-resolves the current state at the new time
//! - **Euler**: first order, not recommended
//! - **VelocityVerlet**: second order, the default
use std::str::FromStr;
use std::sync::Arc;

use aero_utils::{Acceleration, Position, PositionKind, Velocity, VelocityKind};

use crate::error::StateError;
use crate::state::StateSnapshot;
use crate::time::Epoch;

/// `(snapshot) -> inertial acceleration`, supplied by the caller.
pub type AccelerationFn = Arc<dyn Fn(&StateSnapshot) -> Result<Acceleration, StateError> + Send + Sync>;

/// `(time, position, velocity) -> snapshot`, supplied by the owning body.
pub type StateConstructor =
    Arc<dyn Fn(Epoch, Position, Velocity) -> Result<StateSnapshot, StateError> + Send + Sync>;

/// Wraps a closure as an [`AccelerationFn`].
pub fn acceleration_fn<F>(f: F) -> AccelerationFn
where
    F: Fn(&StateSnapshot) -> Result<Acceleration, StateError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a closure as a [`StateConstructor`].
pub fn state_constructor<F>(f: F) -> StateConstructor
where
    F: Fn(Epoch, Position, Velocity) -> Result<StateSnapshot, StateError> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub trait Solver: Send + Sync {
    /// Advance `current` by `dt` seconds.
    fn next_state(&self, current: &StateSnapshot, dt: f64) -> Result<StateSnapshot, StateError>;

    fn name(&self) -> &'static str;

    /// Number of acceleration evaluations per step.
    fn stages(&self) -> usize;
}

pub struct Fixed {
    construct_state: StateConstructor,
}

impl Fixed {
    pub fn new(construct_state: StateConstructor) -> Self {
        Self { construct_state }
    }
}

impl Solver for Fixed {
    fn next_state(&self, current: &StateSnapshot, dt: f64) -> Result<StateSnapshot, StateError> {
        (self.construct_state)(current.time() + dt, *current.position(), *current.velocity())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }

    fn stages(&self) -> usize {
        0
    }
}

pub struct Euler {
    acceleration: AccelerationFn,
    construct_state: StateConstructor,
}

impl Euler {
    pub fn new(acceleration: AccelerationFn, construct_state: StateConstructor) -> Self {
        Self {
            acceleration,
            construct_state,
        }
    }
}

impl Solver for Euler {
    fn next_state(&self, current: &StateSnapshot, dt: f64) -> Result<StateSnapshot, StateError> {
        let accel = (self.acceleration)(current)?;

        let velocity = current.velocity().add(&accel.scale(dt).cast::<VelocityKind>())?;
        let position = current.position().add(&velocity.scale(dt).cast::<PositionKind>())?;

        (self.construct_state)(current.time() + dt, position, velocity)
    }

    fn name(&self) -> &'static str {
        "euler"
    }

    fn stages(&self) -> usize {
        1
    }
}

pub struct VelocityVerlet {
    acceleration: AccelerationFn,
    construct_state: StateConstructor,
}

impl VelocityVerlet {
    pub fn new(acceleration: AccelerationFn, construct_state: StateConstructor) -> Self {
        Self {
            acceleration,
            construct_state,
        }
    }
}

impl Solver for VelocityVerlet {
    fn next_state(&self, current: &StateSnapshot, dt: f64) -> Result<StateSnapshot, StateError> {
        let time = current.time() + dt;

        // kick
        let accel_first = (self.acceleration)(current)?;
        let half_velocity = current
            .velocity()
            .add(&accel_first.scale(0.5 * dt).cast::<VelocityKind>())?;

        // drift
        let position = current
            .position()
            .add(&half_velocity.scale(dt).cast::<PositionKind>())?;

        // both constructions use the same time, so the orientation lookup is a cache hit the second time.
        let midpoint = (self.construct_state)(time, position, half_velocity)?;

        // kick with the new acceleration
        let accel_second = (self.acceleration)(&midpoint)?;
        let velocity = half_velocity.add(&accel_second.scale(0.5 * dt).cast::<VelocityKind>())?;

        (self.construct_state)(time, position, velocity)
    }

    fn name(&self) -> &'static str {
        "velocity verlet"
    }

    fn stages(&self) -> usize {
        2
    }
}

/// Which integrator a body uses. Chosen once when the body is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverKind {
    Fixed,
    Euler,
    #[default]
    VelocityVerlet,
}

impl SolverKind {
    pub fn build(self, acceleration: AccelerationFn, construct_state: StateConstructor) -> Box<dyn Solver> {
        match self {
            Self::Fixed => Box::new(Fixed::new(construct_state)),
            Self::Euler => Box::new(Euler::new(acceleration, construct_state)),
            Self::VelocityVerlet => Box::new(VelocityVerlet::new(acceleration, construct_state)),
        }
    }
}

impl FromStr for SolverKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "default" | "velocity verlet" => Ok(Self::VelocityVerlet),
            "euler" => Ok(Self::Euler),
            "fixed" => Ok(Self::Fixed),
            other => Err(format!("unknown solver {other:?}")),
        }
    }
}
