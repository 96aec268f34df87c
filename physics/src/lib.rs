//! Kinematic state propagation for bodies near a rotating Earth.
//!
//! The pieces, leaf first:
//! - [`time`]: the simulation clock
//! - [`earth`]: inertial to Earth-fixed orientation, cached for the geoid model
//! - [`state`]: the pipeline that turns raw position/velocity into a [`StateSnapshot`]
//! - [`solver`]: Fixed, Euler and Velocity-Verlet integrators
//! - [`driver`]: the [`Simulation`] loop over named bodies
pub mod acceleration;
pub mod body;
pub mod driver;
pub mod earth;
pub mod error;
pub mod solver;
pub mod state;
pub mod telemetry;
pub mod time;

pub use acceleration::AccelerationLaw;
pub use body::Body;
pub use driver::{Observer, Simulation};
pub use earth::{
    earth_rotation_angle, EarthOrientation, GeoidOrientation, Orientation, OrientationProvider, RotationProvider,
    EARTH_ROTATION_RATE,
};
pub use error::{ProviderError, SimulationError, StateError};
pub use solver::{acceleration_fn, state_constructor, AccelerationFn, Solver, SolverKind, StateConstructor};
pub use state::{Earth, StateSnapshot};
pub use telemetry::{logging_fn, LogSignal, LoggerKind, LoggingFn, Sample, SignalRegistry};
pub use time::Epoch;
