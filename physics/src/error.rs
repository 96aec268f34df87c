use aero_utils::{FrameError, ReferenceFrame};
use thiserror::Error;

use crate::time::Epoch;

/// Failure of the Earth orientation provider. Never retried: the same time gives the same answer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{time} is outside the provider's valid range [{valid_from}, {valid_to}]")]
    OutOfRange {
        time: Epoch,
        valid_from: Epoch,
        valid_to: Epoch,
    },

    #[error("orientation provider failed: {0}")]
    Failed(String),
}

#[derive(Error, Debug)]
pub enum StateError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// raw input arrived in a frame the pipeline cannot resolve to inertial.
    #[error("cannot resolve {quantity} given in {frame} to the inertial frame")]
    UnsupportedFrame {
        quantity: &'static str,
        frame: ReferenceFrame,
    },

    #[error(transparent)]
    ProviderFailure(#[from] ProviderError),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    /// raised by a caller-supplied acceleration or logging function; passed through untouched.
    #[error("{0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("body {name:?} failed to step")]
    Body {
        name: String,
        #[source]
        source: StateError,
    },

    #[error("time step must be positive and finite, got {0}")]
    BadTimeStep(f64),

    #[error("a body named {0:?} already exists")]
    DuplicateBody(String),
}
