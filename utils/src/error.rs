use thiserror::Error;

use crate::frame::{CoordinateSystem, ReferenceFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Apply,
    Compose,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    /// operands of a vector/matrix operation are expressed in incompatible frames.
    #[error("frame mismatch in {operation:?}: expected {expected}, found {found}")]
    FrameMismatch {
        operation: Operation,
        expected: ReferenceFrame,
        found: ReferenceFrame,
    },

    /// frame conversion was attempted on data that is not Cartesian yet.
    #[error("{0:?} coordinates must be normalised to Cartesian first")]
    NotCartesian(CoordinateSystem),

    #[error("unknown reference frame {0:?}")]
    UnknownFrameName(String),

    #[error("unknown coordinate system {0:?}")]
    UnknownCoordinateSystem(String),
}
