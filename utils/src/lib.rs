mod cache;
mod error;
mod frame;
mod geodesy;
mod matrix;
mod vector;

pub use cache::BoundedCache;
pub use error::{FrameError, Operation};
pub use frame::{CoordinateSystem, ReferenceFrame};
pub use geodesy::{
    EarthShape, Geodetic, SphericalEarth, Wgs84Ellipsoid, WGS84_FLATTENING, WGS84_MU,
    WGS84_SEMI_MAJOR_AXIS,
};
pub use matrix::{
    AngularVelocity, AngularVelocityKind, Matrix, MatrixKind, Transformation, TransformationKind,
};
pub use vector::{
    Acceleration, AccelerationKind, Position, PositionKind, Quantity, Velocity, Vector,
    VelocityKind,
};
