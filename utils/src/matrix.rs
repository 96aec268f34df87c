//! Frame-tagged 3x3 operators: rotations between frames and angular rate operators.
use std::marker::PhantomData;

use nalgebra::{Matrix3, Vector3};

use crate::error::{FrameError, Operation};
use crate::frame::ReferenceFrame;
use crate::vector::{Quantity, Vector};

pub trait MatrixKind: std::fmt::Debug + Clone + Copy + PartialEq + Send + Sync + 'static {}

/// pure rotation from one frame to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformationKind;
/// skew-symmetric angular rate operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularVelocityKind;

impl MatrixKind for TransformationKind {}
impl MatrixKind for AngularVelocityKind {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<K: MatrixKind> {
    data: Matrix3<f64>,
    from: ReferenceFrame,
    to: ReferenceFrame,
    kind: PhantomData<K>,
}

pub type Transformation = Matrix<TransformationKind>;
pub type AngularVelocity = Matrix<AngularVelocityKind>;

impl<K: MatrixKind> Matrix<K> {
    pub fn new(data: Matrix3<f64>, from: ReferenceFrame, to: ReferenceFrame) -> Self {
        Self {
            data,
            from,
            to,
            kind: PhantomData,
        }
    }

    pub fn data(&self) -> &Matrix3<f64> {
        &self.data
    }

    pub fn source_frame(&self) -> ReferenceFrame {
        self.from
    }

    pub fn target_frame(&self) -> ReferenceFrame {
        self.to
    }

    pub fn transpose(&self) -> Self {
        //! swaps source and target along with the data.
        Self::new(self.data.transpose(), self.to, self.from)
    }

    pub fn apply<Q: Quantity>(&self, vector: &Vector<Q>) -> Result<Vector<Q>, FrameError> {
        //! matrix . vector, tagged with this matrix's target frame.
        vector.ensure_cartesian()?;
        if vector.frame() != self.from {
            return Err(FrameError::FrameMismatch {
                operation: Operation::Apply,
                expected: self.from,
                found: vector.frame(),
            });
        }
        Ok(Vector::new(
            self.data * vector.data(),
            self.to,
            vector.coordinate_system(),
        ))
    }

    pub fn compose(&self, inner: &Self) -> Result<Self, FrameError> {
        //! self . inner: maps inner's source frame straight to self's target frame.
        //! The frame in between has to line up.
        if inner.to != self.from {
            return Err(FrameError::FrameMismatch {
                operation: Operation::Compose,
                expected: self.from,
                found: inner.to,
            });
        }
        Ok(Self::new(self.data * inner.data, inner.from, self.to))
    }
}

impl AngularVelocity {
    /// The cross-product operator `w x .` for a rotation rate vector.
    pub fn from_rate(rate: &Vector3<f64>, from: ReferenceFrame, to: ReferenceFrame) -> Self {
        Self::new(rate.cross_matrix(), from, to)
    }

    /// Recovers the rotation rate vector from the skew-symmetric data.
    pub fn rate(&self) -> Vector3<f64> {
        let m = &self.data;
        Vector3::new(
            0.5 * (m[(2, 1)] - m[(1, 2)]),
            0.5 * (m[(0, 2)] - m[(2, 0)]),
            0.5 * (m[(1, 0)] - m[(0, 1)]),
        )
    }
}

impl Transformation {
    /// Passive rotation about the z axis by `angle` (radians).
    pub fn about_z(angle: f64, from: ReferenceFrame, to: ReferenceFrame) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            Matrix3::new(
                c, s, 0.0, //
                -s, c, 0.0, //
                0.0, 0.0, 1.0,
            ),
            from,
            to,
        )
    }

    /// Passive rotation about the y axis by `angle` (radians).
    pub fn about_y(angle: f64, from: ReferenceFrame, to: ReferenceFrame) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            Matrix3::new(
                c, 0.0, -s, //
                0.0, 1.0, 0.0, //
                s, 0.0, c,
            ),
            from,
            to,
        )
    }

    /// Passive rotation about the x axis by `angle` (radians).
    pub fn about_x(angle: f64, from: ReferenceFrame, to: ReferenceFrame) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            Matrix3::new(
                1.0, 0.0, 0.0, //
                0.0, c, s, //
                0.0, -s, c,
            ),
            from,
            to,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::CoordinateSystem;
    use crate::vector::{Position, Velocity};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    use ReferenceFrame::*;

    fn quarter_turn() -> Transformation {
        Transformation::about_z(FRAC_PI_2, EarthCenteredInertial, EarthCenteredEarthFixed)
    }

    #[test]
    fn double_transpose_is_identity() {
        let m = Transformation::new(
            Matrix3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0),
            Geographic,
            FlightPath,
        );
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose().source_frame(), FlightPath);
        assert_eq!(m.transpose().target_frame(), Geographic);
    }

    #[test]
    fn apply_retags_to_target_frame() {
        let x = Position::cartesian(1.0, 0.0, 0.0, EarthCenteredInertial);
        let rotated = quarter_turn().apply(&x).unwrap();
        assert_eq!(rotated.frame(), EarthCenteredEarthFixed);
        // passive rotation: the frame turns +90 deg so the fixed vector appears at -90 deg.
        assert_relative_eq!(rotated.data(), &Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn apply_rejects_wrong_source_frame() {
        let v = Velocity::cartesian(1.0, 0.0, 0.0, Geographic);
        assert_eq!(
            quarter_turn().apply(&v),
            Err(FrameError::FrameMismatch {
                operation: Operation::Apply,
                expected: EarthCenteredInertial,
                found: Geographic,
            })
        );
    }

    #[test]
    fn apply_rejects_non_cartesian_data() {
        let v = Position::new(Vector3::new(0.1, 0.2, 10.0), EarthCenteredInertial, CoordinateSystem::Geodetic);
        assert_eq!(
            quarter_turn().apply(&v),
            Err(FrameError::NotCartesian(CoordinateSystem::Geodetic))
        );
    }

    #[test]
    fn compose_chains_frames() {
        let geo_from_ecef = Transformation::about_y(0.3, EarthCenteredEarthFixed, Geographic);
        let chained = geo_from_ecef.compose(&quarter_turn()).unwrap();
        assert_eq!(chained.source_frame(), EarthCenteredInertial);
        assert_eq!(chained.target_frame(), Geographic);
        assert_relative_eq!(
            chained.data(),
            &(geo_from_ecef.data() * quarter_turn().data()),
            epsilon = 1e-15
        );
    }

    #[test]
    fn compose_rejects_broken_chain() {
        let fp_from_geo = Transformation::about_z(0.3, Geographic, FlightPath);
        assert_eq!(
            fp_from_geo.compose(&quarter_turn()),
            Err(FrameError::FrameMismatch {
                operation: Operation::Compose,
                expected: Geographic,
                found: EarthCenteredEarthFixed,
            })
        );
    }

    #[test]
    fn angular_velocity_round_trips_its_rate() {
        let rate = Vector3::new(0.0, 0.0, 7.292e-5);
        let omega = AngularVelocity::from_rate(&rate, EarthCenteredInertial, EarthCenteredEarthFixed);
        assert_relative_eq!(omega.rate(), rate, epsilon = 1e-18);

        let r = Position::cartesian(1.0, 0.0, 0.0, EarthCenteredInertial);
        let w_cross_r = omega.apply(&r).unwrap();
        assert_relative_eq!(w_cross_r.data(), &Vector3::new(0.0, 7.292e-5, 0.0), epsilon = 1e-18);
    }
}
