//! Frame-tagged 3D vectors. Used for positions, velocities and accelerations.
use std::marker::PhantomData;

use nalgebra::Vector3;

use crate::error::{FrameError, Operation};
use crate::frame::{CoordinateSystem, ReferenceFrame};
use crate::geodesy::EarthShape;

/// Marker for what physical quantity a [`Vector`] holds.
pub trait Quantity: std::fmt::Debug + Clone + Copy + PartialEq + Send + Sync + 'static {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionKind;
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityKind;
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerationKind;

impl Quantity for PositionKind {}
impl Quantity for VelocityKind {}
impl Quantity for AccelerationKind {}

/// Three real components plus the frame and coordinate system they are expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<Q: Quantity> {
    data: Vector3<f64>,
    frame: ReferenceFrame,
    coordinates: CoordinateSystem,
    kind: PhantomData<Q>,
}

pub type Position = Vector<PositionKind>;
pub type Velocity = Vector<VelocityKind>;
pub type Acceleration = Vector<AccelerationKind>;

impl<Q: Quantity> Vector<Q> {
    pub fn new(data: Vector3<f64>, frame: ReferenceFrame, coordinates: CoordinateSystem) -> Self {
        Self {
            data,
            frame,
            coordinates,
            kind: PhantomData,
        }
    }

    pub fn cartesian(x: f64, y: f64, z: f64, frame: ReferenceFrame) -> Self {
        Self::new(Vector3::new(x, y, z), frame, CoordinateSystem::Cartesian)
    }

    pub fn zero(frame: ReferenceFrame) -> Self {
        Self::new(Vector3::zeros(), frame, CoordinateSystem::Cartesian)
    }

    pub fn data(&self) -> &Vector3<f64> {
        &self.data
    }

    pub fn frame(&self) -> ReferenceFrame {
        self.frame
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinates
    }

    pub fn norm(&self) -> f64 {
        self.data.norm()
    }

    pub fn add(&self, other: &Self) -> Result<Self, FrameError> {
        //! component-wise sum. Frame and coordinate system of the result are taken from `other`.
        self.check_frame(other, Operation::Add)?;
        Ok(Self::new(self.data + other.data, other.frame, other.coordinates))
    }

    pub fn sub(&self, other: &Self) -> Result<Self, FrameError> {
        //! subtract other from self. Frame and coordinate system of the result are taken from `other`.
        self.check_frame(other, Operation::Subtract)?;
        Ok(Self::new(self.data - other.data, other.frame, other.coordinates))
    }

    pub fn scale(&self, scale_factor: f64) -> Self {
        Self::new(self.data * scale_factor, self.frame, self.coordinates)
    }

    /// Retags the data with another frame without touching it.
    pub fn reparent(&self, frame: ReferenceFrame) -> Self {
        Self::new(self.data, frame, self.coordinates)
    }

    /// Reinterprets the data as another quantity, e.g. `velocity * dt` as a displacement.
    pub fn cast<R: Quantity>(&self) -> Vector<R> {
        Vector::new(self.data, self.frame, self.coordinates)
    }

    pub fn is_cartesian(&self) -> bool {
        self.coordinates == CoordinateSystem::Cartesian
    }

    pub fn ensure_cartesian(&self) -> Result<(), FrameError> {
        if self.is_cartesian() {
            Ok(())
        } else {
            Err(FrameError::NotCartesian(self.coordinates))
        }
    }

    pub fn to_cartesian(&self, earth: &dyn EarthShape) -> Self {
        //! normalises Geodetic or Spherical data to Cartesian. The frame is left alone.
        let d = self.data;
        let data = match self.coordinates {
            CoordinateSystem::Cartesian => return *self,
            CoordinateSystem::Geodetic => earth.geodetic_to_cartesian(d.x, d.y, d.z),
            CoordinateSystem::Spherical => earth.spherical_to_cartesian(d.x, d.y, d.z),
        };
        Self::new(data, self.frame, CoordinateSystem::Cartesian)
    }

    fn check_frame(&self, other: &Self, operation: Operation) -> Result<(), FrameError> {
        if self.frame == other.frame {
            Ok(())
        } else {
            Err(FrameError::FrameMismatch {
                operation,
                expected: self.frame,
                found: other.frame,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::{SphericalEarth, Wgs84Ellipsoid, WGS84_SEMI_MAJOR_AXIS};
    use approx::assert_relative_eq;
    use rand::Rng;

    use ReferenceFrame::*;

    pub fn get_test_vecs() -> (Position, Position) {
        //! provides a couple of vectors to use in the test suite.
        (
            Position::cartesian(5.0, 7.0, 10.0, EarthCenteredInertial),
            Position::cartesian(2.0, 9.0, 15.0, EarthCenteredInertial),
        )
    }

    #[test]
    fn addition() {
        let (v1, v2) = get_test_vecs();
        assert_eq!(
            v1.add(&v2).unwrap(),
            Position::cartesian(7.0, 16.0, 25.0, EarthCenteredInertial)
        )
    }

    #[test]
    fn subtraction() {
        let (v1, v2) = get_test_vecs();
        assert_eq!(
            v1.sub(&v2).unwrap(),
            Position::cartesian(3.0, -2.0, -5.0, EarthCenteredInertial)
        )
    }

    #[test]
    fn result_takes_coordinate_system_of_right_operand() {
        let a = Position::new(Vector3::new(1.0, 2.0, 3.0), Geographic, CoordinateSystem::Cartesian);
        let b = Position::new(Vector3::new(1.0, 1.0, 1.0), Geographic, CoordinateSystem::Spherical);
        assert_eq!(a.add(&b).unwrap().coordinate_system(), CoordinateSystem::Spherical);
        assert_eq!(b.sub(&a).unwrap().coordinate_system(), CoordinateSystem::Cartesian);
    }

    #[test]
    fn add_then_subtract_recovers_left_operand() {
        let mut rng = rand::thread_rng();
        for frame in ReferenceFrame::ALL {
            let a = Velocity::cartesian(
                rng.gen_range(-1e4..1e4),
                rng.gen_range(-1e4..1e4),
                rng.gen_range(-1e4..1e4),
                frame,
            );
            let b = Velocity::cartesian(
                rng.gen_range(-1e4..1e4),
                rng.gen_range(-1e4..1e4),
                rng.gen_range(-1e4..1e4),
                frame,
            );
            let back = a.add(&b).unwrap().sub(&b).unwrap();
            assert_relative_eq!(back.data(), a.data(), epsilon = 1e-9);
            assert_eq!(back.frame(), b.frame());
        }
    }

    #[test]
    fn mismatched_frames_always_fail() {
        for left in ReferenceFrame::ALL {
            for right in ReferenceFrame::ALL.into_iter().filter(|f| *f != left) {
                let a = Position::cartesian(1.0, 2.0, 3.0, left);
                let b = Position::cartesian(4.0, 5.0, 6.0, right);
                let expected = |operation| FrameError::FrameMismatch {
                    operation,
                    expected: left,
                    found: right,
                };
                assert_eq!(a.add(&b), Err(expected(Operation::Add)));
                assert_eq!(a.sub(&b), Err(expected(Operation::Subtract)));
            }
        }
    }

    #[test]
    fn geodetic_normalisation_keeps_frame() {
        let geodetic = Position::new(
            Vector3::new(0.0, 0.0, 100.0),
            EarthCenteredEarthFixed,
            CoordinateSystem::Geodetic,
        );
        let cartesian = geodetic.to_cartesian(&Wgs84Ellipsoid::default());
        assert_eq!(cartesian.frame(), EarthCenteredEarthFixed);
        assert!(cartesian.is_cartesian());
        assert_relative_eq!(cartesian.data().x, WGS84_SEMI_MAJOR_AXIS + 100.0, epsilon = 1e-6);
    }

    #[test]
    fn spherical_normalisation() {
        let spherical = Position::new(
            Vector3::new(std::f64::consts::FRAC_PI_2, 0.0, 7_000_000.0),
            EarthCenteredInertial,
            CoordinateSystem::Spherical,
        );
        let cartesian = spherical.to_cartesian(&SphericalEarth::default());
        assert_relative_eq!(cartesian.data().z, 7_000_000.0, epsilon = 1e-6);
        assert_relative_eq!(cartesian.data().x.abs(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn cartesian_normalisation_is_a_no_op() {
        let (v1, _) = get_test_vecs();
        assert_eq!(v1.to_cartesian(&SphericalEarth::default()), v1);
    }

    #[test]
    fn cast_and_reparent_keep_data() {
        let v = Velocity::cartesian(1.0, -2.0, 3.0, EarthCenteredEarthFixed);
        let displacement: Position = v.scale(2.0).cast();
        assert_eq!(displacement.data(), &Vector3::new(2.0, -4.0, 6.0));
        assert_eq!(displacement.frame(), EarthCenteredEarthFixed);
        assert_eq!(v.reparent(EarthCenteredInertial).frame(), EarthCenteredInertial);
        assert_eq!(v.reparent(EarthCenteredInertial).data(), v.data());
    }
}
