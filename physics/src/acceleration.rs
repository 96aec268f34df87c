//! Built-in acceleration laws that configuration can refer to by name.
use std::str::FromStr;

use aero_utils::{Acceleration, ReferenceFrame, WGS84_MU, WGS84_SEMI_MAJOR_AXIS};
use nalgebra::Vector3;

use crate::error::StateError;
use crate::solver::{acceleration_fn, AccelerationFn};
use crate::state::StateSnapshot;

/// Earth J2 zonal harmonic (EGM96).
pub const J2: f64 = 1.082_626_68e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelerationLaw {
    /// no forces at all.
    Zero,
    /// central gravity.
    PointMass,
    /// central gravity plus Earth oblateness.
    J2,
}

impl AccelerationLaw {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::PointMass => "point-mass",
            Self::J2 => "j2",
        }
    }

    pub fn into_fn(self) -> AccelerationFn {
        match self {
            Self::Zero => acceleration_fn(|_| Ok(Acceleration::zero(ReferenceFrame::EarthCenteredInertial))),
            Self::PointMass => acceleration_fn(|state| point_mass(state).map(inertial)),
            Self::J2 => acceleration_fn(|state| {
                let central = point_mass(state)?;
                Ok(inertial(central + j2_perturbation(state.position().data())))
            }),
        }
    }
}

impl FromStr for AccelerationLaw {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "zero" | "none" => Ok(Self::Zero),
            "point-mass" | "point mass" | "two-body" => Ok(Self::PointMass),
            "j2" => Ok(Self::J2),
            other => Err(format!("unknown acceleration function {other:?}")),
        }
    }
}

fn inertial(data: Vector3<f64>) -> Acceleration {
    Acceleration::new(
        data,
        ReferenceFrame::EarthCenteredInertial,
        aero_utils::CoordinateSystem::Cartesian,
    )
}

fn point_mass(state: &StateSnapshot) -> Result<Vector3<f64>, StateError> {
    let r = state.position().data();
    let distance = r.norm();
    if distance == 0.0 {
        return Err(StateError::DegenerateGeometry("body is at the centre of the Earth"));
    }
    Ok(r * (-WGS84_MU / distance.powi(3)))
}

fn j2_perturbation(r: &Vector3<f64>) -> Vector3<f64> {
    //! oblateness term with the Earth's spin axis taken as inertial z.
    let distance_sq = r.norm_squared();
    let distance = distance_sq.sqrt();
    let z_ratio = 5.0 * r.z * r.z / distance_sq;
    let factor = -1.5 * J2 * WGS84_MU * WGS84_SEMI_MAJOR_AXIS.powi(2) / distance.powi(5);

    Vector3::new(
        factor * r.x * (1.0 - z_ratio),
        factor * r.y * (1.0 - z_ratio),
        factor * r.z * (3.0 - z_ratio),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Earth;
    use crate::time::Epoch;
    use aero_utils::{Position, Velocity};
    use approx::assert_relative_eq;

    use ReferenceFrame::EarthCenteredInertial as Eci;

    fn state_at(x: f64, z: f64) -> StateSnapshot {
        Earth::spherical()
            .construct_state(Epoch::J2000, Position::cartesian(x, 0.0, z, Eci), Velocity::zero(Eci))
            .unwrap()
    }

    #[test]
    fn point_mass_pulls_towards_centre() {
        let r = WGS84_SEMI_MAJOR_AXIS;
        let accel = AccelerationLaw::PointMass.into_fn()(&state_at(r, 0.0)).unwrap();
        assert_eq!(accel.frame(), Eci);
        // ~9.8 m/s^2 at the surface
        assert_relative_eq!(accel.data().x, -WGS84_MU / (r * r), max_relative = 1e-12);
        assert_relative_eq!(accel.data().x, -9.798, max_relative = 1e-3);
    }

    #[test]
    fn j2_strengthens_equatorial_gravity() {
        let r = WGS84_SEMI_MAJOR_AXIS + 400_000.0;
        let state = state_at(r, 0.0);
        let central = AccelerationLaw::PointMass.into_fn()(&state).unwrap();
        let oblate = AccelerationLaw::J2.into_fn()(&state).unwrap();
        assert!(oblate.data().x < central.data().x);
        assert_relative_eq!(oblate.data().z, 0.0);
    }

    #[test]
    fn zero_law_is_zero() {
        let accel = AccelerationLaw::Zero.into_fn()(&state_at(7e6, 0.0)).unwrap();
        assert_eq!(accel, Acceleration::zero(Eci));
    }

    #[test]
    fn names_round_trip() {
        for law in [AccelerationLaw::Zero, AccelerationLaw::PointMass, AccelerationLaw::J2] {
            assert_eq!(law.name().parse::<AccelerationLaw>().unwrap(), law);
        }
        assert!("magic".parse::<AccelerationLaw>().is_err());
    }
}
