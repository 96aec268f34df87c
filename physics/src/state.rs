//! Fully resolved kinematic state of a body, and the pipeline that derives it
//! from a raw (time, position, velocity) triple.
use aero_utils::{
    AngularVelocity, EarthShape, Position, ReferenceFrame, SphericalEarth, Transformation, Velocity,
    FrameError, VelocityKind, Wgs84Ellipsoid, WGS84_MU,
};
use log::trace;
use nalgebra::{Matrix3, Vector3};

use crate::earth::{EarthOrientation, RotationProvider};
use crate::error::StateError;
use crate::time::Epoch;

use ReferenceFrame::{EarthCenteredEarthFixed as Ecef, EarthCenteredInertial as Eci, FlightPath, Geographic};

/// One immutable snapshot of a body. Built once per integration sub-step by
/// [`Earth::construct_state`] and replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    time: Epoch,
    position: Position,
    velocity: Velocity,
    /// inertial position resolved along north/east/down.
    position_geographic: Position,
    /// Earth-relative velocity in north/east/down.
    velocity_geographic: Velocity,

    t_ge: Transformation,
    t_ei: Transformation,
    t_gi: Transformation,
    t_vg: Transformation,
    omega_ei: AngularVelocity,

    longitude: f64,
    latitude: f64,
    altitude: f64,
    speed: f64,
    heading: f64,
    flight_path_angle: f64,

    kinetic_energy: f64,
    potential_energy: f64,
}

impl StateSnapshot {
    pub fn time(&self) -> Epoch {
        self.time
    }

    /// inertial position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// inertial velocity.
    pub fn velocity(&self) -> &Velocity {
        &self.velocity
    }

    pub fn position_geographic(&self) -> &Position {
        &self.position_geographic
    }

    pub fn velocity_geographic(&self) -> &Velocity {
        &self.velocity_geographic
    }

    /// ECEF -> Geographic.
    pub fn ecef_to_geographic(&self) -> &Transformation {
        &self.t_ge
    }

    /// ECI -> ECEF.
    pub fn eci_to_ecef(&self) -> &Transformation {
        &self.t_ei
    }

    /// ECI -> Geographic.
    pub fn eci_to_geographic(&self) -> &Transformation {
        &self.t_gi
    }

    /// Geographic -> FlightPath.
    pub fn geographic_to_flight_path(&self) -> &Transformation {
        &self.t_vg
    }

    pub fn earth_angular_velocity(&self) -> &AngularVelocity {
        &self.omega_ei
    }

    /// radians.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// radians.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// metres above the Earth shape.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Earth-relative speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// radians from north, towards east.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// radians above the local horizontal.
    pub fn flight_path_angle(&self) -> f64 {
        self.flight_path_angle
    }

    /// Specific kinetic energy, 1/2 |v|^2 of the inertial velocity (J/kg).
    pub fn kinetic_energy(&self) -> f64 {
        self.kinetic_energy
    }

    /// Specific point-mass potential energy, -mu / |r| (J/kg).
    pub fn potential_energy(&self) -> f64 {
        self.potential_energy
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }

    pub fn position_ecef(&self) -> Result<Position, StateError> {
        Ok(self.t_ei.apply(&self.position)?)
    }
}

/// The Earth as the pipeline needs it: a shape for geodesy plus the orientation model.
pub struct Earth {
    shape: Box<dyn EarthShape>,
    orientation: EarthOrientation,
}

impl Earth {
    pub fn new(shape: Box<dyn EarthShape>, orientation: EarthOrientation) -> Self {
        Self { shape, orientation }
    }

    /// Sphere with closed-form rotation.
    pub fn spherical() -> Self {
        Self::new(Box::<SphericalEarth>::default(), EarthOrientation::Spherical)
    }

    /// WGS84 ellipsoid with cached provider orientation.
    pub fn geoid() -> Self {
        Self::new(
            Box::<Wgs84Ellipsoid>::default(),
            EarthOrientation::geoid(RotationProvider::default()),
        )
    }

    pub fn shape(&self) -> &dyn EarthShape {
        self.shape.as_ref()
    }

    pub fn orientation(&self) -> &EarthOrientation {
        &self.orientation
    }

    pub fn construct_state(
        &self,
        time: Epoch,
        position: Position,
        velocity: Velocity,
    ) -> Result<StateSnapshot, StateError> {
        //! turns raw position/velocity (any supported frame and coordinate system) into a resolved snapshot.
        let position = position.to_cartesian(self.shape());
        let velocity = velocity.to_cartesian(self.shape());

        let (t_ei, omega_ei) = self.orientation.orientation(time)?;

        let position = resolve_position(position, &t_ei)?;
        let velocity = resolve_velocity(velocity, &position, &t_ei, &omega_ei)?;

        let position_ecef = t_ei.apply(&position)?;
        let geodetic = self.shape.cartesian_to_geodetic(position_ecef.data());

        let t_ge = geographic_from_ecef(geodetic.latitude, geodetic.longitude);
        let t_gi = t_ge.compose(&t_ei)?;

        // strip the velocity the body gets just from riding the rotating Earth.
        let transport: Velocity = omega_ei.apply(&position)?.cast::<VelocityKind>().reparent(Eci);
        let relative = velocity.sub(&transport)?;
        let velocity_geographic = t_gi.apply(&relative)?;
        let position_geographic = t_gi.apply(&position)?;

        let (heading, flight_path_angle) = heading_and_flight_path_angle(velocity_geographic.data());
        let t_vg = flight_path_from_geographic(heading, flight_path_angle)?;

        trace!(
            "state at {time}: lat {:.6} lon {:.6} alt {:.3}",
            geodetic.latitude,
            geodetic.longitude,
            geodetic.altitude
        );

        Ok(StateSnapshot {
            time,
            position,
            velocity,
            position_geographic,
            velocity_geographic,
            t_ge,
            t_ei,
            t_gi,
            t_vg,
            omega_ei,
            longitude: geodetic.longitude,
            latitude: geodetic.latitude,
            altitude: geodetic.altitude,
            speed: velocity_geographic.norm(),
            heading,
            flight_path_angle,
            kinetic_energy: 0.5 * velocity.norm().powi(2),
            potential_energy: -WGS84_MU / position.norm(),
        })
    }
}

fn resolve_position(position: Position, t_ei: &Transformation) -> Result<Position, StateError> {
    match position.frame() {
        Eci => Ok(position),
        Ecef => Ok(t_ei.transpose().apply(&position)?),
        frame => Err(StateError::UnsupportedFrame {
            quantity: "position",
            frame,
        }),
    }
}

fn resolve_velocity(
    velocity: Velocity,
    position: &Position,
    t_ei: &Transformation,
    omega_ei: &AngularVelocity,
) -> Result<Velocity, StateError> {
    //! `position` must already be inertial.
    match velocity.frame() {
        Eci => Ok(velocity),
        Ecef => {
            // v_i = T^T v_e + w x r_i
            let rotated = t_ei.transpose().apply(&velocity)?;
            let transport = omega_ei.apply(position)?.cast::<VelocityKind>().reparent(Eci);
            Ok(rotated.add(&transport)?)
        }
        frame => Err(StateError::UnsupportedFrame {
            quantity: "velocity",
            frame,
        }),
    }
}

pub fn geographic_from_ecef(latitude: f64, longitude: f64) -> Transformation {
    //! local north/east/down axes at the given latitude and longitude.
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    Transformation::new(
        Matrix3::new(
            -sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat, //
            -sin_lon, cos_lon, 0.0, //
            -cos_lat * cos_lon, -cos_lat * sin_lon, -sin_lat,
        ),
        Ecef,
        Geographic,
    )
}

pub fn heading_and_flight_path_angle(velocity_ned: &Vector3<f64>) -> (f64, f64) {
    //! returns (heading, flight path angle) in radians. With no horizontal speed the
    //! heading is 0 and the flight path angle is -90 deg descending, +90 deg climbing, 0 at rest.
    let (north, east, down) = (velocity_ned.x, velocity_ned.y, velocity_ned.z);
    let horizontal = north.hypot(east);

    if horizontal == 0.0 {
        let flight_path_angle = if down > 0.0 {
            -std::f64::consts::FRAC_PI_2
        } else if down < 0.0 {
            std::f64::consts::FRAC_PI_2
        } else {
            0.0
        };
        return (0.0, flight_path_angle);
    }

    (east.atan2(north), (-down).atan2(horizontal))
}

pub fn flight_path_from_geographic(heading: f64, flight_path_angle: f64) -> Result<Transformation, FrameError> {
    //! yaw by heading about down, then pitch by flight path angle about the new east axis.
    let yaw = Transformation::about_z(heading, Geographic, Geographic);
    let pitch = Transformation::about_y(flight_path_angle, Geographic, FlightPath);
    pitch.compose(&yaw)
}
