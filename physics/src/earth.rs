//! Earth orientation: the time-varying rotation from the inertial frame to the
//! Earth-fixed frame, and the Earth's angular velocity operator.
//!
//! Two variants, picked once at setup. `Spherical` evaluates the Earth rotation
//! angle directly. `Geoid` asks an [`OrientationProvider`] (an expensive call)
//! and keeps the last few answers in a [`BoundedCache`] keyed by time, since the
//! solvers query the same time several times per step.
use std::f64::consts::TAU;

use aero_utils::{AngularVelocity, BoundedCache, ReferenceFrame, Transformation};
use log::debug;
use nalgebra::Vector3;
use parking_lot::Mutex;

use crate::error::{ProviderError, StateError};
use crate::time::Epoch;

/// Earth rotation angle at J2000.0, in revolutions.
const ERA_AT_J2000: f64 = 0.779_057_273_264_0;
/// Earth rotation rate in revolutions per UT1 day.
const ERA_RATE: f64 = 1.002_737_811_911_354_48;
/// Earth rotation rate (rad/s).
pub const EARTH_ROTATION_RATE: f64 = TAU * ERA_RATE / crate::time::SECONDS_PER_DAY;

/// Orientation cache size for the Geoid model. One Velocity-Verlet step hits the
/// same time twice, and bodies share the model, so a handful of entries is plenty.
pub const DEFAULT_CACHE_SIZE: usize = 5;

/// ECI->ECEF rotation paired with the Earth's angular velocity operator.
pub type Orientation = (Transformation, AngularVelocity);

pub fn earth_rotation_angle(time: Epoch) -> f64 {
    //! IERS 2010 linear ERA, treating simulation time as UT1. Radians in [0, 2pi).
    let days = time.j2000_days();
    // split off whole days first to keep precision far from J2000
    let revolutions = days.fract() + ERA_AT_J2000 + (ERA_RATE - 1.0) * days;
    (TAU * revolutions).rem_euclid(TAU)
}

fn earth_angular_velocity() -> AngularVelocity {
    AngularVelocity::from_rate(
        &Vector3::new(0.0, 0.0, EARTH_ROTATION_RATE),
        ReferenceFrame::EarthCenteredInertial,
        ReferenceFrame::EarthCenteredEarthFixed,
    )
}

fn rotation_only(time: Epoch) -> Orientation {
    let t_ei = Transformation::about_z(
        earth_rotation_angle(time),
        ReferenceFrame::EarthCenteredInertial,
        ReferenceFrame::EarthCenteredEarthFixed,
    );
    (t_ei, earth_angular_velocity())
}

/// The celestial-to-terrestrial collaborator the Geoid model wraps.
pub trait OrientationProvider: Send + Sync {
    fn orientation_at(&self, time: Epoch) -> Result<Orientation, ProviderError>;

    fn name(&self) -> &'static str;
}

/// Earth rotation angle followed by a constant polar motion correction, valid
/// inside a fixed window of time (the span Earth orientation data exists for).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationProvider {
    /// polar motion x (radians).
    pub polar_x: f64,
    /// polar motion y (radians).
    pub polar_y: f64,
    pub valid_from: Epoch,
    pub valid_to: Epoch,
}

impl Default for RotationProvider {
    fn default() -> Self {
        const ARCSEC: f64 = TAU / (360.0 * 3600.0);
        Self {
            polar_x: 0.1 * ARCSEC,
            polar_y: 0.3 * ARCSEC,
            valid_from: Epoch::from_julian_date(2_437_665.5), // 1962-01-01
            valid_to: Epoch::from_julian_date(2_488_069.5),   // 2100-01-01
        }
    }
}

impl OrientationProvider for RotationProvider {
    fn orientation_at(&self, time: Epoch) -> Result<Orientation, ProviderError> {
        if time < self.valid_from || time > self.valid_to {
            return Err(ProviderError::OutOfRange {
                time,
                valid_from: self.valid_from,
                valid_to: self.valid_to,
            });
        }

        use ReferenceFrame::*;
        // TIRS->ITRS = R1(-yp) R2(-xp); intermediate frames are never exposed so tag them ECEF.
        let polar = Transformation::about_x(-self.polar_y, EarthCenteredEarthFixed, EarthCenteredEarthFixed)
            .compose(&Transformation::about_y(
                -self.polar_x,
                EarthCenteredEarthFixed,
                EarthCenteredEarthFixed,
            ))
            .map_err(|e| ProviderError::Failed(e.to_string()))?;
        let (spin, omega) = rotation_only(time);
        let t_ei = polar
            .compose(&spin)
            .map_err(|e| ProviderError::Failed(e.to_string()))?;

        Ok((t_ei, omega))
    }

    fn name(&self) -> &'static str {
        "earth rotation + polar motion"
    }
}

pub struct GeoidOrientation {
    provider: Box<dyn OrientationProvider>,
    cache: Mutex<BoundedCache<Epoch, Orientation>>,
}

impl GeoidOrientation {
    pub fn new(provider: Box<dyn OrientationProvider>) -> Self {
        Self::with_cache_size(provider, Some(DEFAULT_CACHE_SIZE))
    }

    pub fn with_cache_size(provider: Box<dyn OrientationProvider>, max_size: Option<usize>) -> Self {
        Self {
            provider,
            cache: Mutex::new(BoundedCache::new(max_size)),
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }

    fn orientation(&self, time: Epoch) -> Result<Orientation, StateError> {
        let mut cache = self.cache.lock();
        if let Some(hit) = cache.get(&time) {
            return Ok(*hit);
        }

        debug!("orientation cache miss at {time}, asking {}", self.provider.name());
        let answer = self.provider.orientation_at(time)?;
        cache.insert(time, answer);
        Ok(answer)
    }
}

pub enum EarthOrientation {
    Spherical,
    Geoid(GeoidOrientation),
}

impl EarthOrientation {
    pub fn geoid(provider: impl OrientationProvider + 'static) -> Self {
        Self::Geoid(GeoidOrientation::new(Box::new(provider)))
    }

    /// ECI->ECEF rotation and angular velocity at `time`, produced together.
    pub fn orientation(&self, time: Epoch) -> Result<Orientation, StateError> {
        match self {
            Self::Spherical => Ok(rotation_only(time)),
            Self::Geoid(geoid) => geoid.orientation(time),
        }
    }

    pub fn transformation_matrix(&self, time: Epoch) -> Result<Transformation, StateError> {
        Ok(self.orientation(time)?.0)
    }

    pub fn angular_velocity(&self, time: Epoch) -> Result<AngularVelocity, StateError> {
        Ok(self.orientation(time)?.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// wraps the real provider and counts how often it is asked.
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl OrientationProvider for CountingProvider {
        fn orientation_at(&self, time: Epoch) -> Result<Orientation, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RotationProvider::default().orientation_at(time)
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn counting_geoid() -> (EarthOrientation, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let orientation = EarthOrientation::geoid(CountingProvider {
            calls: Arc::clone(&calls),
        });
        (orientation, calls)
    }

    #[test]
    fn era_at_j2000() {
        assert_abs_diff_eq!(earth_rotation_angle(Epoch::J2000), TAU * ERA_AT_J2000, epsilon = 1e-12);
    }

    #[test]
    fn era_advances_at_rotation_rate() {
        let t0 = Epoch::from_j2000_seconds(12_345.0);
        let delta = earth_rotation_angle(t0 + 1.0) - earth_rotation_angle(t0);
        assert_abs_diff_eq!(delta, EARTH_ROTATION_RATE, epsilon = 1e-12);
    }

    #[test]
    fn spherical_orientation_is_a_pure_z_rotation() {
        let (t_ei, omega) = EarthOrientation::Spherical.orientation(Epoch::J2000).unwrap();
        assert_eq!(t_ei.source_frame(), ReferenceFrame::EarthCenteredInertial);
        assert_eq!(t_ei.target_frame(), ReferenceFrame::EarthCenteredEarthFixed);
        assert_abs_diff_eq!(t_ei.data()[(2, 2)], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(omega.rate().z, EARTH_ROTATION_RATE, epsilon = 1e-18);
    }

    #[test]
    fn geoid_asks_provider_once_per_time() {
        let (orientation, calls) = counting_geoid();
        let t = Epoch::from_j2000_seconds(60.0);

        let t_ei = orientation.transformation_matrix(t).unwrap();
        let omega = orientation.angular_velocity(t).unwrap();
        let again = orientation.transformation_matrix(t).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(t_ei, again);
        assert_abs_diff_eq!(omega.rate().z, EARTH_ROTATION_RATE, epsilon = 1e-18);
    }

    #[test]
    fn geoid_cache_holds_five_times() {
        let (orientation, calls) = counting_geoid();
        for step in 0..7 {
            orientation
                .orientation(Epoch::from_j2000_seconds(step as f64))
                .unwrap();
        }
        let EarthOrientation::Geoid(geoid) = &orientation else {
            unreachable!()
        };
        assert_eq!(geoid.cached_entries(), DEFAULT_CACHE_SIZE);

        // the oldest two were evicted, the newest is still there.
        orientation.orientation(Epoch::from_j2000_seconds(6.0)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 7);
        orientation.orientation(Epoch::from_j2000_seconds(0.0)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn polar_motion_tilts_the_pole_slightly() {
        let (t_ei, _) = RotationProvider::default()
            .orientation_at(Epoch::J2000)
            .unwrap();
        let m = t_ei.data();
        assert!(m[(2, 2)] < 1.0);
        assert_abs_diff_eq!(m[(2, 2)], 1.0, epsilon = 1e-11);
        // still a rotation
        assert_abs_diff_eq!((m * m.transpose()), nalgebra::Matrix3::identity(), epsilon = 1e-14);
    }

    #[test]
    fn out_of_range_time_is_a_provider_failure() {
        let orientation = EarthOrientation::geoid(RotationProvider::default());
        let long_ago = Epoch::from_julian_date(2_415_020.5); // 1900
        assert!(matches!(
            orientation.orientation(long_ago),
            Err(StateError::ProviderFailure(ProviderError::OutOfRange { .. }))
        ));
    }
}
