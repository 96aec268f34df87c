//! Earth shapes: closed-form conversions between geodetic and Earth-fixed Cartesian coordinates.
use std::fmt::Debug;

use nalgebra::Vector3;

/// WGS84 semi-major axis (m).
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
/// WGS84 gravitational parameter (m^3/s^2).
pub const WGS84_MU: f64 = 3.986_004_418e14;

/// Below this distance from the polar axis (m) a point is treated as lying on it.
const POLAR_AXIS_EPSILON: f64 = 1e-9;

/// latitude and longitude in radians, altitude in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// The shape of the Earth as seen by the frame algebra.
pub trait EarthShape: Debug + Send + Sync {
    fn geodetic_to_cartesian(&self, latitude: f64, longitude: f64, altitude: f64) -> Vector3<f64>;

    fn cartesian_to_geodetic(&self, position: &Vector3<f64>) -> Geodetic;

    fn spherical_to_cartesian(&self, latitude: f64, longitude: f64, radius: f64) -> Vector3<f64> {
        //! geocentric spherical coordinates are shape independent.
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_lon, cos_lon) = longitude.sin_cos();
        Vector3::new(
            radius * cos_lat * cos_lon,
            radius * cos_lat * sin_lon,
            radius * sin_lat,
        )
    }
}

/// A perfect sphere with the WGS84 equatorial radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalEarth {
    pub radius: f64,
}

impl Default for SphericalEarth {
    fn default() -> Self {
        Self {
            radius: WGS84_SEMI_MAJOR_AXIS,
        }
    }
}

impl EarthShape for SphericalEarth {
    fn geodetic_to_cartesian(&self, latitude: f64, longitude: f64, altitude: f64) -> Vector3<f64> {
        self.spherical_to_cartesian(latitude, longitude, self.radius + altitude)
    }

    fn cartesian_to_geodetic(&self, position: &Vector3<f64>) -> Geodetic {
        let horizontal = position.x.hypot(position.y);
        Geodetic {
            latitude: position.z.atan2(horizontal),
            longitude: position.y.atan2(position.x),
            altitude: position.norm() - self.radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wgs84Ellipsoid {
    pub semi_major_axis: f64,
    pub flattening: f64,
}

impl Default for Wgs84Ellipsoid {
    fn default() -> Self {
        Self {
            semi_major_axis: WGS84_SEMI_MAJOR_AXIS,
            flattening: WGS84_FLATTENING,
        }
    }
}

impl Wgs84Ellipsoid {
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening)
    }

    /// first eccentricity squared.
    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }
}

impl EarthShape for Wgs84Ellipsoid {
    fn geodetic_to_cartesian(&self, latitude: f64, longitude: f64, altitude: f64) -> Vector3<f64> {
        let e2 = self.eccentricity_squared();
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_lon, cos_lon) = longitude.sin_cos();

        // prime vertical radius of curvature
        let n = self.semi_major_axis / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        Vector3::new(
            (n + altitude) * cos_lat * cos_lon,
            (n + altitude) * cos_lat * sin_lon,
            (n * (1.0 - e2) + altitude) * sin_lat,
        )
    }

    fn cartesian_to_geodetic(&self, position: &Vector3<f64>) -> Geodetic {
        //! Heikkinen's closed-form inversion. Exact to well below a millimetre for
        //! points outside the Earth's core.
        let a = self.semi_major_axis;
        let b = self.semi_minor_axis();
        let e2 = self.eccentricity_squared();
        let ep2 = (a * a - b * b) / (b * b);

        let (x, y, z) = (position.x, position.y, position.z);
        let p = x.hypot(y);
        let longitude = y.atan2(x);

        if p < POLAR_AXIS_EPSILON {
            let latitude = if z >= 0.0 {
                std::f64::consts::FRAC_PI_2
            } else {
                -std::f64::consts::FRAC_PI_2
            };
            return Geodetic {
                latitude,
                longitude,
                altitude: z.abs() - b,
            };
        }

        let f = 54.0 * b * b * z * z;
        let g = p * p + (1.0 - e2) * z * z - e2 * (a * a - b * b);
        let c = e2 * e2 * f * p * p / (g * g * g);
        let s = (1.0 + c + (c * c + 2.0 * c).sqrt()).cbrt();
        let k = s + 1.0 + 1.0 / s;
        let big_p = f / (3.0 * k * k * g * g);
        let q = (1.0 + 2.0 * e2 * e2 * big_p).sqrt();
        let r0 = -big_p * e2 * p / (1.0 + q)
            + (0.5 * a * a * (1.0 + 1.0 / q)
                - big_p * (1.0 - e2) * z * z / (q * (1.0 + q))
                - 0.5 * big_p * p * p)
                .sqrt();
        let u = ((p - e2 * r0).powi(2) + z * z).sqrt();
        let v = ((p - e2 * r0).powi(2) + (1.0 - e2) * z * z).sqrt();
        let z0 = b * b * z / (a * v);

        Geodetic {
            latitude: (z + ep2 * z0).atan2(p),
            longitude,
            altitude: u * (1.0 - b * b / (a * v)),
        }
    }
}
