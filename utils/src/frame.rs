//! Reference frame and coordinate system tags carried by every vector and matrix.
use std::fmt::Display;
use std::str::FromStr;

use crate::error::FrameError;

/// The frame a quantity is expressed in. Purely a tag; carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceFrame {
    EarthCenteredInertial,
    EarthCenteredEarthFixed,
    /// local-level north/east/down frame at the body's latitude and longitude.
    Geographic,
    Body,
    Wind,
    /// x along the velocity vector, rotated from Geographic by heading then flight path angle.
    FlightPath,
    /// data that has not been classified yet.
    Unknown,
}

impl ReferenceFrame {
    pub const ALL: [ReferenceFrame; 7] = [
        Self::EarthCenteredInertial,
        Self::EarthCenteredEarthFixed,
        Self::Geographic,
        Self::Body,
        Self::Wind,
        Self::FlightPath,
        Self::Unknown,
    ];

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::EarthCenteredInertial => "ECI",
            Self::EarthCenteredEarthFixed => "ECEF",
            Self::Geographic => "GEO",
            Self::Body => "BODY",
            Self::Wind => "WIND",
            Self::FlightPath => "FP",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl Display for ReferenceFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for ReferenceFrame {
    type Err = FrameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        //! accepts the full name in any case with spaces, commas and hyphens ignored
        //! ("Earth Centered, Earth Fixed" == "earth-centered-earth-fixed"), or the short name.
        let squashed: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',' && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match squashed.as_str() {
            "earthcenteredinertial" | "eci" => Ok(Self::EarthCenteredInertial),
            "earthcenteredearthfixed" | "ecef" => Ok(Self::EarthCenteredEarthFixed),
            "geographic" | "geo" => Ok(Self::Geographic),
            "body" => Ok(Self::Body),
            "wind" => Ok(Self::Wind),
            "flightpath" | "fp" => Ok(Self::FlightPath),
            "unknown" => Ok(Self::Unknown),
            _ => Err(FrameError::UnknownFrameName(value.to_string())),
        }
    }
}

/// How the three scalar components of a vector are to be read. Orthogonal to [`ReferenceFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoordinateSystem {
    #[default]
    Cartesian,
    /// (geocentric latitude, longitude, radius); angles in radians.
    Spherical,
    /// (geodetic latitude, longitude, altitude above the ellipsoid); angles in radians.
    Geodetic,
}

impl FromStr for CoordinateSystem {
    type Err = FrameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "cartesian" => Ok(Self::Cartesian),
            "spherical" => Ok(Self::Spherical),
            "geodetic" => Ok(Self::Geodetic),
            _ => Err(FrameError::UnknownCoordinateSystem(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_names_are_forgiving() {
        assert_eq!(
            "Earth Centered, Earth Fixed".parse::<ReferenceFrame>().unwrap(),
            ReferenceFrame::EarthCenteredEarthFixed
        );
        assert_eq!(
            "earth-centered-inertial".parse::<ReferenceFrame>().unwrap(),
            ReferenceFrame::EarthCenteredInertial
        );
        assert_eq!("ECI".parse::<ReferenceFrame>().unwrap(), ReferenceFrame::EarthCenteredInertial);
        assert!(matches!(
            "moon fixed".parse::<ReferenceFrame>(),
            Err(FrameError::UnknownFrameName(_))
        ));
    }

    #[test]
    fn coordinate_system_names() {
        assert_eq!(" Geodetic ".parse::<CoordinateSystem>().unwrap(), CoordinateSystem::Geodetic);
        assert!("polar".parse::<CoordinateSystem>().is_err());
        assert_eq!(CoordinateSystem::default(), CoordinateSystem::Cartesian);
    }
}
