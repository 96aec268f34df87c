//! Simulation time. A continuous, monotonic scalar that drives both the
//! integrators and the Earth orientation lookups.
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Julian date of the J2000.0 epoch (2000-01-01T12:00:00).
pub const J2000_JULIAN_DATE: f64 = 2_451_545.0;
/// Unix time of the J2000.0 epoch.
const J2000_UNIX_SECONDS: f64 = 946_728_000.0;

/// Seconds since J2000.0 on the simulation's uniform timescale.
///
/// Totally ordered and hashable so it can key the orientation cache. Two epochs
/// are equal only when their bit patterns match; `-0.0` is folded into `0.0`.
#[derive(Debug, Clone, Copy)]
pub struct Epoch(f64);

impl Epoch {
    pub const J2000: Epoch = Epoch(0.0);

    pub fn from_j2000_seconds(seconds: f64) -> Self {
        // fold -0.0 so it hashes the same as 0.0
        Self(if seconds == 0.0 { 0.0 } else { seconds })
    }

    pub fn from_julian_date(julian_date: f64) -> Self {
        Self::from_j2000_seconds((julian_date - J2000_JULIAN_DATE) * SECONDS_PER_DAY)
    }

    pub fn from_unix_seconds(unix_seconds: f64) -> Self {
        Self::from_j2000_seconds(unix_seconds - J2000_UNIX_SECONDS)
    }

    pub fn j2000_seconds(&self) -> f64 {
        self.0
    }

    /// days since J2000.0.
    pub fn j2000_days(&self) -> f64 {
        self.0 / SECONDS_PER_DAY
    }

    pub fn julian_date(&self) -> f64 {
        J2000_JULIAN_DATE + self.j2000_days()
    }
}

impl PartialEq for Epoch {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Epoch {}

impl PartialOrd for Epoch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Epoch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Epoch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Add<f64> for Epoch {
    type Output = Epoch;

    fn add(self, seconds: f64) -> Epoch {
        Epoch::from_j2000_seconds(self.0 + seconds)
    }
}

impl Sub for Epoch {
    type Output = f64;

    /// seconds between two epochs.
    fn sub(self, other: Epoch) -> f64 {
        self.0 - other.0
    }
}

impl Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JD {:.8}", self.julian_date())
    }
}
