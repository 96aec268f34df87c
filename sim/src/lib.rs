//! Configuration-driven front end for `aero-physics`: load a JSON description of
//! the bodies, build a [`Session`], run it, and read snapshots back as they are produced.
pub mod config;
pub mod feed;
pub mod session;

pub use config::{BodyConfig, Config, ConfigError, EarthModel, InitialOrientation, ObjectType};
pub use feed::SnapshotFeed;
pub use session::{epoch_from_datetime, Session};
