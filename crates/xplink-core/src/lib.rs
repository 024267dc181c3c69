//! XPLINK Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the xplink bridge:
//! - Error taxonomy (XplinkError)
//! - Simulation time (SimTime)
//! - Geodetic and body-frame geometry (Location, Vector3, Matrix3)
//! - Unit conversion constants

pub mod error;
pub mod geo;
pub mod time;
pub mod units;

pub use error::*;
pub use geo::*;
pub use time::*;
pub use units::*;
