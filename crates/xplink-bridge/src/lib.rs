//! XPLINK Bridge - Tick-driven protocol bridge runtime
//!
//! This crate implements the per-tick loop spoken with the simulator:
//! 1. Bounded-wait receive (adaptive 1-10ms window)
//! 2. Telemetry decode and field dispatch
//! 3. Data-selection negotiation when the field set is incomplete
//! 4. Clock synchronization and drift correction
//! 5. Hand-off to the external physics integrator
//! 6. Control-output encoding and send
//!
//! When no usable datagram arrives the bridge extrapolates state forward
//! in fixed nominal steps, bounded by a silence cap.

pub mod bridge;
pub mod config;
pub mod control;
pub mod link;
pub mod negotiate;

pub use bridge::*;
pub use config::*;
pub use control::*;
pub use link::*;
pub use negotiate::*;
