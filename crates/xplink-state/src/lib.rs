//! XPLINK State - Normalized flight state and local-frame bookkeeping
//!
//! This crate holds:
//! - [`TelemetryFrame`]: the normalized flight-state record the bridge
//!   maintains from decoded telemetry, and the per-field transform table
//!   that mutates it
//! - [`LocalFrame`]: the dead-reckoned tangent frame with hard re-anchoring
//!   when it diverges from the simulator's authoritative position
//! - [`Integrator`] / [`ParamStore`]: the opaque services the embedding
//!   simulation provides

pub mod drift;
pub mod frame;
pub mod services;

pub use drift::*;
pub use frame::*;
pub use services::*;
