//! Opaque services provided by the embedding simulation
//!
//! The bridge never integrates physics itself; it hands positions and time
//! steps to an [`Integrator`] supplied by the harness and reads back the
//! geodetic location that integration produced.

use xplink_core::{Location, Vector3};

/// Physics integration service
pub trait Integrator {
    /// Rebuild the full aircraft state from the anchor location and the
    /// integrated local position
    fn update_position(&mut self, home: Location, position: Vector3);

    /// Advance the harness's own timeline bookkeeping
    fn time_advance(&mut self);

    /// Extrapolate sensor state forward by `delta_s` seconds when no real
    /// telemetry is available
    fn extrapolate_sensors(&mut self, delta_s: f32);

    /// Geodetic location as currently integrated by the harness
    fn location(&self) -> Location;
}

/// Simulation-parameter store
///
/// Used once at construction to inject advisory defaults; never consulted
/// afterwards.
pub trait ParamStore {
    fn set_default(&mut self, name: &str, value: f32);
}
