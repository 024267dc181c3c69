//! Dead-reckoning local frame and drift correction
//!
//! The bridge integrates position in a Cartesian tangent frame anchored at
//! a reference geodetic location. Float accuracy and longitude scaling make
//! the integrated position drift slowly away from the simulator's
//! authoritative geodetic position; past a small threshold the frame is
//! re-anchored in one hard step rather than smoothed.

use tracing::warn;

use xplink_core::{Location, Vector3};

/// Horizontal divergence that forces a re-anchor, meters
pub const DRIFT_HORIZONTAL_M: f32 = 4.0;

/// Vertical divergence that forces a re-anchor, meters
pub const DRIFT_VERTICAL_M: f32 = 2.0;

/// The Cartesian tangent-plane frame used for dead-reckoned position
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFrame {
    /// Offset added to the simulator's reported local position
    origin: Vector3,
    /// Integrated position handed to the physics integrator
    position: Vector3,
    /// Reference geodetic location the frame is anchored at
    home: Location,
}

impl LocalFrame {
    pub fn new() -> Self {
        LocalFrame::default()
    }

    /// Fold a newly reported local position into the frame
    pub fn compose(&mut self, measured: Vector3) -> Vector3 {
        self.position = measured + self.origin;
        self.position
    }

    /// Re-anchor when the authoritative location has diverged from the
    /// tracked one. Returns true when a re-anchor happened; the caller must
    /// then push the zeroed position back through the integrator.
    pub fn correct_drift(
        &mut self,
        measured: Vector3,
        reported: Location,
        tracked: Location,
    ) -> bool {
        let horizontal = reported.distance_m(tracked);
        let vertical = reported.alt_difference_m(tracked);
        if horizontal <= DRIFT_HORIZONTAL_M && vertical <= DRIFT_VERTICAL_M {
            return false;
        }

        warn!(
            horizontal_m = horizontal,
            reported_alt_m = reported.alt_meters(),
            tracked_alt_m = tracked.alt_meters(),
            "re-anchoring local frame"
        );

        // the currently reported position becomes the new origin
        self.origin = -measured;
        self.position = Vector3::ZERO;
        self.home = reported;
        true
    }

    #[inline]
    pub fn position(&self) -> Vector3 {
        self.position
    }

    #[inline]
    pub fn home(&self) -> Location {
        self.home
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_applies_origin() {
        let mut frame = LocalFrame::new();
        let p = frame.compose(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_no_reanchor_under_threshold() {
        let mut frame = LocalFrame::new();
        let reported = Location {
            lat: 300, // ~3.3m north
            lng: 0,
            alt: 100,
        };
        let tracked = Location::default();

        assert!(!frame.correct_drift(Vector3::ZERO, reported, tracked));
    }

    #[test]
    fn test_horizontal_drift_reanchors() {
        let mut frame = LocalFrame::new();
        let measured = Vector3::new(10.0, 20.0, -5.0);
        frame.compose(measured);

        let reported = Location {
            lat: 500, // ~5.6m north of tracked
            lng: 0,
            alt: 0,
        };
        let tracked = Location::default();

        assert!(frame.correct_drift(measured, reported, tracked));
        assert_eq!(frame.position(), Vector3::ZERO);
        assert_eq!(frame.home(), reported);

        // subsequent reports of the same measured position collapse to zero
        assert_eq!(frame.compose(measured), Vector3::ZERO);
    }

    #[test]
    fn test_vertical_drift_reanchors() {
        let mut frame = LocalFrame::new();
        let reported = Location {
            lat: 0,
            lng: 0,
            alt: 250, // 2.5m above tracked
        };
        let tracked = Location::default();

        assert!(frame.correct_drift(Vector3::ZERO, reported, tracked));
    }

    #[test]
    fn test_reanchor_fires_once_at_divergence() {
        let mut frame = LocalFrame::new();
        let measured = Vector3::new(100.0, 0.0, 0.0);
        frame.compose(measured);

        let reported = Location {
            lat: 9_000, // ~100m
            lng: 0,
            alt: 0,
        };
        // first cycle: tracked still at the old anchor, diverged
        assert!(frame.correct_drift(measured, reported, Location::default()));
        // next cycle: the integrator now tracks from the new anchor
        assert!(!frame.correct_drift(measured, reported, reported));
    }
}
