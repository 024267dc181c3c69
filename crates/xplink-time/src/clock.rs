//! Simulator clock synchronizer
//!
//! The simulator reports elapsed seconds since its own scenario start.
//! That value jumps backward on a scenario reload and can stall between
//! identical datagrams. The bridge keeps `current = base_offset + elapsed`
//! and recomputes `base_offset` whenever the reported timeline would move
//! the tracked clock backward or hold it still.
//! INVARIANT: the tracked clock never decreases across calls.

use std::time::Duration;

use tracing::warn;

use xplink_core::SimTime;

/// Backward jumps larger than this are logged as anomalies
const RESET_LOG_THRESHOLD_US: u64 = 1_000_000;

/// Monotonic local timeline driven by simulator-reported elapsed time
#[derive(Clone, Copy, Debug, Default)]
pub struct SimClock {
    /// Offset added to the simulator's reported elapsed time
    base_offset_us: u64,
    /// Tracked local timeline
    now_us: u64,
}

impl SimClock {
    pub fn new() -> Self {
        SimClock::default()
    }

    /// Fold one reported elapsed-seconds value into the tracked timeline.
    ///
    /// A reported value that would move the clock backward (or not at all)
    /// is treated as a simulator reset: the base offset is recomputed so
    /// the timeline continues forward from the present tracked time.
    pub fn absorb_elapsed(&mut self, elapsed_s: f32) -> SimTime {
        let elapsed_us = (elapsed_s as f64 * 1.0e6) as u64;

        let candidate = self.base_offset_us.saturating_add(elapsed_us);
        if candidate <= self.now_us {
            let jump_us = self.now_us - candidate;
            if jump_us > RESET_LOG_THRESHOLD_US {
                warn!(jump_us, "simulator time reset");
            }
            self.base_offset_us = self.now_us - elapsed_us;
        }

        self.now_us = self.base_offset_us.saturating_add(elapsed_us);
        SimTime::from_micros(self.now_us)
    }

    /// Advance the tracked timeline directly (extrapolation step)
    pub fn advance(&mut self, step: Duration) -> SimTime {
        self.now_us += step.as_micros() as u64;
        SimTime::from_micros(self.now_us)
    }

    /// Current tracked time
    #[inline]
    pub fn now(&self) -> SimTime {
        SimTime::from_micros(self.now_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_follows_forward_time() {
        let mut clock = SimClock::new();

        assert_eq!(clock.absorb_elapsed(1.0).as_micros(), 1_000_000);
        assert_eq!(clock.absorb_elapsed(1.5).as_micros(), 1_500_000);
        assert_eq!(clock.absorb_elapsed(2.0).as_micros(), 2_000_000);
    }

    #[test]
    fn test_clock_absorbs_backward_reset() {
        let mut clock = SimClock::new();

        clock.absorb_elapsed(100.0);
        // scenario reload: the simulator starts counting from zero again
        let t = clock.absorb_elapsed(2.0);

        // tracked time holds at the pre-reset value
        assert_eq!(t.as_micros(), 100_000_000);
        // and continues forward from there
        let t = clock.absorb_elapsed(2.5);
        assert_eq!(t.as_micros(), 100_500_000);
    }

    #[test]
    fn test_clock_holds_on_stalled_time() {
        let mut clock = SimClock::new();

        clock.absorb_elapsed(5.0);
        let t = clock.absorb_elapsed(5.0);

        assert_eq!(t.as_micros(), 5_000_000);
    }

    #[test]
    fn test_advance_moves_clock() {
        let mut clock = SimClock::new();

        clock.absorb_elapsed(1.0);
        clock.advance(Duration::from_millis(1));

        assert_eq!(clock.now().as_micros(), 1_001_000);
    }

    #[test]
    fn test_reported_time_continues_after_advance() {
        let mut clock = SimClock::new();

        clock.absorb_elapsed(1.0);
        // extrapolated cycles push the tracked clock past the report stream
        for _ in 0..10 {
            clock.advance(Duration::from_millis(1));
        }
        // the next report is behind the tracked clock; base offset absorbs it
        let t = clock.absorb_elapsed(1.005);
        assert_eq!(t.as_micros(), 1_010_000);

        let t = clock.absorb_elapsed(1.010);
        assert_eq!(t.as_micros(), 1_015_000);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn clock_never_decreases(elapsed in proptest::collection::vec(0.0f32..1.0e6, 1..64)) {
                let mut clock = SimClock::new();
                let mut last = SimTime::ZERO;
                for e in elapsed {
                    let t = clock.absorb_elapsed(e);
                    prop_assert!(t >= last);
                    last = t;
                }
            }
        }
    }
}
