//! Fixed-timestep clock
//!
//! Converts wall-clock frame deltas into whole simulation ticks. The
//! accumulator pattern keeps the simulation rate independent of render
//! cadence; the per-frame tick cap keeps a slow frame from snowballing into
//! an ever-growing backlog (spiral of death).

/// Accumulates frame time and emits fixed ticks
#[derive(Debug, Clone)]
pub struct Clock {
    step: f32,
    max_ticks_per_frame: u32,
    max_frame_delta: f32,
    accumulator: f32,
}

impl Clock {
    pub fn new(step: f32, max_ticks_per_frame: u32, max_frame_delta: f32) -> Self {
        Self {
            step,
            max_ticks_per_frame,
            max_frame_delta,
            accumulator: 0.0,
        }
    }

    /// The fixed step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Advance by one frame delta and return how many ticks to simulate
    ///
    /// Emits at most `max_ticks_per_frame` ticks. If the cap is hit with
    /// backlog still pending, the backlog is dropped rather than queued, so
    /// the simulation slows down under load instead of chasing real time
    /// forever.
    pub fn advance(&mut self, frame_delta: f32) -> u32 {
        let dt = frame_delta.clamp(0.0, self.max_frame_delta);
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.step;
            ticks += 1;
        }

        if ticks == self.max_ticks_per_frame && self.accumulator >= self.step {
            self.accumulator = 0.0;
        }

        ticks
    }

    /// Drop any accumulated lag (on phase changes that stop the simulation)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_steady_frames_emit_steady_ticks() {
        let mut clock = Clock::new(1.0 / 60.0, 5, 0.1);
        let mut total = 0;
        // 60 frames of exactly one step each
        for _ in 0..60 {
            total += clock.advance(1.0 / 60.0);
        }
        assert_eq!(total, 60);
    }

    #[test]
    fn test_sub_step_deltas_accumulate() {
        let mut clock = Clock::new(1.0 / 60.0, 5, 0.1);
        // Half a step at a time: every other frame ticks
        assert_eq!(clock.advance(1.0 / 120.0), 0);
        assert_eq!(clock.advance(1.0 / 120.0), 1);
    }

    #[test]
    fn test_cap_discards_excess_lag() {
        let mut clock = Clock::new(1.0 / 60.0, 5, 1.0);
        // A full second of lag: cap at 5 ticks, backlog dropped
        assert_eq!(clock.advance(1.0), 5);
        // Next small frame starts from a clean accumulator
        assert_eq!(clock.advance(1.0 / 120.0), 0);
        assert_eq!(clock.advance(1.0 / 120.0), 1);
    }

    #[test]
    fn test_frame_delta_clamp() {
        // max_frame_delta well below the requested delta
        let mut clock = Clock::new(1.0 / 60.0, 10, 1.0 / 30.0);
        assert_eq!(clock.advance(10.0), 2);
    }

    #[test]
    fn test_reset_drops_accumulated_lag() {
        let mut clock = Clock::new(1.0 / 60.0, 5, 0.1);
        assert_eq!(clock.advance(0.015), 0);
        assert_eq!(clock.advance(0.015), 1);

        let mut clock = Clock::new(1.0 / 60.0, 5, 0.1);
        assert_eq!(clock.advance(0.015), 0);
        clock.reset();
        assert_eq!(clock.advance(0.015), 0);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut clock = Clock::new(1.0 / 60.0, 5, 0.1);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(1.0 / 60.0), 1);
    }

    proptest! {
        /// Many small advances produce the same tick count (within one) as a
        /// single advance with the summed delta, as long as neither path hits
        /// the per-frame cap.
        #[test]
        fn prop_tick_conservation(deltas in proptest::collection::vec(0.0f32..0.016, 1..50)) {
            let step = 1.0 / 60.0;
            let mut split = Clock::new(step, u32::MAX, f32::MAX);
            let mut merged = Clock::new(step, u32::MAX, f32::MAX);

            let mut split_ticks = 0u64;
            for &dt in &deltas {
                split_ticks += u64::from(split.advance(dt));
            }
            let sum: f32 = deltas.iter().sum();
            let merged_ticks = u64::from(merged.advance(sum));

            let diff = split_ticks.abs_diff(merged_ticks);
            prop_assert!(diff <= 1, "split={split_ticks} merged={merged_ticks}");
        }

        /// The tick count for a single frame never exceeds the cap.
        #[test]
        fn prop_cap_is_respected(dt in 0.0f32..10.0, cap in 1u32..20) {
            let mut clock = Clock::new(1.0 / 60.0, cap, f32::MAX);
            prop_assert!(clock.advance(dt) <= cap);
        }
    }
}
