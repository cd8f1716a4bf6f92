//! Fixed-interval progress clock driving a charging attempt.
//!
//! The clock advances `elapsed` by a fixed interval per tick until it reaches
//! the configured total duration. Completion fires exactly once; elapsed time
//! is clamped so a delayed tick can never overshoot 100% or double-fire.

use crate::fixed::{Fixed64, Ticks};

/// What a single clock tick reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    /// Charge progress in [0, 1], non-decreasing, exactly 1 at completion.
    pub progress: Fixed64,
    /// True on the single tick that reached the total duration.
    pub completed: bool,
}

/// Fixed-interval ticker reporting progress over a configured duration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProgressClock {
    interval: Ticks,
    total: Ticks,
    elapsed: Ticks,
    running: bool,
    fired: bool,
}

impl ProgressClock {
    /// Create a stopped clock. Zero interval or total are clamped to 1 so the
    /// clock always makes progress.
    pub fn new(interval: Ticks, total: Ticks) -> Self {
        Self {
            interval: interval.max(1),
            total: total.max(1),
            elapsed: 0,
            running: false,
            fired: false,
        }
    }

    /// Arm the clock, resetting elapsed time and the completion latch.
    pub fn start(&mut self) {
        self.elapsed = 0;
        self.running = true;
        self.fired = false;
    }

    /// Stop the clock without firing completion. Elapsed time is kept so
    /// `progress()` remains stable for display until the next `start()`.
    pub fn cancel(&mut self) {
        self.running = false;
    }

    /// Advance by one fixed interval.
    pub fn tick(&mut self) -> ClockTick {
        self.advance(self.interval)
    }

    /// Advance by a measured delta. Elapsed time is clamped to the total
    /// duration, so a delayed callback cannot overshoot or double-fire.
    pub fn advance(&mut self, dt: Ticks) -> ClockTick {
        if !self.running {
            return ClockTick {
                progress: self.progress(),
                completed: false,
            };
        }

        self.elapsed = self.elapsed.saturating_add(dt).min(self.total);

        let completed = self.elapsed >= self.total && !self.fired;
        if completed {
            self.fired = true;
            self.running = false;
        }

        ClockTick {
            progress: self.progress(),
            completed,
        }
    }

    /// Charge progress in [0, 1].
    ///
    /// Computed as an exact Q32.32 ratio in integer math. `elapsed` is
    /// clamped to `total`, so the result fits for any `u64` duration;
    /// converting the ticks through `Fixed64` would overflow past 2^31.
    pub fn progress(&self) -> Fixed64 {
        let bits = ((self.elapsed as u128) << 32) / self.total as u128;
        Fixed64::from_bits(bits as i64)
    }

    /// Whether the clock is currently ticking.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The fixed tick interval.
    pub fn interval(&self) -> Ticks {
        self.interval
    }

    /// The configured total duration.
    pub fn total(&self) -> Ticks {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::f64_to_fixed64;

    #[test]
    fn progress_starts_at_zero() {
        let mut clock = ProgressClock::new(30, 1500);
        clock.start();
        assert_eq!(clock.progress(), Fixed64::ZERO);
    }

    #[test]
    fn progress_non_decreasing_and_completes_once() {
        let mut clock = ProgressClock::new(30, 1500);
        clock.start();

        let mut last = Fixed64::ZERO;
        let mut completions = 0;
        for _ in 0..100 {
            let t = clock.tick();
            assert!(t.progress >= last, "progress decreased");
            last = t.progress;
            if t.completed {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(last, f64_to_fixed64(1.0));
    }

    #[test]
    fn completion_at_exact_boundary() {
        // 1500 / 30 = 50 ticks exactly.
        let mut clock = ProgressClock::new(30, 1500);
        clock.start();
        for _ in 0..49 {
            assert!(!clock.tick().completed);
        }
        let last = clock.tick();
        assert!(last.completed);
        assert_eq!(last.progress, f64_to_fixed64(1.0));
    }

    #[test]
    fn uneven_interval_clamps_to_total() {
        // 7 does not divide 100; the final tick must clamp, not overshoot.
        let mut clock = ProgressClock::new(7, 100);
        clock.start();
        let mut final_progress = Fixed64::ZERO;
        for _ in 0..20 {
            final_progress = clock.tick().progress;
        }
        assert_eq!(final_progress, f64_to_fixed64(1.0));
    }

    #[test]
    fn delayed_advance_fires_exactly_once() {
        let mut clock = ProgressClock::new(30, 1500);
        clock.start();
        // One huge delayed callback.
        let t = clock.advance(1_000_000);
        assert!(t.completed);
        assert_eq!(t.progress, f64_to_fixed64(1.0));
        // Further ticks are no-ops.
        let t = clock.advance(1_000_000);
        assert!(!t.completed);
        assert_eq!(t.progress, f64_to_fixed64(1.0));
    }

    #[test]
    fn cancel_stops_without_firing() {
        let mut clock = ProgressClock::new(30, 1500);
        clock.start();
        clock.tick();
        clock.cancel();
        assert!(!clock.is_running());
        for _ in 0..200 {
            assert!(!clock.tick().completed);
        }
    }

    #[test]
    fn restart_resets_elapsed_and_latch() {
        let mut clock = ProgressClock::new(10, 100);
        clock.start();
        for _ in 0..10 {
            clock.tick();
        }
        assert!(!clock.is_running());

        clock.start();
        assert_eq!(clock.progress(), Fixed64::ZERO);
        let mut completions = 0;
        for _ in 0..20 {
            if clock.tick().completed {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
    }

    #[test]
    fn huge_duration_stays_in_range() {
        // Durations past 2^31 ticks must not overflow the fixed-point ratio.
        let total = 1u64 << 40;
        let mut clock = ProgressClock::new(30, total);
        clock.start();

        let t = clock.advance(total / 2);
        assert!(!t.completed);
        assert_eq!(t.progress, f64_to_fixed64(0.5));

        let t = clock.advance(total);
        assert!(t.completed);
        assert_eq!(t.progress, f64_to_fixed64(1.0));
    }

    #[test]
    fn zero_config_clamped() {
        let mut clock = ProgressClock::new(0, 0);
        clock.start();
        assert!(clock.tick().completed);
    }
}
