//! Easing functions and a small tween abstraction.
//!
//! Easing remaps linear progress in [0, 1] to a perceptually smoother curve.
//! Inputs are clamped to the unit interval, so callers can feed raw
//! `t / duration` ratios without pre-clamping.

/// An easing curve over the unit interval.
pub type EaseFn = fn(f32) -> f32;

/// Identity easing.
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quartic ease-out: fast start, long smooth tail. Used to attenuate
/// particle velocity over a burst's life.
pub fn ease_out_quart(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(4)
}

/// Cubic ease-in-out: gentle at both ends. Used for the global fade.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// An eased interpolation between two values over a fixed duration.
///
/// Replaces animation-library tween calls: the tick loop samples
/// [`value_at`](Tween::value_at) with elapsed time, and completion is an
/// explicit check rather than a callback.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    start: f32,
    end: f32,
    duration: f32,
    ease: EaseFn,
}

impl Tween {
    /// Create a tween. Non-positive durations are treated as instantaneous.
    pub fn new(start: f32, end: f32, duration: f32, ease: EaseFn) -> Self {
        Self {
            start,
            end,
            duration,
            ease,
        }
    }

    /// Sample the tween at elapsed time `t` (seconds since start).
    pub fn value_at(&self, t: f32) -> f32 {
        if self.duration <= 0.0 {
            return self.end;
        }
        let progress = (self.ease)(t / self.duration);
        self.start + (self.end - self.start) * progress
    }

    /// Whether the tween has reached its end value at time `t`.
    pub fn finished(&self, t: f32) -> bool {
        t >= self.duration
    }
}
