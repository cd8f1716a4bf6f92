//! Reforge Burst -- the particle burst simulator.
//!
//! Given a resolution outcome, spawns a fixed-size particle buffer with
//! outcome-specific kinematics, integrates it every render tick with eased
//! velocity decay, global swirl, and per-particle twinkle, fades the whole
//! burst out over a fixed lifetime, and reports completion exactly once.
//!
//! All math here is cosmetic f32; nothing feeds back into gameplay state, so
//! the deterministic fixed-point discipline of `reforge-core` does not apply.
//! Spawning still runs off the seedable [`EnhanceRng`] so a seeded widget
//! replays pixel-identically.

pub mod bridge;
pub mod ease;
pub mod particle;
pub mod spawn;

use std::f32::consts::{FRAC_PI_3, FRAC_PI_4};

use reforge_core::attempt::Outcome;
use reforge_core::rng::EnhanceRng;

use crate::ease::{ease_in_out_cubic, ease_out_quart};
use crate::particle::{Particle, RenderParticle, RenderSink};
use crate::spawn::spawn_burst;

// ---------------------------------------------------------------------------
// Outcome-specific motion constants
// ---------------------------------------------------------------------------

/// Downward drift applied to success particles (gentle gravity).
const SUCCESS_GRAVITY: f32 = 0.006;
/// Upward drift applied to failure embers (gentle anti-gravity).
const FAILURE_LIFT: f32 = 0.003;
/// Horizontal-plane rotation speed for the success swirl.
const SUCCESS_ROTATION_SPEED: f32 = 0.3;
/// Horizontal-plane rotation speed for the failure swirl.
const FAILURE_SWIRL_SPEED: f32 = 0.8;
/// Elliptical squash on the failure swirl's cross terms.
const FAILURE_SWIRL_SQUASH: f32 = 0.5;
/// Success twinkle: `sin(freq*t + phase) * amp` on x/z.
const SUCCESS_TWINKLE_FREQ: f32 = 4.0;
const SUCCESS_TWINKLE_AMP: f32 = 0.02;
/// Success upward spiral on y.
const SUCCESS_SPIRAL_FREQ: f32 = 2.0;
const SUCCESS_SPIRAL_AMP: f32 = 0.01;
/// Failure pulse on x/z (and half of it on y).
const FAILURE_PULSE_FREQ: f32 = 3.0;
const FAILURE_PULSE_AMP: f32 = 0.008;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Errors raised while validating a [`BurstConfig`].
#[derive(Debug, thiserror::Error)]
pub enum BurstConfigError {
    #[error("particle_count must be at least 1")]
    NoParticles,
    #[error("durations must be positive and min_lifetime <= max_lifetime")]
    BadLifetimes,
    #[error("visibility_radius must be positive")]
    BadVisibilityRadius,
    #[error("frame_normalization must be positive")]
    BadNormalization,
}

/// Tuning for the burst simulator. Times are in seconds of wall time since
/// trigger.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BurstConfig {
    /// Fixed number of particles per burst.
    pub particle_count: u32,
    /// Duration of the global opacity fade.
    pub fade_duration: f32,
    /// Hard upper bound on a burst's life.
    pub max_lifetime: f32,
    /// Earliest the visibility heuristic may complete a burst.
    pub min_lifetime: f32,
    /// A particle within this distance of the anchor keeps the burst alive
    /// (early-completion heuristic only, never a hard stop).
    pub visibility_radius: f32,
    /// Velocity decay rate: eased factor is `ease_out_quart(max(0, 1 - t*k))`.
    pub velocity_decay: f32,
    /// Velocities were calibrated against a 60fps frame, so integration
    /// multiplies by this normalization constant.
    pub frame_normalization: f32,
    /// Base render size before per-particle and global modulation.
    pub render_size: f32,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            particle_count: 120,
            fade_duration: 5.0,
            max_lifetime: 5.5,
            min_lifetime: 2.0,
            visibility_radius: 2.5,
            velocity_decay: 0.3,
            frame_normalization: 60.0,
            render_size: 0.15,
        }
    }
}

impl BurstConfig {
    /// Validate the tuning values.
    pub fn validate(&self) -> Result<(), BurstConfigError> {
        if self.particle_count == 0 {
            return Err(BurstConfigError::NoParticles);
        }
        if self.fade_duration <= 0.0
            || self.max_lifetime <= 0.0
            || self.min_lifetime < 0.0
            || self.min_lifetime > self.max_lifetime
        {
            return Err(BurstConfigError::BadLifetimes);
        }
        if self.visibility_radius <= 0.0 {
            return Err(BurstConfigError::BadVisibilityRadius);
        }
        if self.frame_normalization <= 0.0 {
            return Err(BurstConfigError::BadNormalization);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Global modulation
// ---------------------------------------------------------------------------

/// Shared (not per-particle) modulation for one frame: the burst fades,
/// twinkles, and breathes as a whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstModulation {
    /// Global opacity in [0, 1]: eased fade times a blend of two sine waves
    /// at different frequencies (a single wave looks mechanically uniform).
    pub opacity: f32,
    /// Global size multiplier, likewise a two-wave blend around 1.
    pub size_scale: f32,
    /// Outcome-specific colour intensity applied to the RGB tint.
    pub tint: [f32; 3],
}

fn modulation_at(outcome: Outcome, t: f32, fade_duration: f32) -> BurstModulation {
    let fade = ease_in_out_cubic((t / fade_duration).min(1.0));

    let twinkle_fast = (t * 12.0).sin() * 0.15 + 0.85;
    let twinkle_slow = (t * 7.0 + FRAC_PI_3).sin() * 0.1 + 0.9;
    let combined_twinkle = (twinkle_fast + twinkle_slow) / 2.0;
    let opacity = ((1.0 - fade) * combined_twinkle).max(0.0);

    let size_fast = (t * 8.0).sin() * 0.08 + 0.92;
    let size_slow = (t * 5.0 + FRAC_PI_4).sin() * 0.05 + 0.95;
    let size_scale = (size_fast + size_slow) / 2.0;

    let tint = match outcome {
        Outcome::Success => {
            let intensity = (t * 6.0).sin() * 0.2 + 0.8;
            [1.0, 0.8 * intensity, 0.2 * intensity]
        }
        Outcome::Failure => {
            let intensity = (t * 4.0).sin() * 0.15 + 0.85;
            [0.9 * intensity, 0.1 * intensity, 0.1 * intensity]
        }
    };

    BurstModulation {
        opacity,
        size_scale,
        tint,
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ActiveBurst {
    outcome: Outcome,
    particles: Vec<Particle>,
    /// Seconds since trigger.
    age: f32,
    /// Whether any particle was inside the visibility radius after the most
    /// recent integration step.
    any_visible: bool,
}

/// The particle burst simulator. Owns at most one burst at a time; a new
/// trigger supersedes the previous burst rather than stacking.
#[derive(Debug)]
pub struct BurstSimulator {
    config: BurstConfig,
    rng: EnhanceRng,
    burst: Option<ActiveBurst>,
}

impl BurstSimulator {
    /// Create a simulator with validated tuning and a spawn seed.
    pub fn new(config: BurstConfig, seed: u64) -> Result<Self, BurstConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: EnhanceRng::new(seed),
            burst: None,
        })
    }

    /// Default tuning.
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(BurstConfig::default(), seed).expect("default config is valid")
    }

    /// Start a burst for an outcome. If one is already animating it is
    /// superseded: every particle resets to the origin and the clock
    /// restarts; the buffer size stays constant.
    pub fn trigger(&mut self, outcome: Outcome) {
        let particles = spawn_burst(self.config.particle_count, outcome, &mut self.rng);
        self.burst = Some(ActiveBurst {
            outcome,
            particles,
            age: 0.0,
            any_visible: true,
        });
    }

    /// Advance the burst by a frame delta (seconds). Returns `true` on the
    /// single step that completed the burst; the burst is disposed before
    /// this returns, so completion can never double-report.
    ///
    /// Completion policy: age beyond `max_lifetime`, or nothing left inside
    /// the visibility radius once `min_lifetime` has passed -- whichever
    /// comes first.
    pub fn step(&mut self, dt: f32) -> bool {
        let cfg = &self.config;
        let Some(burst) = self.burst.as_mut() else {
            return false;
        };

        burst.age += dt.max(0.0);
        let t = burst.age;

        // Velocity's effect attenuates smoothly rather than linearly.
        let eased = ease_out_quart((1.0 - t * cfg.velocity_decay).max(0.0));

        let mut any_visible = false;
        for p in &mut burst.particles {
            p.position += p.velocity * eased * dt * cfg.frame_normalization;

            match burst.outcome {
                Outcome::Success => {
                    p.position.y -= dt * SUCCESS_GRAVITY * eased;

                    let angle = t * SUCCESS_ROTATION_SPEED;
                    let (sin, cos) = angle.sin_cos();
                    let (x, z) = (p.position.x, p.position.z);
                    p.position.x = x * cos - z * sin;
                    p.position.z = x * sin + z * cos;

                    let twinkle =
                        (t * SUCCESS_TWINKLE_FREQ + p.phase_offset).sin() * SUCCESS_TWINKLE_AMP;
                    p.position.x += twinkle;
                    p.position.z += twinkle;

                    p.position.y += (t * SUCCESS_SPIRAL_FREQ + 2.0 * p.phase_offset).sin()
                        * SUCCESS_SPIRAL_AMP;
                }
                Outcome::Failure => {
                    p.position.y += dt * FAILURE_LIFT * eased;

                    let angle = t * FAILURE_SWIRL_SPEED;
                    let (sin, cos) = angle.sin_cos();
                    let (x, z) = (p.position.x, p.position.z);
                    p.position.x = x * cos - z * sin * FAILURE_SWIRL_SQUASH;
                    p.position.z = x * sin * FAILURE_SWIRL_SQUASH + z * cos;

                    let pulse =
                        (t * FAILURE_PULSE_FREQ + p.phase_offset).sin() * FAILURE_PULSE_AMP;
                    p.position.x += pulse;
                    p.position.z += pulse;
                    p.position.y += pulse * 0.5;
                }
            }

            if p.position.length() < cfg.visibility_radius {
                any_visible = true;
            }
        }
        burst.any_visible = any_visible;

        let done = t > cfg.max_lifetime || (!any_visible && t > cfg.min_lifetime);
        if done {
            self.burst = None;
        }
        done
    }

    /// Submit the current frame to a render target: position, colour
    /// (premultiplied by global opacity and tint), and size per particle.
    /// No-op while idle.
    pub fn frame(&self, sink: &mut dyn RenderSink) {
        let Some(burst) = &self.burst else {
            return;
        };
        let m = modulation_at(burst.outcome, burst.age, self.config.fade_duration);

        let frame: Vec<RenderParticle> = burst
            .particles
            .iter()
            .map(|p| RenderParticle {
                position: p.position,
                color: [
                    p.color[0] * m.tint[0] * m.opacity,
                    p.color[1] * m.tint[1] * m.opacity,
                    p.color[2] * m.tint[2] * m.opacity,
                ],
                size: self.config.render_size * m.size_scale * p.base_size,
            })
            .collect();
        sink.submit(&frame);
    }

    /// The shared fade/twinkle/tint values for the current age.
    pub fn modulation(&self) -> Option<BurstModulation> {
        self.burst
            .as_ref()
            .map(|b| modulation_at(b.outcome, b.age, self.config.fade_duration))
    }

    /// Teardown: dispose the buffer without reporting completion.
    pub fn cancel(&mut self) {
        self.burst = None;
    }

    /// Whether a burst is animating.
    pub fn is_active(&self) -> bool {
        self.burst.is_some()
    }

    /// Outcome of the burst in flight, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        self.burst.as_ref().map(|b| b.outcome)
    }

    /// Seconds since the current burst was triggered.
    pub fn age(&self) -> Option<f32> {
        self.burst.as_ref().map(|b| b.age)
    }

    /// Live particle count (constant at `particle_count` while active).
    pub fn particle_count(&self) -> usize {
        self.burst.as_ref().map_or(0, |b| b.particles.len())
    }

    /// Read-only view of the particle buffer.
    pub fn particles(&self) -> &[Particle] {
        self.burst.as_ref().map_or(&[], |b| b.particles.as_slice())
    }

    /// The active tuning.
    pub fn config(&self) -> &BurstConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn sim() -> BurstSimulator {
        BurstSimulator::with_defaults(42)
    }

    #[test]
    fn trigger_spawns_exact_count_at_origin() {
        let mut s = sim();
        s.trigger(Outcome::Success);
        assert_eq!(s.particle_count(), 120);
        assert!(s.particles().iter().all(|p| p.position == Vec3::ZERO));
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = BurstConfig {
            particle_count: 0,
            ..BurstConfig::default()
        };
        assert!(matches!(
            BurstSimulator::new(cfg, 1),
            Err(BurstConfigError::NoParticles)
        ));

        let cfg = BurstConfig {
            min_lifetime: 9.0,
            ..BurstConfig::default()
        };
        assert!(matches!(
            BurstSimulator::new(cfg, 1),
            Err(BurstConfigError::BadLifetimes)
        ));
    }

    #[test]
    fn step_moves_particles_outward_for_success() {
        let mut s = sim();
        s.trigger(Outcome::Success);
        for _ in 0..30 {
            s.step(DT);
        }
        let mean_dist = s
            .particles()
            .iter()
            .map(|p| p.position.length())
            .sum::<f32>()
            / 120.0;
        assert!(mean_dist > 0.01, "particles did not spread: {mean_dist}");
    }

    #[test]
    fn completes_exactly_once_at_max_lifetime() {
        let mut s = sim();
        s.trigger(Outcome::Success);

        let mut completions = 0;
        // 6 simulated seconds at 60fps.
        for _ in 0..360 {
            if s.step(DT) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert!(!s.is_active());
    }

    #[test]
    fn idle_simulator_never_completes() {
        let mut s = sim();
        for _ in 0..1000 {
            assert!(!s.step(DT));
        }
    }

    #[test]
    fn retrigger_resets_without_leaking() {
        let mut s = sim();
        s.trigger(Outcome::Success);
        for _ in 0..60 {
            s.step(DT);
        }
        assert!(s.particles().iter().any(|p| p.position != Vec3::ZERO));

        s.trigger(Outcome::Failure);
        assert_eq!(s.particle_count(), 120);
        assert_eq!(s.outcome(), Some(Outcome::Failure));
        assert_eq!(s.age(), Some(0.0));
        assert!(s.particles().iter().all(|p| p.position == Vec3::ZERO));
    }

    #[test]
    fn visibility_heuristic_cannot_fire_before_min_lifetime() {
        // Shrink the visibility radius so everything leaves it immediately;
        // completion must still wait for min_lifetime.
        let cfg = BurstConfig {
            visibility_radius: 1e-6,
            ..BurstConfig::default()
        };
        let mut s = BurstSimulator::new(cfg, 42).unwrap();
        s.trigger(Outcome::Success);

        let mut elapsed = 0.0f32;
        let mut completed_at = None;
        for _ in 0..360 {
            elapsed += DT;
            if s.step(DT) {
                completed_at = Some(elapsed);
                break;
            }
        }
        let completed_at = completed_at.expect("must complete");
        assert!(completed_at > 2.0, "completed too early: {completed_at}");
        assert!(completed_at < 2.1, "heuristic did not fire: {completed_at}");
    }

    #[test]
    fn opacity_fades_to_zero() {
        let mut s = sim();
        s.trigger(Outcome::Failure);
        let start = s.modulation().unwrap().opacity;
        assert!(start > 0.5);

        // Step to just before the hard stop; the fade is done by then.
        for _ in 0..((5.4 / DT) as usize) {
            s.step(DT);
        }
        if let Some(m) = s.modulation() {
            assert!(m.opacity < 0.1, "opacity still {}", m.opacity);
        }
    }

    #[test]
    fn modulation_blends_stay_positive() {
        let mut t = 0.0f32;
        while t < 6.0 {
            for outcome in [Outcome::Success, Outcome::Failure] {
                let m = modulation_at(outcome, t, 5.0);
                assert!(m.opacity >= 0.0);
                assert!(m.size_scale > 0.7 && m.size_scale < 1.1);
                assert!(m.tint.iter().all(|c| *c >= 0.0));
            }
            t += 0.05;
        }
    }

    #[test]
    fn frame_applies_global_modulation() {
        use crate::particle::BufferSink;

        let mut s = sim();
        let mut sink = BufferSink::default();

        // Idle: no submission.
        s.frame(&mut sink);
        assert_eq!(sink.frames_submitted, 0);

        s.trigger(Outcome::Success);
        s.step(DT);
        s.frame(&mut sink);
        assert_eq!(sink.frames_submitted, 1);
        assert_eq!(sink.last_frame.len(), 120);
        for rp in &sink.last_frame {
            assert!(rp.size > 0.0);
            assert!(rp.color.iter().all(|c| *c >= 0.0));
        }
    }

    #[test]
    fn cancel_disposes_without_completion() {
        let mut s = sim();
        s.trigger(Outcome::Success);
        s.cancel();
        assert!(!s.is_active());
        for _ in 0..600 {
            assert!(!s.step(DT));
        }
    }

    #[test]
    fn success_spreads_wider_than_failure() {
        let mean_spread = |outcome| {
            let mut s = sim();
            s.trigger(outcome);
            for _ in 0..60 {
                s.step(DT);
            }
            s.particles()
                .iter()
                .map(|p| p.position.length())
                .sum::<f32>()
                / 120.0
        };
        // Success is an outward explosion in layered speeds; failure is a
        // slower, more uniform implosion-swirl.
        assert!(mean_spread(Outcome::Success) > mean_spread(Outcome::Failure) * 1.2);
    }
}
