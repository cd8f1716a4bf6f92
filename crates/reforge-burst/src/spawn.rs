//! Pure particle generation, parameterized by `(index, total, outcome, rng)`
//! so a seeded run spawns reproducible bursts.

use std::f32::consts::TAU;

use glam::Vec3;
use reforge_core::attempt::Outcome;
use reforge_core::rng::EnhanceRng;

use crate::particle::Particle;

/// Number of concentric speed layers in the success pattern.
const SUCCESS_LAYERS: u32 = 3;

/// Spawn one particle at the origin with outcome-specific kinematics.
///
/// - **Success**: outward radial burst in three concentric layers, each 30%
///   faster than the last, perturbed by a `sin(3θ)` spiral; warm gold with
///   per-particle brightness jitter.
/// - **Failure**: inward, swirling motion -- the radial direction negated and
///   blended with a `sin(2θ)` tangential term; slower and more uniform than
///   success; deep red with jitter.
pub fn spawn_particle(index: u32, total: u32, outcome: Outcome, rng: &mut EnhanceRng) -> Particle {
    let total = total.max(1);
    let angle = TAU * index as f32 / total as f32;

    let (velocity, color) = match outcome {
        Outcome::Success => {
            let layer = (index / (total / SUCCESS_LAYERS).max(1)).min(SUCCESS_LAYERS - 1);
            let speed = (0.02 + rng.next_f32() * 0.03) * (1.0 + layer as f32 * 0.3);
            let spiral = (angle * 3.0).sin() * 0.1;
            let velocity = Vec3::new(
                angle.cos() * speed + spiral,
                (rng.next_f32() - 0.5) * 0.05 + layer as f32 * 0.02,
                angle.sin() * speed + spiral,
            );
            let gold = 0.1 + rng.next_f32() * 0.2;
            let color = [1.0, 0.7 + gold, 0.1 + rng.next_f32() * 0.1];
            (velocity, color)
        }
        Outcome::Failure => {
            let speed = 0.015 + rng.next_f32() * 0.01;
            let swirl = (angle * 2.0).sin() * 0.05;
            let velocity = Vec3::new(
                -angle.cos() * speed + swirl,
                (rng.next_f32() - 0.5) * 0.02,
                -angle.sin() * speed + swirl,
            );
            let red = 0.1 + rng.next_f32() * 0.2;
            let color = [
                0.8 + red,
                0.1 + rng.next_f32() * 0.1,
                0.1 + rng.next_f32() * 0.1,
            ];
            (velocity, color)
        }
    };

    Particle {
        position: Vec3::ZERO,
        velocity,
        base_size: 0.8 + rng.next_f32() * 0.4,
        color,
        phase_offset: rng.next_f32() * TAU,
    }
}

/// Spawn a full burst buffer of `count` particles.
pub fn spawn_burst(count: u32, outcome: Outcome, rng: &mut EnhanceRng) -> Vec<Particle> {
    (0..count)
        .map(|i| spawn_particle(i, count, outcome, rng))
        .collect()
}
