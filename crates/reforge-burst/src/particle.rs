//! Particle state and the render-target abstraction.

use glam::Vec3;

/// One particle in a burst.
///
/// Immutable after spawn except `position`, which is integrated each tick.
/// Velocity is fixed at spawn; the simulator scales its *effect* by a
/// time-decaying factor rather than mutating it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Current position relative to the burst anchor.
    pub position: Vec3,
    /// Initial kinematics, fixed at spawn.
    pub velocity: Vec3,
    /// Per-particle size multiplier in [0.8, 1.2].
    pub base_size: f32,
    /// Base RGB colour with per-particle jitter baked in.
    pub color: [f32; 3],
    /// Random phase for twinkle/jitter so particles desynchronize.
    pub phase_offset: f32,
}

/// What the renderer receives for one particle on one frame.
///
/// `color` is premultiplied by the burst's global opacity; with the additive
/// blending these bursts are drawn with, that is equivalent to a separate
/// alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParticle {
    pub position: Vec3,
    pub color: [f32; 3],
    pub size: f32,
}

/// Render-target abstraction: accepts the full particle buffer once per tick.
pub trait RenderSink {
    fn submit(&mut self, particles: &[RenderParticle]);
}

/// Discards everything. For headless simulation and tests that only care
/// about completion timing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn submit(&mut self, _particles: &[RenderParticle]) {}
}

/// Keeps the most recent frame. Handy for polling renderers and assertions.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    pub last_frame: Vec<RenderParticle>,
    pub frames_submitted: u64,
}

impl RenderSink for BufferSink {
    fn submit(&mut self, particles: &[RenderParticle]) {
        self.last_frame.clear();
        self.last_frame.extend_from_slice(particles);
        self.frames_submitted += 1;
    }
}
