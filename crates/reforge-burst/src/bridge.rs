//! Session bridge: wires the resolution engine to the burst simulator.
//!
//! [`EnhanceSession`] owns both halves of the widget and enforces the
//! per-cycle ordering: clock completion, then resolution, then the burst
//! trigger for that outcome -- all inside one `tick()` call, with no
//! interleaving. Burst lifecycle events are forwarded onto the core event
//! bus so cosmetic collaborators (shake, glow) subscribe in one place.

use reforge_core::attempt::Outcome;
use reforge_core::enhancer::Enhancer;
use reforge_core::event::Event;
use reforge_core::fixed::{Fixed64, Ticks};

use crate::BurstSimulator;
use crate::particle::RenderSink;

/// Core ticks are milliseconds; burst time is in seconds.
const TICKS_PER_SECOND: f32 = 1000.0;

/// The complete enhancement widget core: state machine plus burst simulator,
/// driven by a single cooperative tick.
#[derive(Debug)]
pub struct EnhanceSession {
    pub enhancer: Enhancer,
    pub burst: BurstSimulator,
}

impl EnhanceSession {
    pub fn new(enhancer: Enhancer, burst: BurstSimulator) -> Self {
        Self { enhancer, burst }
    }

    /// Forward a start request to the state machine.
    pub fn start(&mut self, cost: Fixed64) -> bool {
        self.enhancer.start(cost)
    }

    /// Advance the whole widget by `dt` ticks.
    ///
    /// Ordering within the call: the enhancer's clock (and any resolution it
    /// reaches) runs first; a freshly resolved outcome triggers the burst
    /// before the burst integrates; burst completion is reported last.
    pub fn tick(&mut self, dt: Ticks) {
        if let Some(outcome) = self.enhancer.advance(dt) {
            self.trigger_burst(outcome);
        }

        let dt_seconds = dt as f32 / TICKS_PER_SECOND;
        if self.burst.step(dt_seconds) {
            let tick = self.enhancer.now();
            self.enhancer.event_bus.emit(Event::BurstCompleted { tick });
        }
    }

    fn trigger_burst(&mut self, outcome: Outcome) {
        self.burst.trigger(outcome);
        let tick = self.enhancer.now();
        self.enhancer
            .event_bus
            .emit(Event::BurstTriggered { outcome, tick });
    }

    /// Submit the current particle frame to a render target.
    pub fn frame(&self, sink: &mut dyn RenderSink) {
        self.burst.frame(sink);
    }

    /// Charge progress in [0, 1] for the progress bar.
    pub fn progress(&self) -> Fixed64 {
        self.enhancer.progress()
    }

    /// Deterministic teardown: stop the clock, drop the attempt, dispose the
    /// particle buffer. No events fire after this returns.
    pub fn shutdown(&mut self) {
        self.enhancer.cancel();
        self.burst.cancel();
    }
}
