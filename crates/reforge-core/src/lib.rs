//! Reforge Core -- the enhancement resolution engine.
//!
//! This crate provides the gameplay half of the item-enhancement widget: a
//! probability table, a charging state machine, a fixed-interval progress
//! clock, a tick-driven scheduler, a typed event bus, and deterministic
//! fixed-point arithmetic. The cosmetic half (particle bursts) lives in
//! `reforge-burst`.
//!
//! # Resolution Cycle
//!
//! One accepted attempt moves through a strict, single-threaded ordering:
//!
//! 1. **Start** -- [`enhancer::Enhancer::start`] validates preconditions,
//!    deducts the cost exactly once, and arms the [`clock::ProgressClock`].
//! 2. **Charge** -- each tick advances the clock; `progress()` feeds the
//!    progress bar, clamped so delayed ticks never overshoot.
//! 3. **Resolve** -- on the completion tick the machine draws a roll from its
//!    [`rng::RollSource`], compares it against the
//!    [`table::RateTable`], mutates the level (+1 on success, reset to 0 on
//!    failure), and emits exactly one outcome event, synchronously.
//!
//! # Key Types
//!
//! - [`enhancer::Enhancer`] -- resolution state machine; owns the attempt,
//!   the balance, and the level.
//! - [`table::RateTable`] -- level -> success percentage, with an explicit
//!   default for unmapped levels.
//! - [`clock::ProgressClock`] -- fixed-interval ticker, fires once, never
//!   overshoots.
//! - [`scheduler::Scheduler`] -- repeating callbacks with slotmap cancel
//!   tokens for deterministic teardown.
//! - [`event::EventBus`] -- per-kind ring buffers plus synchronous listeners.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point for deterministic gameplay math.
//! - [`rng::EnhanceRng`] -- SplitMix64 stream, seedable for reproducible runs.

pub mod attempt;
pub mod clock;
pub mod enhancer;
pub mod event;
pub mod fixed;
pub mod hash;
pub mod rng;
pub mod scheduler;
pub mod table;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
