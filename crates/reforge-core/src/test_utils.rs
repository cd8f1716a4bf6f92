//! Shared helpers for unit and integration tests.
//!
//! Available to downstream crates via the `test-utils` feature.

use crate::attempt::Outcome;
use crate::enhancer::{Enhancer, EnhancerConfig};
use crate::event::{Event, EventKind};
use crate::fixed::{Fixed64, f64_to_fixed64};
use crate::rng::RollSource;
use crate::table::RateTable;

/// Build a validated rate table from f64 pairs.
pub fn make_table(pairs: &[(u32, f64)], default_rate: f64) -> RateTable {
    let entries = pairs
        .iter()
        .map(|&(level, rate)| (level, f64_to_fixed64(rate)))
        .collect();
    RateTable::new(entries, f64_to_fixed64(default_rate)).expect("test table must be valid")
}

/// An enhancer whose every roll returns `roll`, with selection ready and the
/// default charge timing.
pub fn fixed_roll_enhancer(
    pairs: &[(u32, f64)],
    default_rate: f64,
    roll: f64,
    balance: f64,
) -> Enhancer {
    let mut e = Enhancer::new(
        make_table(pairs, default_rate),
        RollSource::Fixed(f64_to_fixed64(roll)),
        f64_to_fixed64(balance),
        EnhancerConfig::default(),
    );
    e.set_selection_ready(true);
    e
}

/// An enhancer with a seeded roll stream, selection ready, default timing.
pub fn seeded_enhancer(pairs: &[(u32, f64)], default_rate: f64, seed: u64, balance: f64) -> Enhancer {
    let mut e = Enhancer::new(
        make_table(pairs, default_rate),
        RollSource::seeded(seed),
        f64_to_fixed64(balance),
        EnhancerConfig::default(),
    );
    e.set_selection_ready(true);
    e
}

/// Tick until the in-flight attempt resolves (or give up after a bound).
pub fn run_to_resolution(e: &mut Enhancer) -> Option<Outcome> {
    for _ in 0..10_000 {
        if let Some(outcome) = e.tick() {
            return Some(outcome);
        }
    }
    None
}

/// Put the item at a level directly.
pub fn force_level(e: &mut Enhancer, level: u32) {
    e.set_level_for_test(level);
}

/// All buffered `AttemptResolved` events, oldest first.
pub fn resolved_events(e: &Enhancer) -> Vec<Event> {
    e.event_bus.history(EventKind::AttemptResolved)
}

/// Cost used throughout the test suites.
pub fn standard_cost() -> Fixed64 {
    f64_to_fixed64(10.0)
}
