//! The resolution state machine: owns the in-flight attempt, the resource
//! balance, and the current item level.
//!
//! # Lifecycle
//!
//! `start()` validates preconditions and, on acceptance, deducts the cost
//! exactly once and arms the progress clock. Each `tick()`/`advance()` drives
//! the clock; on the tick that reaches the charge duration the machine draws
//! a roll, compares it against the rate table, applies the outcome to the
//! level, transitions back to Idle, and emits exactly one
//! [`Event::AttemptResolved`] -- all synchronously, in that order.
//!
//! Refusals (busy, insufficient balance, nothing selected) are silent no-ops
//! reported as `false`/[`Refusal`]; they never mutate state. Failure never
//! refunds the cost.

use crate::attempt::{AttemptState, EnhancementAttempt, Outcome, Refusal};
use crate::clock::ProgressClock;
use crate::event::{Event, EventBus};
use crate::fixed::{Fixed64, Ticks};
use crate::hash::StateHash;
use crate::rng::RollSource;
use crate::table::RateTable;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning for the state machine's charge phase.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EnhancerConfig {
    /// Total charge duration in ticks.
    pub charge_duration: Ticks,
    /// Fixed clock interval in ticks.
    pub tick_interval: Ticks,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        // The classic widget charges for 1.5s sampled every 30ms.
        Self {
            charge_duration: 1500,
            tick_interval: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Enhancer
// ---------------------------------------------------------------------------

/// The enhancement resolution state machine.
///
/// Exclusively owns the current [`EnhancementAttempt`], the resource balance,
/// and the item level; no other component may mutate them.
#[derive(Debug)]
pub struct Enhancer {
    table: RateTable,
    rolls: RollSource,
    config: EnhancerConfig,
    clock: ProgressClock,
    attempt: Option<EnhancementAttempt>,
    balance: Fixed64,
    level: u32,
    selection_ready: bool,
    /// Global tick counter stamped onto events.
    now: Ticks,
    /// Typed event bus for widget events.
    pub event_bus: EventBus,
}

impl Enhancer {
    /// Create a machine at level 0 with the given table, roll source, and
    /// starting balance.
    pub fn new(
        table: RateTable,
        rolls: RollSource,
        starting_balance: Fixed64,
        config: EnhancerConfig,
    ) -> Self {
        let clock = ProgressClock::new(config.tick_interval, config.charge_duration);
        Self {
            table,
            rolls,
            config,
            clock,
            attempt: None,
            balance: starting_balance,
            level: 0,
            selection_ready: false,
            now: 0,
            event_bus: EventBus::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Preconditions
    // -----------------------------------------------------------------------

    /// Record whether the caller has an item and catalyst selected. The
    /// machine only checks the flag; what "selected" means is the caller's
    /// concern.
    pub fn set_selection_ready(&mut self, ready: bool) {
        self.selection_ready = ready;
    }

    // -----------------------------------------------------------------------
    // Start
    // -----------------------------------------------------------------------

    /// Try to start an attempt, reporting why it was refused.
    ///
    /// On acceptance the cost is deducted from the balance exactly once
    /// (never refunded), the machine transitions to Charging, and an
    /// [`Event::AttemptStarted`] fires. Refusals mutate nothing.
    pub fn try_start(&mut self, cost: Fixed64) -> Result<(), Refusal> {
        if self.attempt.is_some() {
            return Err(Refusal::AlreadyCharging);
        }
        if !self.selection_ready {
            return Err(Refusal::NothingSelected);
        }
        if cost <= Fixed64::ZERO {
            return Err(Refusal::InvalidCost);
        }
        if self.balance < cost {
            return Err(Refusal::InsufficientBalance);
        }

        self.balance -= cost;
        self.attempt = Some(EnhancementAttempt {
            level: self.level,
            cost,
            elapsed: 0,
            total: self.config.charge_duration,
        });
        self.clock.start();
        self.event_bus.emit(Event::AttemptStarted {
            level: self.level,
            cost,
            tick: self.now,
        });
        Ok(())
    }

    /// Busy-policy wrapper around [`try_start`](Self::try_start): refusals
    /// collapse to `false` for callers that only gate a button.
    pub fn start(&mut self, cost: Fixed64) -> bool {
        self.try_start(cost).is_ok()
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance one fixed clock interval.
    pub fn tick(&mut self) -> Option<Outcome> {
        self.advance(self.config.tick_interval)
    }

    /// Advance by a measured delta. Returns the outcome if this call resolved
    /// the attempt; ordering within the call is clock completion, then roll,
    /// then level mutation, then the event.
    pub fn advance(&mut self, dt: Ticks) -> Option<Outcome> {
        self.now = self.now.saturating_add(dt);

        let Some(attempt) = self.attempt.as_mut() else {
            return None;
        };

        let tick = self.clock.advance(dt);
        attempt.elapsed = attempt.elapsed.saturating_add(dt).min(attempt.total);
        if !tick.completed {
            return None;
        }

        // The attempt slot is dropped here; the machine is Idle again before
        // the outcome event fires.
        let attempt = self.attempt.take()?;
        Some(self.resolve(attempt))
    }

    /// Draw the roll and apply the outcome. Called exactly once per accepted
    /// attempt, on the clock-completion tick.
    fn resolve(&mut self, attempt: EnhancementAttempt) -> Outcome {
        let rate = self.table.success_rate(attempt.level);
        let roll = self.rolls.roll_percent();

        let outcome = if roll < rate {
            Outcome::Success
        } else {
            Outcome::Failure
        };

        self.level = match outcome {
            Outcome::Success => attempt.level.saturating_add(1),
            Outcome::Failure => 0,
        };

        self.event_bus.emit(Event::AttemptResolved {
            outcome,
            new_level: self.level,
            tick: self.now,
        });

        outcome
    }

    /// Teardown: stop the clock and drop any in-flight attempt without
    /// resolving. No outcome fires; the cost stays spent.
    pub fn cancel(&mut self) {
        self.clock.cancel();
        self.attempt = None;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Charge progress in [0, 1] for the progress-bar widget.
    pub fn progress(&self) -> Fixed64 {
        match self.attempt {
            Some(_) => self.clock.progress(),
            None => Fixed64::ZERO,
        }
    }

    /// Current resource balance.
    pub fn balance(&self) -> Fixed64 {
        self.balance
    }

    /// Current item level.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Idle or Charging.
    pub fn state(&self) -> AttemptState {
        match self.attempt {
            Some(_) => AttemptState::Charging,
            None => AttemptState::Idle,
        }
    }

    /// The in-flight attempt, if any (read-only).
    pub fn attempt(&self) -> Option<&EnhancementAttempt> {
        self.attempt.as_ref()
    }

    /// Success rate the next attempt would roll against.
    pub fn current_rate(&self) -> Fixed64 {
        self.table.success_rate(self.level)
    }

    /// The rate table (read-only).
    pub fn table(&self) -> &RateTable {
        &self.table
    }

    /// Global tick counter.
    pub fn now(&self) -> Ticks {
        self.now
    }

    /// Put the item at an arbitrary level. Test scaffolding only; in
    /// production the level moves solely through resolution.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn set_level_for_test(&mut self, level: u32) {
        self.level = level;
    }

    /// Deterministic hash of all gameplay-affecting state, for divergence
    /// checks in tests.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        h.write_fixed64(self.balance);
        h.write_u32(self.level);
        h.write_u64(self.now);
        h.write_u64(self.rolls.hash_state());
        match &self.attempt {
            Some(a) => {
                h.write_u32(1);
                h.write_u32(a.level);
                h.write_fixed64(a.cost);
                h.write_u64(a.elapsed);
            }
            None => h.write_u32(0),
        }
        h.finish()
    }
}
