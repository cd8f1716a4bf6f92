//! Attempt state types for the resolution state machine.

use crate::fixed::{Fixed64, Ticks};

/// Lifecycle of the enhancement slot. Resolution is logically instantaneous:
/// the machine goes `Idle -> Charging -> Idle`, emitting one outcome on the
/// transition back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AttemptState {
    #[default]
    Idle,
    Charging,
}

/// One in-flight enhancement try. Owned exclusively by the state machine;
/// created on acceptance and dropped once the outcome has been emitted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EnhancementAttempt {
    /// Level of the item when the attempt was accepted.
    pub level: u32,
    /// Resource cost, deducted exactly once at acceptance. Never refunded.
    pub cost: Fixed64,
    /// Ticks elapsed since acceptance.
    pub elapsed: Ticks,
    /// Configured charge duration.
    pub total: Ticks,
}

/// Result of a resolved attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Outcome {
    /// Level goes to `level + 1`.
    Success,
    /// Level resets to 0.
    Failure,
}

/// Why a start request was refused. Refusals are the documented busy policy,
/// not errors: callers get a reason so they can disable controls, and no
/// state is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Refusal {
    /// An attempt is already charging; re-entrant starts are no-ops.
    AlreadyCharging,
    /// Resource balance is below the requested cost.
    InsufficientBalance,
    /// No item/catalyst is selected (precondition maintained by the caller).
    NothingSelected,
    /// Cost must be strictly positive.
    InvalidCost,
}
