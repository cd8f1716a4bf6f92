//! Explicit tick-driven scheduler with deterministic cancellation.
//!
//! Replaces ambient interval timers: callers register a repeating callback
//! with [`Scheduler::every`] and get back a [`TaskKey`] cancel token.
//! Teardown calls [`Scheduler::cancel`] (or [`Scheduler::clear`])
//! deterministically; no dangling ticks can fire afterwards. Single-threaded
//! and cooperative -- callbacks run inside [`Scheduler::advance`], never on
//! another thread.

use crate::fixed::Ticks;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Cancel token for a scheduled task.
    pub struct TaskKey;
}

/// A repeating callback, invoked with the scheduler's current time.
pub type TaskFn = Box<dyn FnMut(Ticks)>;

struct Task {
    interval: Ticks,
    next_due: Ticks,
    /// Registration order; ties between tasks due at the same time are broken
    /// by who registered first.
    order: u64,
    callback: TaskFn,
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("interval", &self.interval)
            .field("next_due", &self.next_due)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Tick-driven task scheduler.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: SlotMap<TaskKey, Task>,
    now: Ticks,
    next_order: u64,
}

impl Scheduler {
    /// Create an empty scheduler at time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback to run every `interval` ticks (first run one
    /// interval from now). Zero intervals are clamped to 1. Returns the
    /// cancel token.
    pub fn every(&mut self, interval: Ticks, callback: impl FnMut(Ticks) + 'static) -> TaskKey {
        let interval = interval.max(1);
        let order = self.next_order;
        self.next_order += 1;
        self.tasks.insert(Task {
            interval,
            next_due: self.now.saturating_add(interval),
            order,
            callback: Box::new(callback),
        })
    }

    /// Cancel a task. Returns whether the token was still live. After this
    /// returns, the callback will never run again.
    pub fn cancel(&mut self, key: TaskKey) -> bool {
        self.tasks.remove(key).is_some()
    }

    /// Cancel everything. Deterministic teardown for widget disposal.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Advance time by `dt`, running every due callback. Tasks due multiple
    /// times within `dt` run multiple times. Runs are ordered by due time,
    /// ties broken by registration order, so execution is deterministic.
    pub fn advance(&mut self, dt: Ticks) {
        let target = self.now.saturating_add(dt);

        loop {
            // Find the earliest due task at or before the target time.
            let next = self
                .tasks
                .iter()
                .filter(|(_, t)| t.next_due <= target)
                .min_by_key(|(_, t)| (t.next_due, t.order))
                .map(|(k, t)| (k, t.next_due));

            let Some((key, due)) = next else {
                break;
            };

            self.now = due;
            if let Some(task) = self.tasks.get_mut(key) {
                task.next_due = due.saturating_add(task.interval);
                (task.callback)(due);
            }
        }

        self.now = target;
    }

    /// Current scheduler time.
    pub fn now(&self) -> Ticks {
        self.now
    }

    /// Number of live tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
