//! Typed event system with pre-allocated ring buffers.
//!
//! Events are dispatched synchronously at the moment they are emitted: the
//! outcome of an attempt must reach listeners within the same tick call that
//! resolved it, strictly ordered before the particle burst trigger. Each
//! event kind also lands in its own ring buffer so polling consumers (UI
//! badges, analytics) can read recent history without subscribing.
//!
//! Event kinds can be suppressed via [`EventBus::suppress`]; suppressed kinds
//! are neither buffered nor delivered.

use crate::attempt::Outcome;
use crate::fixed::{Fixed64, Ticks};

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A widget-core event. All events carry the tick at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A start request was accepted and the cost deducted.
    AttemptStarted {
        level: u32,
        cost: Fixed64,
        tick: Ticks,
    },
    /// The charging attempt resolved. Emitted exactly once per accepted
    /// attempt, synchronously with the resolution, carrying the level now in
    /// effect.
    AttemptResolved {
        outcome: Outcome,
        new_level: u32,
        tick: Ticks,
    },
    /// A particle burst was (re)started for an outcome.
    BurstTriggered { outcome: Outcome, tick: Ticks },
    /// The particle burst finished; cosmetic layers should stop any
    /// outcome-tied effects (shake, glow).
    BurstCompleted { tick: Ticks },
}

/// Discriminant tag for event types, used for suppression and subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AttemptStarted,
    AttemptResolved,
    BurstTriggered,
    BurstCompleted,
}

/// Total number of event kinds.
const EVENT_KIND_COUNT: usize = 4;

impl Event {
    /// Get the discriminant kind for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::AttemptStarted { .. } => EventKind::AttemptStarted,
            Event::AttemptResolved { .. } => EventKind::AttemptResolved,
            Event::BurstTriggered { .. } => EventKind::BurstTriggered,
            Event::BurstCompleted { .. } => EventKind::BurstCompleted,
        }
    }
}

impl EventKind {
    /// Convert to usize index for array lookups.
    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBuffer — pre-allocated ring buffer
// ---------------------------------------------------------------------------

/// A pre-allocated ring buffer for events. Fixed capacity; when full, the
/// oldest events are dropped.
#[derive(Debug)]
pub struct EventBuffer {
    events: Vec<Option<Event>>,
    /// Write position (wraps around).
    head: usize,
    /// Number of events currently stored (may be less than capacity).
    len: usize,
}

impl EventBuffer {
    /// Create a new ring buffer with the given capacity.
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    /// Push an event into the ring buffer. If full, the oldest event is dropped.
    pub fn push(&mut self, event: Event) {
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
    }

    /// The total capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.events.len()
    }

    /// Number of events currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over events in order from oldest to newest.
    pub fn iter(&self) -> EventBufferIter<'_> {
        let start = if self.len < self.capacity() {
            0
        } else {
            // head points to the next write position, which is the oldest entry
            self.head
        };
        EventBufferIter {
            buffer: self,
            index: start,
            remaining: self.len,
        }
    }

    /// Clear all events from the buffer.
    pub fn clear(&mut self) {
        for slot in &mut self.events {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }
}

/// Iterator over events in an [`EventBuffer`], from oldest to newest.
pub struct EventBufferIter<'a> {
    buffer: &'a EventBuffer,
    index: usize,
    remaining: usize,
}

impl<'a> Iterator for EventBufferIter<'a> {
    type Item = &'a Event;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let event = self.buffer.events[self.index].as_ref();
        self.index = (self.index + 1) % self.buffer.capacity();
        self.remaining -= 1;
        event
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for EventBufferIter<'_> {}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// A listener receives events read-only, in registration order, synchronously
/// with emission.
pub type Listener = Box<dyn FnMut(&Event)>;

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// The central event bus. Holds one ring buffer per event kind, listener
/// lists, and suppression flags.
pub struct EventBus {
    /// One ring buffer per event kind, lazily allocated on first emit.
    buffers: [Option<EventBuffer>; EVENT_KIND_COUNT],

    /// Suppressed event kinds. Suppressed events are never buffered or
    /// delivered.
    suppressed: [bool; EVENT_KIND_COUNT],

    /// Listeners indexed by event kind.
    listeners: [Vec<Listener>; EVENT_KIND_COUNT],

    /// Default buffer capacity for new event buffers.
    default_capacity: usize,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("buffers", &self.buffers)
            .field("suppressed", &self.suppressed)
            .field("default_capacity", &self.default_capacity)
            .finish_non_exhaustive()
    }
}

const DEFAULT_BUFFER_CAPACITY: usize = 64;

impl EventBus {
    /// Create a new event bus with the given default buffer capacity per kind.
    pub fn new(default_capacity: usize) -> Self {
        Self {
            buffers: Default::default(),
            suppressed: [false; EVENT_KIND_COUNT],
            listeners: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            default_capacity,
        }
    }

    /// Suppress an event kind. Suppressed events are never allocated or buffered.
    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
        // Drop the buffer if it exists -- zero allocation for suppressed kinds.
        self.buffers[kind.index()] = None;
    }

    /// Check if an event kind is suppressed.
    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Emit an event: buffer it and dispatch synchronously to listeners for
    /// its kind, in registration order. No-ops if the kind is suppressed.
    pub fn emit(&mut self, event: Event) {
        let idx = event.kind().index();

        if self.suppressed[idx] {
            return;
        }

        // Lazily allocate buffer on first emit.
        let buffer = self.buffers[idx]
            .get_or_insert_with(|| EventBuffer::new(self.default_capacity));
        buffer.push(event.clone());

        for listener in &mut self.listeners[idx] {
            listener(&event);
        }
    }

    /// Register a listener for an event kind.
    pub fn on(&mut self, kind: EventKind, listener: Listener) {
        self.listeners[kind.index()].push(listener);
    }

    /// Read the buffered history for a kind, oldest first. Empty if nothing
    /// has been emitted (or the kind is suppressed).
    pub fn history(&self, kind: EventKind) -> Vec<Event> {
        match &self.buffers[kind.index()] {
            Some(buffer) => buffer.iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Number of buffered events for a kind.
    pub fn buffered_count(&self, kind: EventKind) -> usize {
        self.buffers[kind.index()]
            .as_ref()
            .map_or(0, EventBuffer::len)
    }

    /// Clear all buffered history (listeners stay registered).
    pub fn clear_history(&mut self) {
        for buffer in self.buffers.iter_mut().flatten() {
            buffer.clear();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn resolved(new_level: u32, tick: Ticks) -> Event {
        Event::AttemptResolved {
            outcome: Outcome::Success,
            new_level,
            tick,
        }
    }

    #[test]
    fn emit_buffers_and_dispatches() {
        let mut bus = EventBus::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.on(
            EventKind::AttemptResolved,
            Box::new(move |e| sink.borrow_mut().push(e.clone())),
        );

        bus.emit(resolved(1, 10));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(bus.buffered_count(EventKind::AttemptResolved), 1);
    }

    #[test]
    fn listeners_only_see_their_kind() {
        let mut bus = EventBus::default();
        let count = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&count);
        bus.on(
            EventKind::BurstCompleted,
            Box::new(move |_| *sink.borrow_mut() += 1),
        );

        bus.emit(resolved(1, 0));
        assert_eq!(*count.borrow(), 0);
        bus.emit(Event::BurstCompleted { tick: 5 });
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn suppressed_kind_is_silent() {
        let mut bus = EventBus::default();
        let count = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&count);
        bus.on(
            EventKind::AttemptResolved,
            Box::new(move |_| *sink.borrow_mut() += 1),
        );

        bus.suppress(EventKind::AttemptResolved);
        bus.emit(resolved(1, 0));
        assert_eq!(*count.borrow(), 0);
        assert_eq!(bus.buffered_count(EventKind::AttemptResolved), 0);
    }

    #[test]
    fn ring_buffer_drops_oldest_on_overflow() {
        let mut bus = EventBus::new(3);
        for i in 0..5 {
            bus.emit(resolved(i, i as Ticks));
        }
        let history = bus.history(EventKind::AttemptResolved);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0], resolved(2, 2));
        assert_eq!(history[2], resolved(4, 4));
    }

    #[test]
    fn buffer_iter_order_oldest_first() {
        let mut buffer = EventBuffer::new(4);
        for i in 0..3 {
            buffer.push(resolved(i, i as Ticks));
        }
        let ticks: Vec<u32> = buffer
            .iter()
            .map(|e| match e {
                Event::AttemptResolved { new_level, .. } => *new_level,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(ticks, vec![0, 1, 2]);
    }

    #[test]
    fn overflow_keeps_len_at_capacity() {
        let mut buffer = EventBuffer::new(2);
        for i in 0..5 {
            buffer.push(resolved(i, 0));
        }
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn clear_history_keeps_listeners() {
        let mut bus = EventBus::default();
        let count = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&count);
        bus.on(
            EventKind::AttemptResolved,
            Box::new(move |_| *sink.borrow_mut() += 1),
        );

        bus.emit(resolved(1, 0));
        bus.clear_history();
        assert_eq!(bus.buffered_count(EventKind::AttemptResolved), 0);
        bus.emit(resolved(2, 1));
        assert_eq!(*count.borrow(), 2);
    }
}
