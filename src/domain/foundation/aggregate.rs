//! Aggregate base - identity plus a buffer of uncommitted domain events.
//!
//! Aggregates embed a [`PendingEvents`] buffer and raise events from
//! their own mutation methods. The Unit of Work harvests the buffer with
//! [`AggregateRoot::drain_events`] exactly once per transaction.

/// Ordered buffer of events raised but not yet committed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEvents<E> {
    events: Vec<E>,
}

impl<E> PendingEvents<E> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event to the buffer.
    pub fn raise(&mut self, event: E) {
        self.events.push(event);
    }

    /// Returns the buffered events and leaves the buffer empty.
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }

    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<E> Default for PendingEvents<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Contract shared by every aggregate root.
pub trait AggregateRoot {
    /// Identity type; assigned at creation and immutable afterwards.
    type Id;

    /// Event type raised by this aggregate.
    type Event;

    fn id(&self) -> &Self::Id;

    /// Events raised since the last drain, oldest first.
    fn pending_events(&self) -> &[Self::Event];

    /// Returns the pending events and clears the buffer.
    fn drain_events(&mut self) -> Vec<Self::Event>;
}
