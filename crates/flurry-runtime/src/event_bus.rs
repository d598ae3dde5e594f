//! Bounded event queue the host drains at its leisure

use std::collections::VecDeque;

use crate::event::EngineEvent;

/// Pending events kept when the host never drains
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Fixed-capacity queue the engine pushes to and the host drains.
///
/// A still-pending `IntensityChanged` is overwritten by the next one, and
/// when the queue is full the oldest event is dropped. Storage is allocated
/// once up front.
pub struct EventBus {
    events: VecDeque<EngineEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: EngineEvent) {
        if matches!(event, EngineEvent::IntensityChanged { .. }) {
            if let Some(slot) = self
                .events
                .iter_mut()
                .find(|e| matches!(e, EngineEvent::IntensityChanged { .. }))
            {
                *slot = event;
                return;
            }
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    /// Pending events, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &EngineEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events pushed out by overflow since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Drop pending events without handing them out
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
