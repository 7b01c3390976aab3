use crate::core::Event;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Time-ordered multiset of pending events.
///
/// Stale events are never removed eagerly: callers check [`Event::is_valid`]
/// after [`EventSchedule::extract_min`] and drop what no longer applies.
#[derive(Debug, Default)]
pub struct EventSchedule {
    pq: BinaryHeap<Reverse<Event>>,
}

impl EventSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event. O(log n); no validity check.
    #[inline]
    pub fn insert(&mut self, event: Event) {
        self.pq.push(Reverse(event));
    }

    /// Remove and return the earliest event, or `None` once exhausted.
    #[inline]
    pub fn extract_min(&mut self) -> Option<Event> {
        self.pq.pop().map(|Reverse(e)| e)
    }

    /// Time of the earliest pending event, if any.
    pub fn peek_time(&self) -> Option<f64> {
        self.pq.peek().map(|Reverse(e)| e.time_f64())
    }

    pub fn len(&self) -> usize {
        self.pq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pq.is_empty()
    }

    pub fn clear(&mut self) {
        self.pq.clear();
    }
}
