use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use tracing::trace;

use crate::error::EventError;
use crate::types::EventId;
use crate::SimTime;

/// Entry type stored in the scheduler: the event value plus the time when it is
/// supposed to occur.
///
/// Entries are owned by the scheduler's priority queue until they are popped,
/// at which point ownership moves to whoever dispatches them.
pub struct EventEntry<E> {
    id: EventId,
    time: SimTime,
    event: E,
}

impl<E> EventEntry<E> {
    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    /// Consumes the entry, returning the event payload.
    pub fn into_event(self) -> E {
        self.event
    }

    fn key(&self) -> (SimTime, EventId) {
        (self.time, self.id)
    }
}

impl<E: fmt::Debug> fmt::Debug for EventEntry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEntry")
            .field("id", &self.id)
            .field("time", &self.time)
            .field("event", &self.event)
            .finish()
    }
}

impl<E> PartialEq for EventEntry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<E> Eq for EventEntry<E> {}

impl<E> PartialOrd for EventEntry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for EventEntry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the ordering for min-heap behavior in BinaryHeap
        other.key().cmp(&self.key())
    }
}

/// Scheduler is used to keep the current time and information about the upcoming events.
///
/// Events are dispatched by tick count, then priority, then the order in which
/// they were scheduled. The clock only moves forward.
pub struct Scheduler<E> {
    next_event_id: u64,
    events: BinaryHeap<EventEntry<E>>,
    clock: SimTime,
    dispatched: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            next_event_id: 0,
            events: BinaryHeap::new(),
            clock: SimTime::zero(),
            dispatched: 0,
        }
    }
}

impl<E: fmt::Debug> Scheduler<E> {
    /// Schedules `event` at the absolute time `time`.
    ///
    /// Fails with [`EventError::ScheduleInPast`] if `time` is on a tick the
    /// clock has already passed.
    pub fn schedule(&mut self, time: SimTime, event: E) -> Result<EventId, EventError> {
        if time.ticks() < self.clock.ticks() {
            return Err(EventError::ScheduleInPast {
                requested: time,
                now: self.clock,
            });
        }

        self.next_event_id += 1;
        let id = EventId(self.next_event_id);
        trace!(event_id = %id, time = %time, event = ?event, "Event scheduled");
        self.events.push(EventEntry { id, time, event });
        Ok(id)
    }

    /// Schedules `event` `delay` ticks after the current clock.
    pub fn schedule_in(&mut self, delay: u64, priority: i32, event: E) -> Result<EventId, EventError> {
        let time = self.clock.after(delay, priority);
        self.schedule(time, event)
    }
}

impl<E> Scheduler<E> {
    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock
    }

    /// Returns the time of the next scheduled event, or `None` if none are left.
    #[must_use]
    pub fn peek_time(&self) -> Option<SimTime> {
        self.events.peek().map(EventEntry::time)
    }

    /// Removes and returns the next scheduled event, advancing the clock to it.
    pub fn pop(&mut self) -> Result<Option<EventEntry<E>>, EventError> {
        let Some(entry) = self.events.pop() else {
            return Ok(None);
        };
        if entry.time.ticks() < self.clock.ticks() {
            return Err(EventError::OutOfOrder {
                event: entry.time,
                now: self.clock,
            });
        }
        self.clock = entry.time;
        self.dispatched += 1;
        Ok(Some(entry))
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events popped so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Number of events ever scheduled.
    pub fn scheduled(&self) -> u64 {
        self.next_event_id
    }
}
