//! Cancellable one-shot and periodic timers on a virtual millisecond clock
//!
//! A match never sleeps. The owner advances the clock and pulls due timers
//! one at a time, handling each before asking for the next, so a handler can
//! cancel or arm timers that would otherwise fire later in the same advance.

use std::collections::{BTreeMap, HashMap};

/// Owned handle to a scheduled timer
///
/// Deliberately not `Clone`: whoever holds the handle is the only one who
/// can cancel the timer.
#[derive(Debug, PartialEq, Eq)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Timer<E> {
    period_ms: Option<u64>,
    event: E,
}

/// Timer queue ordered by (due time, creation order)
#[derive(Debug)]
pub struct Scheduler<E> {
    now_ms: u64,
    next_id: u64,
    queue: BTreeMap<(u64, u64), Timer<E>>,
    due_by_id: HashMap<u64, u64>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            queue: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of armed timers
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Fire `event` once, `delay_ms` from now
    pub fn schedule_once(&mut self, delay_ms: u64, event: E) -> TimerHandle {
        self.insert(self.now_ms + delay_ms, None, event)
    }

    /// Fire `event` every `period_ms`, first time one period from now
    pub fn schedule_every(&mut self, period_ms: u64, event: E) -> TimerHandle {
        let period_ms = period_ms.max(1);
        self.insert(self.now_ms + period_ms, Some(period_ms), event)
    }

    /// Disarm a timer. Returns false if it already fired (one-shot) or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.due_by_id.remove(&handle.0) {
            Some(due) => self.queue.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }

    pub fn is_active(&self, handle: &TimerHandle) -> bool {
        self.due_by_id.contains_key(&handle.0)
    }

    /// Pop the earliest timer due at or before `until_ms`
    ///
    /// The clock moves to the timer's due time. Periodic timers are re-armed
    /// before the event is returned, so the handler may cancel them.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<E> {
        let (&(due, id), _) = self.queue.first_key_value()?;
        if due > until_ms {
            return None;
        }

        let timer = self.queue.remove(&(due, id))?;
        self.now_ms = self.now_ms.max(due);

        match timer.period_ms {
            Some(period) => {
                let next_due = due + period;
                self.due_by_id.insert(id, next_due);
                let event = timer.event.clone();
                self.queue.insert((next_due, id), timer);
                Some(event)
            }
            None => {
                self.due_by_id.remove(&id);
                Some(timer.event)
            }
        }
    }

    /// Move the clock forward once all due timers have been handled
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    fn insert(&mut self, due: u64, period_ms: Option<u64>, event: E) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.insert((due, id), Timer { period_ms, event });
        self.due_by_id.insert(id, due);
        TimerHandle(id)
    }
}
