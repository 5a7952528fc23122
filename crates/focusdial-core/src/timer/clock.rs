//! Cooperative scheduling on a virtual timeline.
//!
//! The engine never sleeps. It queues callbacks with a delay and whoever
//! drives it (a UI loop, the tokio driver, a test) moves the timeline forward;
//! due callbacks come out in due-time order, ties in insertion order.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Identifies one scheduled callback so it can be canceled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), T>,
    due_by_id: HashMap<u64, Duration>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }

    /// Current position on the timeline.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn schedule_after(&mut self, delay: Duration, task: T) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now.saturating_add(delay);
        self.queue.insert((due, id), task);
        self.due_by_id.insert(id, due);
        TaskHandle(id)
    }

    /// Remove a pending callback. Returns it if it had not run yet.
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        let due = self.due_by_id.remove(&handle.0)?;
        self.queue.remove(&(due, handle.0))
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.due_by_id.contains_key(&handle.0)
    }

    /// Due time of the earliest pending callback.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Take the earliest callback due at or before `until`, moving the
    /// timeline to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskHandle, T)> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        let task = self.queue.remove(&(due, id))?;
        self.due_by_id.remove(&id);
        self.now = self.now.max(due);
        Some((TaskHandle(id), task))
    }

    /// Move the timeline forward without running anything. Never goes back.
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }
}

/// Fixed-interval repeating callback built on a [`Scheduler`].
///
/// Only one tick is ever queued; the owner re-arms it from the tick handler.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    handle: Option<TaskHandle>,
}

impl Ticker {
    pub const fn every(interval: Duration) -> Self {
        Self {
            interval,
            handle: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Queue the next tick one interval from now, replacing any pending one.
    pub fn arm<T>(&mut self, scheduler: &mut Scheduler<T>, task: T) {
        self.stop(scheduler);
        self.handle = Some(scheduler.schedule_after(self.interval, task));
    }

    pub fn stop<T>(&mut self, scheduler: &mut Scheduler<T>) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
        }
    }

    /// Record that `handle` fired. Returns false for a stale handle, which
    /// the owner should ignore.
    pub fn fired(&mut self, handle: TaskHandle) -> bool {
        if self.handle == Some(handle) {
            self.handle = None;
            true
        } else {
            false
        }
    }
}
