//! Cancellable one-shot timers for the ordergate event loop.
//!
//! The page is single-threaded and never blocks. The only suspended work
//! it ever has is "do X after N milliseconds" (hide the toast, finish the
//! toast's exit animation). [`TimerQueue`] holds those deferred tasks,
//! each identified by a [`TimerHandle`] that can be cancelled before it
//! fires.
//!
//! # Integration
//!
//! The queue is designed to sit inside the page's `tokio::select!` loop
//! next to the event channel:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(event) = events.recv() => { /* route the event */ }
//!         expired = timers.wait_next() => { /* run expired.task */ }
//!     }
//! }
//! ```
//!
//! When the queue is empty, [`TimerQueue::wait_next`] pends forever and
//! the loop only reacts to events.
//!
//! # Ordering
//!
//! Tasks fire in deadline order. Two tasks with the same deadline fire in
//! the order they were scheduled.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::trace;

// ---------------------------------------------------------------------------
// TimerHandle
// ---------------------------------------------------------------------------

/// Identifies one scheduled task.
///
/// Handles are never reused within a queue, so a stale handle held by a
/// caller can't accidentally cancel a newer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Expired
// ---------------------------------------------------------------------------

/// A task whose deadline has passed, handed back to the caller to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expired<T> {
    /// The handle returned when the task was scheduled.
    pub handle: TimerHandle,
    /// The deadline the task was scheduled for.
    pub deadline: Instant,
    /// The caller's payload.
    pub task: T,
}

// ---------------------------------------------------------------------------
// TimerQueue
// ---------------------------------------------------------------------------

/// A queue of one-shot deferred tasks.
///
/// Not thread-safe and not meant to be: it is owned by the single task
/// that runs the page loop.
pub struct TimerQueue<T> {
    /// Pending tasks ordered by `(deadline, handle)`. The handle part
    /// breaks ties in scheduling order since handles are monotonic.
    pending: BTreeMap<(Instant, TimerHandle), T>,
    /// Reverse index so `cancel` doesn't have to scan.
    deadlines: HashMap<TimerHandle, Instant>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 1,
        }
    }

    /// Schedules `task` to expire `delay` from now.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerHandle {
        self.schedule_at(Instant::now() + delay, task)
    }

    /// Schedules `task` to expire at `deadline`.
    pub fn schedule_at(&mut self, deadline: Instant, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        self.pending.insert((deadline, handle), task);
        self.deadlines.insert(handle, deadline);

        trace!(%handle, pending = self.pending.len(), "timer scheduled");
        handle
    }

    /// Cancels a pending task.
    ///
    /// Returns `true` if the task was still pending. Cancelling a task
    /// that already fired or was already cancelled is a no-op that
    /// returns `false`.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let Some(deadline) = self.deadlines.remove(&handle) else {
            return false;
        };
        self.pending.remove(&(deadline, handle));
        trace!(%handle, "timer cancelled");
        true
    }

    /// Whether the task behind `handle` is still waiting to fire.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle)
    }

    /// The earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Removes and returns the earliest task if its deadline is at or
    /// before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<Expired<T>> {
        let (&(deadline, handle), _) = self.pending.first_key_value()?;
        if deadline > now {
            return None;
        }
        let task = self.pending.remove(&(deadline, handle))?;
        self.deadlines.remove(&handle);

        trace!(%handle, "timer fired");
        Some(Expired {
            handle,
            deadline,
            task,
        })
    }

    /// Removes and returns every task due at or before `now`, in firing
    /// order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<Expired<T>> {
        let mut due = Vec::new();
        while let Some(expired) = self.pop_due(now) {
            due.push(expired);
        }
        due
    }

    /// Waits until the earliest task is due and returns it.
    ///
    /// Pends forever while the queue is empty. Cancel-safe: if this
    /// future is dropped before it resolves, nothing is removed.
    pub async fn wait_next(&mut self) -> Expired<T> {
        loop {
            let Some(deadline) = self.next_deadline() else {
                std::future::pending::<()>().await;
                continue;
            };

            time::sleep_until(deadline).await;

            if let Some(expired) = self.pop_due(Instant::now()) {
                return expired;
            }
        }
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.pending.len())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_returns_unique_handles() {
        let mut queue = TimerQueue::new();

        let a = queue.schedule(Duration::from_millis(10), "a");
        let b = queue.schedule(Duration::from_millis(10), "b");

        assert_ne!(a, b);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_cancel_pending_returns_true_then_false() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(Duration::from_secs(1), ());

        assert!(queue.cancel(handle));
        assert!(!queue.cancel(handle), "second cancel must be a no-op");
        assert!(queue.is_empty());
        assert!(!queue.is_pending(handle));
    }

    #[test]
    fn test_pop_due_before_deadline_returns_none() {
        let mut queue = TimerQueue::new();
        let now = Instant::now();
        queue.schedule_at(now + Duration::from_millis(100), ());

        assert!(queue.pop_due(now).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_pop_due_fires_in_deadline_order() {
        let mut queue = TimerQueue::new();
        let now = Instant::now();
        queue.schedule_at(now + Duration::from_millis(30), "late");
        queue.schedule_at(now + Duration::from_millis(10), "early");
        queue.schedule_at(now + Duration::from_millis(20), "middle");

        let fired: Vec<_> = queue
            .drain_due(now + Duration::from_millis(30))
            .into_iter()
            .map(|e| e.task)
            .collect();

        assert_eq!(fired, vec!["early", "middle", "late"]);
    }

    #[test]
    fn test_pop_due_equal_deadlines_fire_in_schedule_order() {
        let mut queue = TimerQueue::new();
        let at = Instant::now() + Duration::from_millis(5);
        queue.schedule_at(at, 1);
        queue.schedule_at(at, 2);
        queue.schedule_at(at, 3);

        let fired: Vec<_> =
            queue.drain_due(at).into_iter().map(|e| e.task).collect();

        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut queue = TimerQueue::new();
        let now = Instant::now();
        let keep = queue.schedule_at(now, "keep");
        let dropped = queue.schedule_at(now, "drop");

        queue.cancel(dropped);
        let fired = queue.drain_due(now);

        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].handle, keep);
    }

    #[test]
    fn test_next_deadline_tracks_earliest() {
        let mut queue = TimerQueue::new();
        assert_eq!(queue.next_deadline(), None);

        let now = Instant::now();
        let late = now + Duration::from_millis(50);
        let early = now + Duration::from_millis(5);
        queue.schedule_at(late, ());
        let first = queue.schedule_at(early, ());
        assert_eq!(queue.next_deadline(), Some(early));

        queue.cancel(first);
        assert_eq!(queue.next_deadline(), Some(late));
    }

    #[test]
    fn test_timer_handle_display() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(Duration::ZERO, ());
        assert_eq!(handle.to_string(), "timer-1");
    }
}
