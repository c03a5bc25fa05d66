#![forbid(unsafe_code)]

//! Host-driven deferred scheduling.
//!
//! The page never sleeps or spawns threads. Every animation step is a
//! single-shot task placed in a [`TimerQueue`]; the host advances a
//! [`DeterministicClock`] and drains whatever is due. A task that wants to
//! run again schedules a fresh entry, so self-rescheduling loops never grow
//! the call stack and cannot accumulate a backlog.

use core::cmp::Ordering;
use core::time::Duration;
use std::collections::BinaryHeap;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Going backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

struct Entry<T> {
    due: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest deadline first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Queue of single-shot deferred tasks.
///
/// Tasks with equal deadlines fire in the order they were scheduled. There is
/// no cancellation: once scheduled, a task fires as soon as the clock reaches
/// its deadline.
pub struct TimerQueue<T> {
    clock: DeterministicClock,
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now", &self.clock.now())
            .field("pending", &self.heap.len())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: DeterministicClock::new(),
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Current queue time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Schedule `task` to fire `delay` after the current queue time.
    pub fn schedule_once(&mut self, task: T, delay: Duration) {
        let due = self.clock.now().saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.heap.push(Entry { due, seq, task });
    }

    /// Deadline of the earliest pending task.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap.peek().map(|entry| entry.due)
    }

    /// Pop the earliest task whose deadline is at or before `now`.
    ///
    /// The queue clock moves to `now`, the moment the task actually runs. A
    /// task rescheduled from inside the callback therefore measures its delay
    /// from the late wake, and a single wake never replays missed repeats.
    pub fn pop_due(&mut self, now: Duration) -> Option<T> {
        self.clock.set(now);
        if self.heap.peek().is_some_and(|entry| entry.due <= now) {
            self.heap.pop().map(|entry| entry.task)
        } else {
            None
        }
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
