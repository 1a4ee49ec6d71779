// Deadline-based debounce.
//
// The debouncer owns no thread and no timer task. Callers pass the current
// instant in, and whoever drives the event loop sleeps until `deadline()`
// and then calls `poll()`. This keeps it deterministic under a fake clock.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Holds at most one pending value and releases it after a quiet period.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Schedule `value` for release one quiet period after `now`.
    /// Any value still pending is discarded.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.quiet,
        });
    }

    /// Drop the pending value, returning it.
    pub fn cancel_pending(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Release the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.cancel_pending(),
            _ => None,
        }
    }

    /// Release the pending value now, ignoring the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.cancel_pending()
    }
}
