//! Trailing-edge debounce driven by explicit instants.

use std::time::Duration;

use tokio::time::Instant;

/// Default quiet period before a query is searched.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

/// A value waiting for its quiet period to pass.
#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Coalesces rapid changes into one trailing value.
///
/// Every [`push`](Self::push) replaces the pending value and restarts the
/// quiet period; only the latest value is ever released.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet_period: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Replaces the pending value and restarts the quiet period at `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        let deadline = now.checked_add(self.quiet_period).unwrap_or(now);
        self.pending = Some(Pending { value, deadline });
    }

    /// Instant at which the pending value is released, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Takes the pending value if its quiet period has passed at `now`.
    pub fn poll_ready(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Drops the pending value. Returns `true` if one was dropped.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
