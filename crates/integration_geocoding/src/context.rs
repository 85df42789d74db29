//! Per-call deadline

use std::time::Duration;

use tokio::time::Instant;

/// Deadline carried through a single geocoding call
///
/// Caller cancellation is expressed by dropping the returned future; the
/// context only bounds how long the caller is willing to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    deadline: Instant,
    budget: Duration,
}

impl CallContext {
    /// Context that expires `timeout` from now
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            budget: timeout,
        }
    }

    /// Context that expires at a fixed instant
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline,
            budget: deadline.saturating_duration_since(Instant::now()),
        }
    }

    /// The instant after which the caller stops waiting
    #[must_use]
    pub const fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until the deadline
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Returns true once the deadline has passed
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Total budget the context was created with, in milliseconds
    #[must_use]
    pub fn budget_ms(&self) -> u64 {
        u64::try_from(self.budget.as_millis()).unwrap_or(u64::MAX)
    }
}
