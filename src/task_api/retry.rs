//! Attempt classification and backoff schedule.

use std::time::Duration;

use crate::models::task::TaskDescriptor;

/// Statuses that mean "try again later": rate limited, bad gateway, unavailable.
pub const RETRYABLE_STATUSES: [u16; 3] = [429, 502, 503];

/// Result of a single HTTP attempt against the task API.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Task created; carries the descriptor returned by the API.
    Success(TaskDescriptor),
    /// Transient remote failure that may succeed on a later attempt.
    Retryable {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// Remote failure that no retry can fix.
    Terminal {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// No HTTP response at all (connect error, timeout, truncated body).
    Transport(String),
}

/// Map an HTTP status and its full body onto an [`AttemptOutcome`].
///
/// A 200 whose body is not JSON is terminal: resending would create a
/// duplicate task on the remote side.
#[must_use]
pub fn classify_response(status: u16, body: String) -> AttemptOutcome {
    if status == 200 {
        return match serde_json::from_str::<TaskDescriptor>(&body) {
            Ok(descriptor) => AttemptOutcome::Success(descriptor),
            Err(_) => AttemptOutcome::Terminal { status, body },
        };
    }

    if RETRYABLE_STATUSES.contains(&status) {
        AttemptOutcome::Retryable { status, body }
    } else {
        AttemptOutcome::Terminal { status, body }
    }
}

/// Fixed attempt ceiling with `unit * 2^attempt` delays and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    unit: Duration,
}

impl RetryPolicy {
    /// Build a policy; `max_attempts` below 1 is clamped to 1.
    #[must_use]
    pub fn new(max_attempts: u32, unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            unit,
        }
    }

    /// Total attempts allowed, including the first.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether `attempt` (0-indexed) is the final one.
    #[must_use]
    pub fn is_last(&self, attempt: u32) -> bool {
        attempt + 1 >= self.max_attempts
    }

    /// Sleep taken after failed `attempt` (0-indexed) before the next one.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.unit.saturating_mul(factor)
    }

    /// Every delay slept by a call that exhausts all attempts.
    #[cfg(test)]
    fn schedule(&self) -> Vec<Duration> {
        (0..self.max_attempts - 1).map(|a| self.delay_for(a)).collect()
    }
}
