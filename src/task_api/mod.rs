//! Outbound task-creation client for the remote task API.
//!
//! [`TaskClient`] submits one piece of text per call, retrying rate-limit
//! and gateway failures with exponential backoff according to
//! [`RetryPolicy`]. Each attempt is classified into an [`AttemptOutcome`].

pub mod client;
pub mod retry;
pub mod sanitize;

pub use client::{TaskClient, IDEMPOTENCY_HEADER};
pub use retry::{classify_response, AttemptOutcome, RetryPolicy, RETRYABLE_STATUSES};
pub use sanitize::sanitize_text;
