//! HTTP client that creates tasks through the remote task API.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::config::TaskApiConfig;
use crate::models::task::{TaskDescriptor, TaskRequest};
use crate::{AppError, Result};

use super::retry::{classify_response, AttemptOutcome, RetryPolicy};

/// Header carrying the per-task idempotency token.
pub const IDEMPOTENCY_HEADER: &str = "X-Request-Id";

/// Client for the task-creation endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    endpoint: String,
    backoff_unit: Duration,
    due_string: Option<String>,
}

impl TaskClient {
    /// Build a client from the `[task_api]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &TaskApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| AppError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            endpoint: config.base_url.clone(),
            backoff_unit: config.backoff_unit(),
            due_string: config.due_string.clone(),
        })
    }

    /// Create one inbox task holding `content`, making at most `retries` attempts.
    ///
    /// A single idempotency token is generated for the call and reused by
    /// every retry, so the API can collapse duplicates of the same task.
    /// Statuses 429/502/503 and transport failures are retried after
    /// `unit * 2^attempt`; everything else fails immediately.
    ///
    /// # Errors
    ///
    /// - `AppError::InvalidInput` if `credential` or `content` is empty.
    /// - `AppError::Remote` with the final status and body when the API
    ///   rejects the task or keeps failing until the ceiling.
    /// - `AppError::Transport` when the last attempt gets no response.
    pub async fn create_task(
        &self,
        credential: &str,
        content: &str,
        retries: u32,
    ) -> Result<TaskDescriptor> {
        if credential.trim().is_empty() {
            return Err(AppError::InvalidInput("credential must not be empty".into()));
        }
        if content.trim().is_empty() {
            return Err(AppError::InvalidInput("task content must not be empty".into()));
        }

        let policy = RetryPolicy::new(retries, self.backoff_unit);
        let request = TaskRequest::new(content, self.due_string.clone());
        let token = Uuid::new_v4().to_string();

        let span = tracing::info_span!(
            "create_task",
            request_id = %token,
            max_attempts = policy.max_attempts()
        );
        self.run_attempts(credential, &request, &token, policy)
            .instrument(span)
            .await
    }

    async fn run_attempts(
        &self,
        credential: &str,
        request: &TaskRequest,
        token: &str,
        policy: RetryPolicy,
    ) -> Result<TaskDescriptor> {
        let mut attempt = 0;
        loop {
            let last = policy.is_last(attempt);

            match self.attempt(credential, request, token).await {
                AttemptOutcome::Success(descriptor) => {
                    info!(attempt, "task created");
                    return Ok(descriptor);
                }
                AttemptOutcome::Terminal { status, body } => {
                    warn!(attempt, status, "task API rejected task");
                    return Err(AppError::Remote { status, body });
                }
                AttemptOutcome::Retryable { status, body } if last => {
                    warn!(attempt, status, "task API still failing after final attempt");
                    return Err(AppError::Remote { status, body });
                }
                AttemptOutcome::Transport(message) if last => {
                    warn!(attempt, error = %message, "task API unreachable after final attempt");
                    return Err(AppError::Transport(message));
                }
                AttemptOutcome::Retryable { status, .. } => {
                    warn!(attempt, status, "retryable task API status");
                }
                AttemptOutcome::Transport(message) => {
                    warn!(attempt, error = %message, "task API transport failure");
                }
            }

            let delay = policy.delay_for(attempt);
            debug!(attempt, delay = ?delay, "backing off before retry");
            sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, credential: &str, request: &TaskRequest, token: &str) -> AttemptOutcome {
        let response = match self
            .http
            .post(&self.endpoint)
            .bearer_auth(credential)
            .header(IDEMPOTENCY_HEADER, token)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return AttemptOutcome::Transport(err.to_string()),
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => {
                debug!(status, body_len = body.len(), "task API response");
                classify_response(status, body)
            }
            Err(err) => AttemptOutcome::Transport(format!("failed to read response body: {err}")),
        }
    }
}
