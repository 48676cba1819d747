//! Memory-created webhook: turn open action items into tasks.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn, Instrument};

use crate::models::memory::MemoryPayload;
use crate::models::task::TaskDescriptor;
use crate::task_api::sanitize_text;
use crate::{AppError, Result};

use super::normalize_uid;
use super::state::AppState;

/// Query string for `POST /webhook`.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    /// Platform user identifier.
    pub uid: Option<String>,
}

/// Body returned after processing a memory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookResponse {
    /// Always `"success"` once the payload was accepted.
    pub status: String,
    /// Number of tasks the API confirmed.
    pub tasks_created: usize,
    /// Descriptors of the created tasks, in action-item order.
    pub tasks: Vec<TaskDescriptor>,
}

/// `POST /webhook?uid=...`: forward each open action item as a task.
///
/// Checks run in order: user ID, stored credential, payload shape. The user
/// ID is trimmed exactly as the setup flow stores it. Items are submitted
/// one at a time; an item that fails is logged and skipped so the rest of
/// the batch still goes through.
///
/// # Errors
///
/// - `AppError::BadRequest` when `uid` is missing or the payload is malformed.
/// - `AppError::MissingCredential` when the user has not completed setup.
/// - `AppError::Db` when the credential store fails.
pub async fn handle_memory_created(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WebhookQuery>,
    body: Bytes,
) -> Result<Json<WebhookResponse>> {
    let uid = query
        .uid
        .as_deref()
        .and_then(normalize_uid)
        .ok_or_else(|| AppError::BadRequest("Missing user ID".into()))?;

    let span = tracing::info_span!("webhook", user_id = %uid);
    process_memory(&state, uid, &body).instrument(span).await
}

async fn process_memory(state: &AppState, uid: &str, body: &[u8]) -> Result<Json<WebhookResponse>> {
    let credential = state.credentials.get(uid).await?.ok_or_else(|| {
        AppError::MissingCredential(format!(
            "Task API key not configured. Please complete setup first at /setup?uid={}",
            urlencoding::encode(uid)
        ))
    })?;

    let memory: MemoryPayload = serde_json::from_slice(body)
        .map_err(|err| AppError::BadRequest(format!("invalid memory payload: {err}")))?;

    let max_length = state.config.content.max_length;
    let retries = state.config.task_api.max_retries;
    let mut tasks = Vec::new();

    for (index, item) in memory.eligible_action_items().enumerate() {
        let content = sanitize_text(&item.description, max_length);
        if content.trim().is_empty() {
            debug!(index, "skipping action item with empty description");
            continue;
        }

        match state
            .tasks
            .create_task(&credential.secret, &content, retries)
            .await
        {
            Ok(descriptor) => tasks.push(descriptor),
            Err(err) => {
                warn!(index, %err, "task creation failed; continuing with next action item");
            }
        }
    }

    info!(
        tasks_created = tasks.len(),
        action_items = memory.structured.action_items.len(),
        "memory processed"
    );

    Ok(Json(WebhookResponse {
        status: "success".into(),
        tasks_created: tasks.len(),
        tasks,
    }))
}
