//! Setup flow: collect a user's task API token and validate it before storing.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use tracing::{info, warn};

use super::normalize_uid;
use super::pages;
use super::state::AppState;

/// Query string for `GET /setup`.
#[derive(Debug, Default, Deserialize)]
pub struct SetupQuery {
    /// Platform user identifier to pre-fill.
    pub uid: Option<String>,
}

/// Form body for `POST /setup`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SetupForm {
    /// Platform user identifier.
    pub uid: String,
    /// Candidate task API token.
    pub api_key: String,
}

/// `GET /setup`: render the empty form.
pub async fn show_form(Query(query): Query<SetupQuery>) -> Html<String> {
    Html(pages::setup_form(query.uid.as_deref().and_then(normalize_uid), None))
}

/// `POST /setup`: validate the token with a test task, then store it.
///
/// The test task gets a single attempt. Any failure, including a storage
/// failure, re-renders the form with the error rather than returning an
/// error status.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SetupForm>,
) -> Html<String> {
    let Some(uid) = normalize_uid(&form.uid) else {
        return Html(pages::setup_form(None, Some("Missing user ID")));
    };
    let api_key = form.api_key.trim();

    if api_key.is_empty() {
        return Html(pages::setup_form(Some(uid), Some("API token is required")));
    }

    if let Err(err) = state
        .tasks
        .create_task(api_key, &state.config.setup.test_task_content, 1)
        .await
    {
        warn!(user_id = uid, %err, "setup token validation failed");
        return Html(pages::setup_form(Some(uid), Some(&err.detail())));
    }

    if let Err(err) = state.credentials.put(uid, api_key).await {
        warn!(user_id = uid, %err, "failed to store credential");
        let message = format!("Failed to store API key: {}", err.detail());
        return Html(pages::setup_form(Some(uid), Some(&message)));
    }

    info!(user_id = uid, "task API credential stored");
    Html(pages::setup_success())
}
