//! HTTP surface: webhook, setup flow, and status endpoints.
//!
//! | Method | Path          | Handler                                |
//! |--------|---------------|----------------------------------------|
//! | POST   | `/webhook`    | [`webhook::handle_memory_created`]     |
//! | GET    | `/setup`      | [`setup::show_form`]                   |
//! | POST   | `/setup`      | [`setup::submit_form`]                 |
//! | GET    | `/setup-done` | [`health::setup_done`]                 |
//! | GET    | `/health`     | [`health::health`]                     |
//! | GET    | `/`           | [`health::root`]                       |

pub mod error;
pub mod health;
pub mod pages;
pub mod setup;
pub mod state;
pub mod webhook;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{AppError, Result};

pub use state::AppState;
pub use webhook::WebhookResponse;

/// Trimmed platform user identifier, or `None` when blank.
///
/// Setup and webhook both key the credential store through this.
pub(crate) fn normalize_uid(raw: &str) -> Option<&str> {
    Some(raw.trim()).filter(|uid| !uid.is_empty())
}

/// Build the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/setup-done", get(health::setup_done))
        .route("/setup", get(setup::show_form).post(setup::submit_form))
        .route("/webhook", post(webhook::handle_memory_created))
        .with_state(state)
}

/// Bind `config.http_host:config.http_port` and serve until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Config` if the address cannot be bound or the server
/// fails while running.
pub async fn serve_http(state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let bind = state.config.bind_addr();
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Config(format!("failed to bind HTTP on {bind}: {err}")))?;
    serve_on(listener, state, ct).await
}

/// Serve on an already-bound listener until `ct` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns `AppError::Io` if the server fails while running.
pub async fn serve_on(
    listener: TcpListener,
    state: Arc<AppState>,
    ct: CancellationToken,
) -> Result<()> {
    let local = listener.local_addr()?;
    info!(%local, "starting HTTP webhook server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(ct.cancelled_owned())
        .await
        .map_err(|err| AppError::Io(format!("HTTP server error: {err}")))?;

    info!("HTTP webhook server shut down");
    Ok(())
}
