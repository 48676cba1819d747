//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::GlobalConfig;
use crate::persistence::CredentialStore;
use crate::task_api::TaskClient;
use crate::Result;

/// Dependencies shared by all request handlers.
pub struct AppState {
    /// Global configuration.
    pub config: Arc<GlobalConfig>,
    /// Per-user task API credentials.
    pub credentials: Arc<dyn CredentialStore>,
    /// Outbound task-creation client.
    pub tasks: TaskClient,
}

impl AppState {
    /// Assemble state, building the task client from `config.task_api`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(config: Arc<GlobalConfig>, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let tasks = TaskClient::new(&config.task_api)?;
        Ok(Self {
            config,
            credentials,
            tasks,
        })
    }
}
