//! Global configuration parsing and validation.

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

/// Remote task API endpoint and retry behaviour.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default)]
pub struct TaskApiConfig {
    /// Task-creation endpoint URL.
    pub base_url: String,
    /// Attempt ceiling per logical task creation.
    pub max_retries: u32,
    /// Length of one backoff time unit in milliseconds.
    pub backoff_unit_ms: u64,
    /// Per-attempt HTTP timeout.
    pub request_timeout_seconds: u64,
    /// Optional natural-language due date forwarded with every task.
    ///
    /// Unset by default, so tasks arrive without a due date. Set it to
    /// `"today"` to have every action item scheduled for the day it was
    /// captured.
    pub due_string: Option<String>,
}

impl Default for TaskApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.todoist.com/rest/v2/tasks".into(),
            max_retries: 3,
            backoff_unit_ms: 1000,
            request_timeout_seconds: 30,
            due_string: None,
        }
    }
}

impl TaskApiConfig {
    /// One backoff time unit as a [`Duration`].
    #[must_use]
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }

    /// Per-attempt request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Action-item content shaping.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default)]
pub struct ContentConfig {
    /// Maximum task content length in characters after escaping.
    pub max_length: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self { max_length: 500 }
    }
}

/// Setup-flow settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default)]
pub struct SetupConfig {
    /// Content of the test task created to validate a candidate key.
    pub test_task_content: String,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            test_task_content: "Test task - please ignore".into(),
        }
    }
}

fn default_http_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_http_port() -> u16 {
    8000
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data").join("credentials.db")
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_http_host")]
    pub http_host: IpAddr,
    /// HTTP port for the webhook server.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// `SQLite` file holding the credential store.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Remote task API settings.
    #[serde(default)]
    pub task_api: TaskApiConfig,
    /// Content sanitization settings.
    #[serde(default)]
    pub content: ContentConfig,
    /// Setup-flow settings.
    #[serde(default)]
    pub setup: SetupConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            http_host: default_http_host(),
            http_port: default_http_port(),
            db_path: default_db_path(),
            task_api: TaskApiConfig::default(),
            content: ContentConfig::default(),
            setup: SetupConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Socket address the HTTP server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http_host, self.http_port)
    }

    /// Check value ranges that the TOML types cannot express.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.task_api.max_retries == 0 {
            return Err(AppError::Config(
                "task_api.max_retries must be at least 1".into(),
            ));
        }

        if self.task_api.base_url.trim().is_empty() {
            return Err(AppError::Config("task_api.base_url must not be empty".into()));
        }

        if self.task_api.request_timeout_seconds == 0 {
            return Err(AppError::Config(
                "task_api.request_timeout_seconds must be greater than zero".into(),
            ));
        }

        if self.content.max_length == 0 {
            return Err(AppError::Config(
                "content.max_length must be greater than zero".into(),
            ));
        }

        if self.setup.test_task_content.trim().is_empty() {
            return Err(AppError::Config(
                "setup.test_task_content must not be empty".into(),
            ));
        }

        Ok(())
    }
}
