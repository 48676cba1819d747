//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Persistence failure when interacting with `SQLite`.
    Db(String),
    /// File-system or I/O operation failure.
    Io(String),
    /// Inbound request is malformed or missing a required parameter.
    BadRequest(String),
    /// No task API credential is stored for the user.
    MissingCredential(String),
    /// Caller supplied an argument the task client refuses to send.
    InvalidInput(String),
    /// Task API answered with a non-success status.
    Remote {
        /// HTTP status code returned by the task API.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },
    /// Task API could not be reached (connect failure, timeout, broken stream).
    Transport(String),
}

impl AppError {
    /// Message without the `kind:` prefix, suitable for end-user display.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Config(msg)
            | Self::Db(msg)
            | Self::Io(msg)
            | Self::BadRequest(msg)
            | Self::MissingCredential(msg)
            | Self::InvalidInput(msg)
            | Self::Transport(msg) => msg.clone(),
            Self::Remote { status, body } => format!("task API error ({status}): {body}"),
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Db(msg) => write!(f, "db: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
            Self::BadRequest(msg) => write!(f, "bad request: {msg}"),
            Self::MissingCredential(msg) => write!(f, "missing credential: {msg}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Remote { status, body } => write!(f, "remote: status {status}: {body}"),
            Self::Transport(msg) => write!(f, "transport: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
