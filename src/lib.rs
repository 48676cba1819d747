#![forbid(unsafe_code)]

//! Webhook relay that turns action items from voice-memory events into
//! tasks in a third-party task manager, using per-user API tokens held in a
//! local `SQLite` keystore.

pub mod config;
pub mod errors;
pub mod models;
pub mod persistence;
pub mod server;
pub mod task_api;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
