//! Outbound task-creation request and its result.

use serde::{Deserialize, Serialize};

/// Lowest urgency level understood by the task API.
pub const LOWEST_PRIORITY: u8 = 1;

/// JSON body sent to the task-creation endpoint.
///
/// No project is set, so the task lands in the user's inbox.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRequest {
    /// Sanitized task text.
    pub content: String,
    /// Urgency level; always [`LOWEST_PRIORITY`].
    pub priority: u8,
    /// Optional natural-language due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
}

impl TaskRequest {
    /// Build an inbox task at the lowest priority.
    #[must_use]
    pub fn new(content: impl Into<String>, due_string: Option<String>) -> Self {
        Self {
            content: content.into(),
            priority: LOWEST_PRIORITY,
            due_string,
        }
    }
}

/// Task descriptor returned by the API, passed through without interpretation.
pub type TaskDescriptor = serde_json::Value;
