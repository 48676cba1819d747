//! "Memory created" webhook payload emitted by the voice-transcription platform.
//!
//! Only `structured.action_items` drives behaviour; every other field is
//! accepted when present and defaulted when absent so that older or trimmed
//! payloads still parse.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO 8601 timestamp, reading one without an offset as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Timestamps are informational; anything unparseable becomes `None`
/// instead of failing the payload.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(parse_timestamp))
}

/// One diarised slice of the conversation transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptSegment {
    /// Spoken text.
    pub text: String,
    /// Speaker label, e.g. `SPEAKER_00`.
    pub speaker: String,
    /// Numeric speaker identifier.
    #[serde(rename = "speakerId")]
    pub speaker_id: i64,
    /// Whether the device owner is the speaker.
    pub is_user: bool,
    /// Segment start offset in seconds.
    pub start: f64,
    /// Segment end offset in seconds.
    pub end: f64,
}

/// A single to-do statement extracted from the conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionItem {
    /// Free-text description of the task.
    pub description: String,
    /// Whether the user already marked the item done.
    pub completed: bool,
    /// Whether the user removed the item.
    #[serde(default)]
    pub deleted: bool,
}

impl ActionItem {
    /// Whether this item should be forwarded as a new task.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        !self.completed && !self.deleted
    }
}

/// Structured summary the platform derives from a memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StructuredData {
    /// Short memory title.
    pub title: String,
    /// Paragraph-length overview.
    pub overview: String,
    /// Emoji chosen for the memory.
    pub emoji: String,
    /// Platform category label.
    pub category: String,
    /// Extracted action items.
    pub action_items: Vec<ActionItem>,
    /// Extracted calendar events, passed through untouched.
    pub events: Vec<serde_json::Value>,
}

/// Response an installed app previously attached to the memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppResponse {
    /// App identifier.
    pub app_id: String,
    /// App output.
    pub content: String,
}

/// Full webhook body for a created memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MemoryPayload {
    /// Platform memory identifier (numeric or string depending on version).
    pub id: Option<serde_json::Value>,
    /// Memory creation time.
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Recording start time.
    #[serde(deserialize_with = "lenient_timestamp")]
    pub started_at: Option<DateTime<Utc>>,
    /// Recording end time.
    #[serde(deserialize_with = "lenient_timestamp")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Transcript slices.
    pub transcript_segments: Vec<TranscriptSegment>,
    /// Attached photo references.
    pub photos: Vec<serde_json::Value>,
    /// Structured summary, including action items.
    pub structured: StructuredData,
    /// Prior app responses.
    pub apps_response: Vec<AppResponse>,
    /// Whether the platform discarded the memory.
    pub discarded: bool,
}

impl MemoryPayload {
    /// Action items that should become tasks, in payload order.
    pub fn eligible_action_items(&self) -> impl Iterator<Item = &ActionItem> {
        self.structured
            .action_items
            .iter()
            .filter(|item| item.is_eligible())
    }
}
