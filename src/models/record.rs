use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Message type for user turns
pub const MESSAGE_TYPE_USER: &str = "user";
/// Message type for assistant turns
pub const MESSAGE_TYPE_ASSISTANT: &str = "assistant";

/// Display names longer than this are truncated with a trailing ellipsis
const DISPLAY_NAME_MAX_CHARS: usize = 60;
const DISPLAY_NAME_FALLBACK: &str = "Empty conversation";

/// A structured content part. Only `text` is interpreted; any other fields
/// (tool calls etc.) are preserved verbatim so a truncation rewrite does not
/// drop them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Message content: either literal text or a list of structured parts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Flatten content to plain text; non-text parts contribute nothing
    pub fn to_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => {
                parts.iter().filter_map(|p| p.text.as_deref()).collect()
            }
        }
    }
}

/// One persisted conversation message. Display ids are assigned from position
/// at hydration time and are deliberately absent here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "type")]
    pub message_type: String,
    pub content: MessageContent,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::models::deserializers::deserialize_opt_timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageRecord {
    pub fn new(message_type: &str, text: &str) -> Self {
        Self {
            message_type: message_type.to_string(),
            content: MessageContent::Text(text.to_string()),
            timestamp: Some(Utc::now()),
            extra: Map::new(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.message_type == MESSAGE_TYPE_USER
    }
}

/// The durable representation of one conversation session.
///
/// `messages` is append-only during normal operation and truncatable only by
/// rewind; index position is the canonical identity for rewind targeting
/// within one load. Unknown top-level fields survive a whole-file rewrite via
/// the flattened `extra` map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub messages: Vec<MessageRecord>,
    #[serde(
        rename = "startTime",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::models::deserializers::deserialize_opt_timestamp"
    )]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(
        rename = "lastUpdated",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::models::deserializers::deserialize_opt_timestamp"
    )]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationRecord {
    /// Create an empty record with a fresh session id. The id is assigned
    /// once here and immutable thereafter.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            start_time: Some(now),
            last_updated: Some(now),
            extra: Map::new(),
        }
    }

    /// Append a message, keeping `last_updated` monotonically non-decreasing
    pub fn append(&mut self, message: MessageRecord) {
        let now = Utc::now();
        self.messages.push(message);
        self.last_updated = Some(match self.last_updated {
            Some(prev) if prev > now => prev,
            _ => now,
        });
    }

    /// Return the prefix `[0, index]` inclusive as a new record with
    /// `last_updated` reset to the current time. The original is untouched;
    /// committing the truncation is the store's job.
    pub fn truncated(&self, index: usize) -> Self {
        let mut record = self.clone();
        record.messages.truncate(index + 1);
        record.last_updated = Some(Utc::now());
        record
    }

    /// The timestamp used for recency sorting: `lastUpdated`, falling back
    /// to `startTime`
    pub fn mtime(&self) -> Option<DateTime<Utc>> {
        self.last_updated.or(self.start_time)
    }

    /// Derive the listing display name: the first user message that is
    /// non-empty and not a slash command, truncated to 60 chars. A record
    /// with no such message reports `"Empty conversation"`.
    pub fn display_name(&self) -> String {
        for message in &self.messages {
            if !message.is_user() {
                continue;
            }
            let text = message.content.to_text();
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('/') {
                continue;
            }
            return truncate_display_name(trimmed);
        }
        DISPLAY_NAME_FALLBACK.to_string()
    }
}

impl Default for ConversationRecord {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_display_name(name: &str) -> String {
    if name.chars().count() > DISPLAY_NAME_MAX_CHARS {
        let head: String = name.chars().take(DISPLAY_NAME_MAX_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}
