//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Builder for creating test session-root directory structures
pub struct SessionRootBuilder {
    temp_dir: TempDir,
}

impl SessionRootBuilder {
    /// Create a new builder with an empty session root
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the session root
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a record file under `<hash>/chats/<file_name>`
    pub fn with_record(self, hash: &str, file_name: &str, record: &RecordBuilder) -> Self {
        self.with_raw_file(hash, file_name, &record.to_json())
    }

    /// Add an arbitrary file under `<hash>/chats/<file_name>` (for corrupt
    /// or non-record content)
    pub fn with_raw_file(self, hash: &str, file_name: &str, content: &str) -> Self {
        let chats_dir = self.temp_dir.path().join(hash).join("chats");
        fs::create_dir_all(&chats_dir).expect("Failed to create chats dir");
        fs::write(chats_dir.join(file_name), content).expect("Failed to write record file");
        self
    }

    /// Add a settings.json at the root
    pub fn with_settings(self, content: &str) -> Self {
        fs::write(self.temp_dir.path().join("settings.json"), content)
            .expect("Failed to write settings.json");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for SessionRootBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for conversation record JSON
pub struct RecordBuilder {
    session_id: String,
    messages: Vec<String>,
    start_time: Option<i64>,
    last_updated: Option<i64>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            session_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            messages: Vec::new(),
            start_time: Some(1_700_000_000_000),
            last_updated: Some(1_700_000_000_000),
        }
    }

    pub fn session_id(mut self, session_id: &str) -> Self {
        self.session_id = session_id.to_string();
        self
    }

    /// Add a user message with literal text content
    pub fn user(mut self, text: &str) -> Self {
        self.messages
            .push(format!(r#"{{"type":"user","content":"{}"}}"#, text));
        self
    }

    /// Add an assistant message with literal text content
    pub fn assistant(mut self, text: &str) -> Self {
        self.messages
            .push(format!(r#"{{"type":"assistant","content":"{}"}}"#, text));
        self
    }

    /// Add a user message with part-list content
    pub fn user_parts(mut self, texts: &[&str]) -> Self {
        let parts = texts
            .iter()
            .map(|t| format!(r#"{{"text":"{}"}}"#, t))
            .collect::<Vec<_>>()
            .join(",");
        self.messages
            .push(format!(r#"{{"type":"user","content":[{}]}}"#, parts));
        self
    }

    /// Set lastUpdated (epoch milliseconds)
    pub fn last_updated(mut self, ms: i64) -> Self {
        self.last_updated = Some(ms);
        self
    }

    /// Set startTime (epoch milliseconds)
    pub fn start_time(mut self, ms: i64) -> Self {
        self.start_time = Some(ms);
        self
    }

    /// Drop both timestamps
    pub fn without_timestamps(mut self) -> Self {
        self.start_time = None;
        self.last_updated = None;
        self
    }

    /// Convert to the persisted JSON form
    pub fn to_json(&self) -> String {
        let mut fields = vec![
            format!(r#""sessionId":"{}""#, self.session_id),
            format!(r#""messages":[{}]"#, self.messages.join(",")),
        ];
        if let Some(ms) = self.start_time {
            fields.push(format!(r#""startTime":{}"#, ms));
        }
        if let Some(ms) = self.last_updated {
            fields.push(format!(r#""lastUpdated":{}"#, ms));
        }
        format!("{{{}}}", fields.join(","))
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
