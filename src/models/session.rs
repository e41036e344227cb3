use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Identifies one persisted record: the project hash directory plus the file
/// name within its `chats/` subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub hash: String,
    pub file_name: String,
}

impl SessionKey {
    pub fn new(hash: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self { hash: hash.into(), file_name: file_name.into() }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.hash, self.file_name)
    }
}

/// Read projection of a persisted record, built by [`list_recent`] and never
/// written back to disk.
///
/// [`list_recent`]: crate::store::SessionStore::list_recent
#[derive(Debug, Clone)]
pub struct SessionIndexEntry {
    pub session_id: String,
    pub display_name: String,
    pub message_count: usize,
    /// None when the project path could not be resolved from configuration
    /// or message text
    pub project_path: Option<PathBuf>,
    pub mtime: Option<DateTime<Utc>>,
    pub key: SessionKey,
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_session_key_equality() {
        let a = SessionKey::new("abc", "session-1.json");
        let b = SessionKey::new("abc", "session-1.json");
        let c = SessionKey::new("abc", "session-2.json");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_session_key_usable_in_sets() {
        let mut seen = HashSet::new();
        seen.insert(SessionKey::new("abc", "session-1.json"));
        assert!(seen.contains(&SessionKey::new("abc", "session-1.json")));
        assert!(!seen.contains(&SessionKey::new("def", "session-1.json")));
    }

    #[test]
    fn test_session_key_display() {
        let key = SessionKey::new("abc", "session-1.json");
        assert_eq!(key.to_string(), "abc/session-1.json");
    }
}
