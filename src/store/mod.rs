//! Durable, per-project session storage.
//!
//! Records live under `<root>/<projectHash>/chats/session-<id>.json`. The
//! store is explicitly constructed with its root directory so tests and
//! embedders can run isolated stores side by side; there is no process-wide
//! singleton.

pub mod session_store;

use thiserror::Error;

use crate::models::SessionKey;

pub use session_store::{SESSION_FILE_PREFIX, SessionStore};

/// Failures from the write/load paths of the store. Read-path enumeration
/// failures never surface here; `list_recent` degrades per file instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session record not found: {key}")]
    NotFound { key: SessionKey },

    #[error("malformed session record {key}: {reason}")]
    Parse { key: SessionKey, reason: String },

    #[error("i/o failure for session record {key}: {source}")]
    Io {
        key: SessionKey,
        #[source]
        source: std::io::Error,
    },
}
