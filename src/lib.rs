//! AI Session Rewind - durable conversation session storage with rewind
//!
//! This library records AI-assistant conversations as per-project JSON files,
//! indexes them by originating workspace, and lets a caller jump back to an
//! earlier message while optionally reverting on-disk file edits made after
//! that point. It provides:
//!
//! - A [`SessionStore`] over `<root>/<projectHash>/chats/session-<id>.json`
//! - Deterministic workspace hashing ([`project_hash`])
//! - A [`RewindEngine`] coordinating truncation, file revert, and live-state
//!   resync through narrow collaborator traits
//! - A [`DiffResolver`] for approving or rejecting pending file-edit
//!   proposals behind a path-traversal guard
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use ai_session_rewind::{Settings, SessionStore};
//!
//! let store = SessionStore::new(PathBuf::from("/Users/alice/.ai-sessions"), Settings::default());
//! for entry in store.list_recent() {
//!     println!("{}: {} messages", entry.display_name, entry.message_count);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod diff;
pub mod models;
pub mod rewind;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use diff::{DiffDecision, DiffError, DiffResolver};
pub use models::{ConversationRecord, MessageContent, MessageRecord, SessionIndexEntry, SessionKey};
pub use rewind::{RewindEngine, RewindError, RewindOutcome, RewindReport};
pub use store::{SessionStore, StoreError};
pub use utils::paths::project_hash;
