//! Rewind: truncating a conversation to an earlier message and
//! resynchronizing live state to match, with optional reversion of file
//! edits made after that point.
//!
//! The engine coordinates three state spaces that must stay consistent: the
//! persisted record (via [`SessionStore`]), the live chat client's in-memory
//! history, and the file system (via the [`FileReverter`] collaborator).
//! Either both the revert and the truncation happen, or only the revert
//! attempt happens and the rewind is skipped; partial application is
//! rejected by construction.
//!
//! [`SessionStore`]: crate::store::SessionStore

pub mod engine;
pub mod history;

pub use engine::{
    ChatClient, ContextManager, FileReverter, RewindEngine, RewindError, RewindOutcome,
    RewindReport,
};
pub use history::{CLIENT_ROLE_MODEL, CLIENT_ROLE_USER, ClientTurn, HistoryItem, convert_messages};
