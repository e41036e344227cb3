use anyhow::Result;
use thiserror::Error;

use crate::models::{ConversationRecord, SessionKey};
use crate::rewind::history::{ClientTurn, HistoryItem, convert_messages};
use crate::store::{SessionStore, StoreError};

/// What the user chose in the rewind dialog. A closed set; new behaviors get
/// a new variant, not an ad-hoc flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewindOutcome {
    Cancel,
    RewindOnly,
    RevertOnly,
    RewindAndRevert,
}

/// Undoes filesystem edits attributable to messages after a chosen point.
/// The engine delegates here and waits for completion; it never diffs files
/// itself.
pub trait FileReverter {
    fn revert_changes_since(&self, record: &ConversationRecord, index: usize) -> Result<()>;
}

/// The live chat client's narrow interface: replace its in-memory turn list
pub trait ChatClient {
    fn set_history(&mut self, history: Vec<ClientTurn>);
}

/// Cached project-context summary, re-derived after any successful rewind
pub trait ContextManager {
    fn refresh(&mut self) -> Result<()>;
}

/// Engine-boundary failure. Display gives the single human-readable message
/// the caller surfaces; no error escapes the engine unannounced.
#[derive(Debug, Error)]
pub enum RewindError {
    #[error("rewind target {index} is out of range ({len} messages)")]
    BadTarget { index: usize, len: usize },

    #[error("failed to revert file changes: {0}")]
    Revert(#[source] anyhow::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of one rewind interaction
#[derive(Debug)]
pub enum RewindReport {
    /// Dialog dismissed, nothing mutated
    Cancelled,
    /// File changes reverted; record and live history untouched
    Reverted,
    /// Record truncated and persisted; both histories derived fresh from it
    Rewound {
        record: ConversationRecord,
        ui_history: Vec<HistoryItem>,
        client_history: Vec<ClientTurn>,
    },
}

/// Coordinates a single rewind interaction across the persisted record, the
/// live chat client, and the file-revert collaborator.
pub struct RewindEngine<'a, R, C, M>
where
    R: FileReverter,
    C: ChatClient,
    M: ContextManager,
{
    store: &'a SessionStore,
    reverter: &'a R,
    client: &'a mut C,
    context: &'a mut M,
}

impl<'a, R, C, M> RewindEngine<'a, R, C, M>
where
    R: FileReverter,
    C: ChatClient,
    M: ContextManager,
{
    pub fn new(store: &'a SessionStore, reverter: &'a R, client: &'a mut C, context: &'a mut M) -> Self {
        Self { store, reverter, client, context }
    }

    /// Execute the chosen outcome against target message index `target`
    /// (inclusive: the retained conversation is `[0, target]`).
    ///
    /// For `RewindAndRevert` the file revert runs first; if it fails, the
    /// truncation is not applied — truncating history while files remain in a
    /// post-edit state would desynchronize the assistant's view from reality.
    /// Revert attempts are at-most-once, never retried.
    ///
    /// The record is exclusively owned by the engine for the duration of the
    /// call; concurrent writers to the same record file are a caller
    /// discipline, not arbitrated here.
    pub fn perform(
        &mut self,
        key: &SessionKey,
        record: &ConversationRecord,
        target: usize,
        outcome: RewindOutcome,
    ) -> Result<RewindReport, RewindError> {
        if outcome == RewindOutcome::Cancel {
            return Ok(RewindReport::Cancelled);
        }

        if target >= record.messages.len() {
            return Err(RewindError::BadTarget { index: target, len: record.messages.len() });
        }

        // The reverter sees the full, untruncated record: changes after the
        // target are attributed from what actually happened.
        if matches!(outcome, RewindOutcome::RevertOnly | RewindOutcome::RewindAndRevert) {
            self.reverter
                .revert_changes_since(record, target)
                .map_err(RewindError::Revert)?;
        }

        if outcome == RewindOutcome::RevertOnly {
            return Ok(RewindReport::Reverted);
        }

        self.commit_rewind(key, record, target)
    }

    fn commit_rewind(
        &mut self,
        key: &SessionKey,
        record: &ConversationRecord,
        target: usize,
    ) -> Result<RewindReport, RewindError> {
        let truncated = record.truncated(target);
        self.store.save(key, &truncated)?;

        let (ui_history, client_history) = convert_messages(&truncated.messages);
        self.client.set_history(client_history.clone());

        // The truncation is already committed; a stale context summary is
        // recoverable, reporting failure here would imply it is not.
        if let Err(e) = self.context.refresh() {
            eprintln!("Warning: Failed to refresh context after rewind: {}", e);
        }

        Ok(RewindReport::Rewound { record: truncated, ui_history, client_history })
    }
}
