use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::models::{ConversationRecord, SessionIndexEntry, SessionKey};
use crate::store::StoreError;
use crate::utils::project_hash;

/// Record files must carry this prefix to be picked up by the scan
pub const SESSION_FILE_PREFIX: &str = "session-";
const SESSION_FILE_SUFFIX: &str = ".json";
const CHATS_DIR: &str = "chats";

/// Marker embedded in early context messages, used as a last-resort project
/// path hint when no configured candidate matches the hash
const PROJECT_PATH_MARKER: &str = "I'm currently working in the directory: ";
const MARKER_SCAN_LIMIT: usize = 5;

/// Owns all on-disk conversation records under one root directory.
pub struct SessionStore {
    root: PathBuf,
    settings: Settings,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>, settings: Settings) -> Self {
        Self { root: root.into(), settings }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk location of one record
    pub fn record_path(&self, key: &SessionKey) -> PathBuf {
        self.root.join(&key.hash).join(CHATS_DIR).join(&key.file_name)
    }

    /// Build the file name for a session id (`session-<id>.json`)
    pub fn file_name_for(session_id: &str) -> String {
        format!("{}{}{}", SESSION_FILE_PREFIX, session_id, SESSION_FILE_SUFFIX)
    }

    /// Scan every project-hash directory and return an index of all readable
    /// records, most recently updated first.
    ///
    /// Each file's success is independent: a corrupt record, an unreadable
    /// directory, or a record missing required fields is logged and skipped,
    /// never aborting the scan. A missing root directory yields an empty
    /// listing, not an error.
    pub fn list_recent(&self) -> Vec<SessionIndexEntry> {
        let mut entries = Vec::new();

        let hash_dirs = match fs::read_dir(&self.root) {
            Ok(dirs) => dirs,
            Err(e) if e.kind() == ErrorKind::NotFound => return entries,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to read session root {}: {}",
                    self.root.display(),
                    e
                );
                return entries;
            }
        };

        for dir_entry in hash_dirs.flatten() {
            let hash_path = dir_entry.path();
            if !hash_path.is_dir() {
                continue;
            }
            let hash = match hash_path.file_name() {
                Some(name) => name.to_string_lossy().to_string(),
                None => continue,
            };

            // A hash directory without a chats/ subdirectory is not an error
            let files = match fs::read_dir(hash_path.join(CHATS_DIR)) {
                Ok(files) => files,
                Err(_) => continue,
            };

            for file in files.flatten() {
                let file_name = file.file_name().to_string_lossy().to_string();
                if !file_name.starts_with(SESSION_FILE_PREFIX)
                    || !file_name.ends_with(SESSION_FILE_SUFFIX)
                {
                    continue;
                }

                let key = SessionKey::new(hash.clone(), file_name);
                match self.load(&key) {
                    Ok(record) => entries.push(SessionIndexEntry {
                        session_id: record.session_id.clone(),
                        display_name: record.display_name(),
                        message_count: record.messages.len(),
                        project_path: self.resolve_project_path(&key.hash, &record),
                        mtime: record.mtime(),
                        key,
                    }),
                    Err(e) => {
                        eprintln!("Warning: Skipping session {}: {}", key, e);
                    }
                }
            }
        }

        // Newest first; records without any timestamp sort last
        entries.sort_by(|a, b| b.mtime.cmp(&a.mtime));
        entries
    }

    /// Best-effort reverse lookup from a project hash to a workspace path.
    ///
    /// Configured candidates (workspace directory plus include directories)
    /// are hashed and matched first; only when none match is the record's
    /// message text scanned for the embedded working-directory marker. When
    /// both strategies fail the path is reported unresolved, never guessed.
    pub fn resolve_project_path(
        &self,
        hash: &str,
        record: &ConversationRecord,
    ) -> Option<PathBuf> {
        for candidate in self.settings.candidate_paths() {
            if project_hash(&candidate) == hash {
                return Some(candidate);
            }
        }

        for message in record.messages.iter().take(MARKER_SCAN_LIMIT) {
            let text = message.content.to_text();
            if let Some(idx) = text.find(PROJECT_PATH_MARKER) {
                let rest = &text[idx + PROJECT_PATH_MARKER.len()..];
                let line = rest.lines().next().unwrap_or("").trim();
                if !line.is_empty() {
                    return Some(PathBuf::from(line));
                }
            }
        }

        None
    }

    /// Idempotent migration: make sure the record is present under the hash
    /// of `target_path`, copying it from `source_hash` if needed.
    ///
    /// Failures are logged and swallowed; the caller must tolerate resumption
    /// not finding history rather than crashing the host.
    pub fn ensure_in_project(&self, source_hash: &str, file_name: &str, target_path: &Path) {
        let target_hash = project_hash(target_path);
        if source_hash == target_hash {
            return;
        }

        let source = self.record_path(&SessionKey::new(source_hash, file_name));
        if !source.exists() {
            eprintln!(
                "Warning: Source session file not found at {}, cannot migrate",
                source.display()
            );
            return;
        }

        let target_dir = self.root.join(&target_hash).join(CHATS_DIR);
        if let Err(e) = fs::create_dir_all(&target_dir) {
            eprintln!(
                "Warning: Failed to create project directory {}: {}",
                target_dir.display(),
                e
            );
            return;
        }

        if let Err(e) = fs::copy(&source, target_dir.join(file_name)) {
            eprintln!(
                "Warning: Failed to migrate session {} to {}: {}",
                file_name,
                target_path.display(),
                e
            );
        }
    }

    /// Parse one record file. Unlike during listing, malformed content here
    /// is a hard error.
    pub fn load(&self, key: &SessionKey) -> Result<ConversationRecord, StoreError> {
        let path = self.record_path(key);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound { key: key.clone() },
            _ => StoreError::Io { key: key.clone(), source: e },
        })?;

        let record: ConversationRecord = serde_json::from_str(&content)
            .map_err(|e| StoreError::Parse { key: key.clone(), reason: e.to_string() })?;

        if record.session_id.is_empty() {
            return Err(StoreError::Parse {
                key: key.clone(),
                reason: "empty sessionId".to_string(),
            });
        }

        Ok(record)
    }

    /// Whole-file overwrite via temp file + rename, creating the project
    /// directory as needed. Write failures propagate.
    pub fn save(&self, key: &SessionKey, record: &ConversationRecord) -> Result<(), StoreError> {
        let dir = self.root.join(&key.hash).join(CHATS_DIR);
        fs::create_dir_all(&dir)
            .map_err(|e| StoreError::Io { key: key.clone(), source: e })?;
        let path = dir.join(&key.file_name);

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StoreError::Parse { key: key.clone(), reason: e.to_string() })?;

        let temp = path.with_extension("json.tmp");
        fs::write(&temp, json).map_err(|e| StoreError::Io { key: key.clone(), source: e })?;
        fs::rename(&temp, &path).map_err(|e| StoreError::Io { key: key.clone(), source: e })?;
        Ok(())
    }

    /// Remove one record file. Deletion is a deliberate user action, so
    /// failure propagates instead of being swallowed.
    pub fn delete(&self, key: &SessionKey) -> Result<(), StoreError> {
        let path = self.record_path(key);
        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound { key: key.clone() },
            _ => StoreError::Io { key: key.clone(), source: e },
        })
    }
}
