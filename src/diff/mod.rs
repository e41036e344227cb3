//! Resolution of pending file-edit proposals from an external editor
//! surface.
//!
//! A proposal lives in its own directory under the diff root and consists of
//! `meta.json` (carrying the original file's path), an optional `new<ext>`
//! file holding approved content, and `response.json` recording the terminal
//! decision. The path check fails closed: a proposal path that does not
//! resolve inside the diff root is rejected before any file operation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::normalize_lexically;

const META_FILENAME: &str = "meta.json";
const RESPONSE_FILENAME: &str = "response.json";

/// Terminal decision for a pending proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffDecision {
    Approve,
    Reject,
}

impl DiffDecision {
    /// Status string recorded in `response.json`
    pub fn status(self) -> &'static str {
        match self {
            DiffDecision::Approve => "approve",
            DiffDecision::Reject => "reject",
        }
    }
}

#[derive(Debug, Error)]
pub enum DiffError {
    /// The proposal path resolves outside the diff root. Rejected before any
    /// filesystem touch.
    #[error("diff path escapes the diff root: {}", path.display())]
    PathTraversal { path: PathBuf },

    #[error("failed to read diff metadata: {0}")]
    Meta(String),

    #[error("i/o failure resolving diff: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize)]
struct DiffMeta {
    #[serde(rename = "filePath")]
    file_path: PathBuf,
}

#[derive(Serialize)]
struct DiffResponse<'a> {
    status: &'a str,
}

/// Mediates exactly one outstanding decision per proposal directory.
/// Concurrent resolution of the same path is a caller responsibility.
pub struct DiffResolver {
    diff_root: PathBuf,
}

impl DiffResolver {
    pub fn new(diff_root: impl Into<PathBuf>) -> Self {
        let diff_root = normalize_lexically(&diff_root.into());
        Self { diff_root }
    }

    /// Resolve the proposal at `diff_path`.
    ///
    /// On approve, `content` becomes the proposal's new-content file; the
    /// response file is then written for either decision. A failed
    /// approve-write aborts without writing the response (fail fast, no
    /// partial unannounced success). No retries, no queuing.
    pub fn resolve(
        &self,
        diff_path: &Path,
        decision: DiffDecision,
        content: Option<&str>,
    ) -> Result<(), DiffError> {
        let normalized = normalize_lexically(diff_path);
        // Component-wise prefix check: also true when the path is the root
        // itself, and immune to the "/root/diff-evil" string-prefix trap
        if !normalized.starts_with(&self.diff_root) {
            eprintln!(
                "Warning: Rejected diff path outside the diff root: {}",
                diff_path.display()
            );
            return Err(DiffError::PathTraversal { path: normalized });
        }

        let meta_raw = fs::read_to_string(normalized.join(META_FILENAME))
            .map_err(|e| DiffError::Meta(e.to_string()))?;
        let meta: DiffMeta =
            serde_json::from_str(&meta_raw).map_err(|e| DiffError::Meta(e.to_string()))?;

        if decision == DiffDecision::Approve {
            let new_file = match meta.file_path.extension() {
                Some(ext) => format!("new.{}", ext.to_string_lossy()),
                None => "new".to_string(),
            };
            fs::write(normalized.join(new_file), content.unwrap_or(""))?;
        }

        let response = serde_json::to_string(&DiffResponse { status: decision.status() })
            .map_err(|e| DiffError::Meta(e.to_string()))?;
        fs::write(normalized.join(RESPONSE_FILENAME), response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn proposal_dir(root: &Path, name: &str, original: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("meta.json"), format!(r#"{{"filePath": "{}"}}"#, original)).unwrap();
        dir
    }

    #[test]
    fn test_approve_writes_new_content_and_response() {
        let root = TempDir::new().unwrap();
        let resolver = DiffResolver::new(root.path());
        let dir = proposal_dir(root.path(), "proposal-1", "/src/main.rs");

        resolver
            .resolve(&dir, DiffDecision::Approve, Some("fn main() {}"))
            .unwrap();

        assert_eq!(fs::read_to_string(dir.join("new.rs")).unwrap(), "fn main() {}");
        let response: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("response.json")).unwrap()).unwrap();
        assert_eq!(response["status"], "approve");
    }

    #[test]
    fn test_reject_writes_response_only() {
        let root = TempDir::new().unwrap();
        let resolver = DiffResolver::new(root.path());
        let dir = proposal_dir(root.path(), "proposal-1", "/src/lib.rs");

        resolver.resolve(&dir, DiffDecision::Reject, None).unwrap();

        assert!(!dir.join("new.rs").exists());
        let response: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("response.json")).unwrap()).unwrap();
        assert_eq!(response["status"], "reject");
    }

    #[test]
    fn test_approve_without_extension_writes_plain_new_file() {
        let root = TempDir::new().unwrap();
        let resolver = DiffResolver::new(root.path());
        let dir = proposal_dir(root.path(), "proposal-1", "/src/Makefile2000");

        resolver.resolve(&dir, DiffDecision::Approve, Some("all:")).unwrap();
        assert!(dir.join("new").exists());
    }

    #[test]
    fn test_traversal_rejected_without_touching_disk() {
        let root = TempDir::new().unwrap();
        let resolver = DiffResolver::new(root.path());

        // Bait directory outside the root that a traversal would reach
        let outside = root.path().parent().unwrap().join("outside-proposal");

        let sneaky = root.path().join("..").join("outside-proposal");
        let err = resolver.resolve(&sneaky, DiffDecision::Approve, Some("x")).unwrap_err();
        assert!(matches!(err, DiffError::PathTraversal { .. }));
        assert!(!outside.exists());
    }

    #[test]
    fn test_absolute_path_outside_root_rejected() {
        let root = TempDir::new().unwrap();
        let resolver = DiffResolver::new(root.path());

        let err = resolver
            .resolve(Path::new("/etc/proposal"), DiffDecision::Reject, None)
            .unwrap_err();
        assert!(matches!(err, DiffError::PathTraversal { .. }));
    }

    #[test]
    fn test_sibling_prefix_directory_rejected() {
        // "/root/diff-evil" must not pass a check for "/root/diff"
        let root = TempDir::new().unwrap();
        let diff_root = root.path().join("diff");
        fs::create_dir_all(&diff_root).unwrap();
        let resolver = DiffResolver::new(&diff_root);

        let sibling = root.path().join("diff-evil");
        fs::create_dir_all(&sibling).unwrap();

        let err = resolver.resolve(&sibling, DiffDecision::Reject, None).unwrap_err();
        assert!(matches!(err, DiffError::PathTraversal { .. }));
        assert!(!sibling.join("response.json").exists());
    }

    #[test]
    fn test_missing_meta_is_meta_error() {
        let root = TempDir::new().unwrap();
        let resolver = DiffResolver::new(root.path());
        let dir = root.path().join("proposal-1");
        fs::create_dir_all(&dir).unwrap();

        let err = resolver.resolve(&dir, DiffDecision::Reject, None).unwrap_err();
        assert!(matches!(err, DiffError::Meta(_)));
        assert!(!dir.join("response.json").exists());
    }

    #[test]
    fn test_malformed_meta_is_meta_error() {
        let root = TempDir::new().unwrap();
        let resolver = DiffResolver::new(root.path());
        let dir = root.path().join("proposal-1");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("meta.json"), "{broken").unwrap();

        let err = resolver.resolve(&dir, DiffDecision::Approve, Some("x")).unwrap_err();
        assert!(matches!(err, DiffError::Meta(_)));
        assert!(!dir.join("response.json").exists());
    }
}
