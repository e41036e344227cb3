use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

/// Computes the stable project hash for a workspace path.
///
/// The same algorithm names hash directories at write time and resolves them
/// at read time, so it must be deterministic across processes: SHA-256 hex of
/// the canonicalized path string. When the path no longer exists on disk
/// (deleted workspace) it is lexically normalized instead, which yields the
/// same string `canonicalize` would have produced for a symlink-free path.
///
/// Case sensitivity and trailing-separator handling follow the host file
/// system: on case-preserving systems two spellings of the same directory
/// canonicalize to one string and therefore one hash. Hash collisions are
/// treated as "same project"; there is no collision-resolution layer.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ai_session_rewind::project_hash;
///
/// let hash = project_hash(Path::new("/Users/foo/project"));
/// assert_eq!(hash.len(), 64);
/// assert_eq!(hash, project_hash(Path::new("/Users/foo/project/")));
/// ```
pub fn project_hash(path: &Path) -> String {
    let canonical = path.canonicalize().unwrap_or_else(|_| normalize_lexically(path));
    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Resolves `.` and `..` components without touching the file system.
///
/// `..` at the root stays at the root, matching how absolute paths resolve on
/// the host. Used where canonicalization is impossible (nonexistent paths) or
/// undesirable (security checks that must not follow symlinks).
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Pop a normal component; keep root/prefix components.
                if !matches!(
                    normalized.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    normalized.pop();
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Expands a leading `~/` against the home directory, leaving other paths
/// untouched. Relative paths are returned as-is; callers decide the base.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
