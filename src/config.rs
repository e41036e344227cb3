//! Settings used to resolve project hashes back to workspace paths.
//!
//! Config is a best-effort read path: a missing or malformed settings file
//! degrades to defaults with a warning instead of failing the caller.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::expand_tilde;

const SETTINGS_FILENAME: &str = "settings.json";

/// User settings stored at `<data_dir>/settings.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The current workspace directory, if configured
    #[serde(rename = "workspaceDir", skip_serializing_if = "Option::is_none")]
    pub workspace_dir: Option<String>,
    /// Extra directories whose sessions should be considered local
    #[serde(rename = "includeDirectories", skip_serializing_if = "Vec::is_empty")]
    pub include_directories: Vec<String>,
}

impl Settings {
    /// Load settings from the data directory, falling back to defaults when
    /// the file is missing or malformed
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILENAME);
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Candidate workspace paths for project-hash resolution, tilde-expanded
    /// and deduplicated, workspace directory first
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(dir) = &self.workspace_dir {
            candidates.push(expand_tilde(dir));
        }
        for dir in &self.include_directories {
            let expanded = expand_tilde(dir);
            if !candidates.contains(&expanded) {
                candidates.push(expanded);
            }
        }
        candidates
    }
}
