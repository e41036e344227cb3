use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Get the session data directory (~/.ai-sessions)
pub fn get_data_dir() -> Result<PathBuf> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".ai-sessions"))
}
