//! Where the CLI keeps its session.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use svcctl_store::FileStorage;

/// Get the session file path.
pub fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "svcctl").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Durable storage for the session, in the user's data directory.
pub fn open() -> Result<FileStorage> {
    Ok(FileStorage::new(session_path()?))
}
