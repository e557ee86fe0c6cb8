//! Shared test utilities for integration tests.
//!
//! Builds throwaway note vaults on disk in the layout the renderer expects:
//! notes in a folder, attachments in its `img` subfolder.

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Bytes of a minimal PNG header; enough for content type checks.
pub const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Creates a temporary vault with a `notes/img` folder.
///
/// # Errors
///
/// Returns error if directory creation fails
pub fn create_vault() -> Result<TempDir> {
    let dir = TempDir::new()?;
    fs::create_dir_all(dir.path().join("notes").join("img"))?;
    Ok(dir)
}

/// Writes a file relative to the vault root, creating parent folders.
///
/// # Returns
///
/// Absolute path of the written file
///
/// # Errors
///
/// Returns error if the file cannot be written
pub fn write_file(vault: &Path, rel: &str, content: &[u8]) -> Result<PathBuf> {
    let path = vault.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}

/// Folder of notes inside the vault, as a string for `RenderOptions`.
pub fn notes_dir(vault: &Path) -> String {
    vault.join("notes").to_string_lossy().into_owned()
}
