//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::Path;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Ensure `path` exists as a directory.
///
/// Returns `true` when the directory had to be created.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(path)
        .with_context(|| format!("create directory: {}", path.display()))?;
    Ok(true)
}

/// Whether something other than a symlink exists at `path`.
///
/// Uses `symlink_metadata`, so a broken symlink counts as a symlink and
/// reports `false`.
#[must_use]
pub fn is_real_entry(path: &Path) -> bool {
    path.symlink_metadata()
        .is_ok_and(|meta| !meta.file_type().is_symlink())
}
