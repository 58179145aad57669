//! Conflict backup resource: moves a real file out of the way of a symlink.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::error::ResourceError;
use super::helpers::fs::{ensure_parent_dir, is_real_entry};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// Marker inserted between the original name and the timestamp.
pub const BACKUP_MARKER: &str = ".pre-stow.";

/// Current local time formatted as a backup stamp (`YYYYmmdd-HHMMSS`).
#[must_use]
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// Return the first free backup name for `path`.
///
/// The base name is `<path>.pre-stow.<stamp>`; when that is taken,
/// `.1`, `.2`, … are appended until a free name is found.
#[must_use]
pub fn backup_path(path: &Path, stamp: &str) -> PathBuf {
    let mut base = OsString::from(path.as_os_str());
    base.push(BACKUP_MARKER);
    base.push(stamp);
    let candidate = PathBuf::from(&base);
    if candidate.symlink_metadata().is_err() {
        return candidate;
    }
    (1u32..)
        .map(|n| {
            let mut name = base.clone();
            name.push(format!(".{n}"));
            PathBuf::from(name)
        })
        .find(|p| p.symlink_metadata().is_err())
        .unwrap_or(candidate)
}

/// A path in the link target that must not be a real file or directory.
#[derive(Debug)]
pub struct BackupResource {
    /// Path stow wants to turn into a symlink.
    pub path: PathBuf,
    stamp: String,
}

impl BackupResource {
    /// Create a backup resource stamped with the current local time.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_stamp(path, timestamp())
    }

    /// Create a backup resource with an explicit timestamp.
    #[must_use]
    pub const fn with_stamp(path: PathBuf, stamp: String) -> Self {
        Self { path, stamp }
    }

    /// Where the conflicting entry would be moved to right now.
    #[must_use]
    pub fn destination(&self) -> PathBuf {
        backup_path(&self.path, &self.stamp)
    }
}

impl Applicable for BackupResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !is_real_entry(&self.path) {
            return Ok(ResourceChange::Skipped {
                reason: "no longer a real file or directory".to_string(),
            });
        }
        let destination = self.destination();
        let failed = |e: &dyn std::fmt::Display| ResourceError::BackupFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        };
        ensure_parent_dir(&destination).map_err(|e| failed(&e))?;
        std::fs::rename(&self.path, &destination).map_err(|e| failed(&e))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for BackupResource {
    fn current_state(&self) -> Result<ResourceState> {
        if !is_real_entry(&self.path) {
            return Ok(ResourceState::Correct);
        }
        let kind = if self.path.is_dir() {
            "directory"
        } else {
            "file"
        };
        Ok(ResourceState::Incorrect {
            current: kind.to_string(),
        })
    }
}
