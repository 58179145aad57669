//! Top-level orchestration of a bootstrap run.
pub mod bootstrap;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::config::SETTINGS_FILE;
use crate::error::BootstrapError;
use crate::logging::{Logger, TaskStatus};
use crate::tasks::{self, Context, Task};

/// Files whose presence marks a directory as the dotfiles repository.
const ROOT_MARKERS: [&str; 2] = [SETTINGS_FILE, ".git"];

/// Resolve the dotfiles root directory from CLI arguments or auto-detection.
///
/// Lookup order: `--root`, `$DOTFILES_ROOT`, ancestors of the running
/// executable, then the current directory.
///
/// # Errors
///
/// Returns [`BootstrapError::RootNotFound`] if no candidate qualifies.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let env_root = std::env::var_os("DOTFILES_ROOT")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let exe = std::env::current_exe().ok();
    let cwd = std::env::current_dir().ok();
    find_root(
        global.root.as_deref(),
        env_root.as_deref(),
        exe.as_deref(),
        cwd.as_deref(),
    )
}

/// Whether `dir` looks like the dotfiles repository.
fn is_repo_root(dir: &Path) -> bool {
    ROOT_MARKERS.iter().any(|m| dir.join(m).exists())
}

/// Pick the repository root from already-gathered candidates.
///
/// An explicit root (`--root` or `$DOTFILES_ROOT`) only has to be a
/// directory; detected candidates must contain a root marker.
///
/// # Errors
///
/// Returns [`BootstrapError::RootNotFound`] if nothing qualifies.
pub fn find_root(
    explicit: Option<&Path>,
    env_root: Option<&Path>,
    exe: Option<&Path>,
    cwd: Option<&Path>,
) -> Result<PathBuf> {
    for root in [explicit, env_root].into_iter().flatten() {
        if root.is_dir() {
            return Ok(dunce::canonicalize(root)?);
        }
    }

    let mut candidates = Vec::new();
    if let Some(parent) = exe.and_then(Path::parent) {
        candidates.push(parent.join(".."));
        candidates.push(parent.join("../.."));
        candidates.push(parent.join("../../.."));
    }
    candidates.extend(cwd.map(Path::to_path_buf));

    let Some(found) = candidates.iter().find(|c| is_repo_root(c)) else {
        return Err(BootstrapError::RootNotFound.into());
    };
    Ok(dunce::canonicalize(found)?)
}

/// Execute tasks in order, print the summary, and bail if any task failed.
///
/// A failed fatal task stops the remaining tasks.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        if tasks::execute(task, ctx) == TaskStatus::Failed && task.is_fatal() {
            log.error(&format!("{} failed; stopping", task.name()));
            break;
        }
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}
