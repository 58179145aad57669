//! Post-run listing of the linked paths.
use anyhow::Result;
use std::path::Path;

use super::{Context, Task, TaskResult};
use crate::stow::StowMode;

/// Print where the verified paths under the target point.
#[derive(Debug)]
pub struct VerifyLinks;

/// Describe `path` as `path -> link` for symlinks or `path` otherwise.
///
/// Returns `None` when nothing exists at `path`.
fn describe(path: &Path) -> Option<String> {
    let meta = path.symlink_metadata().ok()?;
    if meta.file_type().is_symlink() {
        let link = std::fs::read_link(path).ok()?;
        Some(format!("{} -> {}", path.display(), link.display()))
    } else {
        Some(path.display().to_string())
    }
}

impl Task for VerifyLinks {
    fn name(&self) -> &str {
        "Verify links"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.dry_run && ctx.config.mode != StowMode::Unstow
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        for entry in &ctx.config.verify {
            if let Some(line) = describe(&ctx.target().join(entry)) {
                ctx.log.info(&line);
            }
        }
        ctx.log.info("Done.");
        if ctx.config.change_shell {
            ctx.log.info(&format!(
                "Tip: run '{}' to test now (default will apply next login).",
                ctx.config.shell
            ));
        }
        Ok(TaskResult::Ok)
    }
}
