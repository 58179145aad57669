//! Conditionally linked packages.
use anyhow::Result;

use super::links::{backup_conflicts, link};
use super::{Context, Task, TaskResult};
use crate::config::settings::Extra;

/// Link conditional packages whose prerequisites are met.
#[derive(Debug)]
pub struct LinkExtras;

/// Why `extra` cannot be linked on this system, if anything.
fn unmet_requirement(ctx: &Context, extra: &Extra) -> Option<String> {
    let name = &extra.package;
    if !ctx.platform.is_linux() {
        return Some(format!("{name}: not Linux; skipping"));
    }
    if !ctx.executor.which(&extra.requires) {
        return Some(format!("{name}: {} not found; skipping", extra.requires));
    }
    let config_dir = ctx.root().join(name).join(".config").join(name);
    if !config_dir.is_dir() {
        return Some(format!(
            "{name}: expected '{name}/.config/{name}' in repo; skipping"
        ));
    }
    None
}

impl Task for LinkExtras {
    fn name(&self) -> &str {
        "Link extras"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.requested_extras().is_empty()
    }

    fn is_fatal(&self) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mode = ctx.config.mode;
        let mut linked = 0usize;
        for extra in ctx.config.requested_extras() {
            if let Some(reason) = unmet_requirement(ctx, extra) {
                ctx.log.info(&reason);
                continue;
            }
            if mode.backs_up() {
                backup_conflicts(ctx, &extra.package)?;
            }
            ctx.log.info(&format!("{} {}", mode.verb(), extra.package));
            link(ctx, std::slice::from_ref(&extra.package))?;
            linked += 1;
        }

        if linked == 0 {
            return Ok(TaskResult::Skipped(
                "no extras with met prerequisites".to_string(),
            ));
        }
        Ok(TaskResult::done(ctx))
    }
}
