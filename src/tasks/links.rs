//! Conflict backups and stow invocation.
use anyhow::{Context as _, Result};

use super::{Context, ProcessOpts, Task, TaskResult, TaskStats, process_resources};
use crate::error::BootstrapError;
use crate::resources::backup::BackupResource;
use crate::resources::helpers::fs::ensure_dir;
use crate::stow::{parse_link_plan, preview_args, stow_args};

/// Move real files that would block the links of `package` out of the way.
///
/// Runs stow in simulation mode, parses the planned link targets and backs
/// up every one that is a real file or directory. Individual backup
/// failures are warnings; the remaining paths are still processed.
///
/// # Errors
///
/// Returns an error if the stow preview cannot be run at all.
pub fn backup_conflicts(ctx: &Context, package: &str) -> Result<TaskStats> {
    if !ctx.dry_run {
        for dir in &ctx.config.ensure_dirs {
            let path = ctx.target().join(dir);
            match ensure_dir(&path) {
                Ok(true) => ctx.log.debug(&format!("created {}", path.display())),
                Ok(false) => {}
                Err(e) => ctx.log.warn(&format!("{e:#}")),
            }
        }
    }

    let args = preview_args(ctx.target(), package);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let preview = ctx
        .executor
        .run_unchecked_in(ctx.root(), "stow", &args)
        .with_context(|| format!("previewing links for {package}"))?;

    let plan = parse_link_plan(&preview.combined_output(), ctx.target());
    ctx.log
        .debug(&format!("{package}: {} planned link(s)", plan.len()));

    let stats = process_resources(
        ctx,
        plan.into_iter().map(BackupResource::new),
        &ProcessOpts::apply_all("back up").no_bail(),
    )?;
    if stats.changed > 0 || stats.skipped > 0 {
        ctx.log.info(&format!(
            "{package} conflicts: {}",
            stats.summary(ctx.dry_run)
        ));
    }
    Ok(stats)
}

/// Run one stow invocation for `packages` in the configured mode.
///
/// In dry run a non-zero exit is only a warning: conflicts reported by the
/// simulation would have been backed up by a real run.
///
/// # Errors
///
/// Returns [`BootstrapError::LinkFailed`] if stow exits non-zero, or an
/// error if it cannot be run.
pub fn link(ctx: &Context, packages: &[String]) -> Result<()> {
    let mode = ctx.config.mode;
    let args = stow_args(mode, ctx.dry_run, ctx.target(), packages);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let result = ctx
        .executor
        .run_unchecked_in(ctx.root(), "stow", &args)
        .with_context(|| format!("running stow for {}", packages.join(" ")))?;

    let output = result.combined_output();
    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        if ctx.dry_run {
            ctx.log.info(line.trim_end());
        } else {
            ctx.log.debug(line.trim_end());
        }
    }

    if result.success {
        return Ok(());
    }
    let reason = match result.code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    };
    if ctx.dry_run {
        ctx.log.warn(&format!(
            "stow simulation reported problems ({reason}); conflicts would be backed up first"
        ));
        return Ok(());
    }
    Err(BootstrapError::LinkFailed {
        mode: mode.to_string(),
        reason,
    }
    .into())
}

/// Back up conflicts and link the requested packages in one stow run.
#[derive(Debug)]
pub struct ApplyLinks;

impl Task for ApplyLinks {
    fn name(&self) -> &str {
        "Link packages"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn is_fatal(&self) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let packages = ctx.config.main_packages();
        if packages.is_empty() {
            return Ok(TaskResult::Skipped("no packages to link".to_string()));
        }

        let mode = ctx.config.mode;
        if mode.backs_up() {
            let mut stats = TaskStats::new();
            for package in &packages {
                stats += backup_conflicts(ctx, package)?;
            }
            ctx.log
                .debug(&format!("backups: {}", stats.summary(ctx.dry_run)));
        }

        ctx.log.info(&format!(
            "{} packages: {} -> {}",
            mode.verb(),
            packages.join(" "),
            ctx.target().display()
        ));
        link(ctx, &packages)?;
        Ok(TaskResult::done(ctx))
    }
}
