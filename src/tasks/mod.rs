//! Named, ordered tasks that orchestrate resource changes.
mod context;
pub mod extras;
pub mod helpers;
pub mod links;
pub mod prerequisites;
mod processing;
pub mod shell;
pub mod verify;

pub use context::Context;
pub use processing::{ProcessOpts, TaskResult, TaskStats, process_resources};

use anyhow::Result;

use crate::config::Config;
use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task should run for the current configuration and platform.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Whether a failure of this task stops the remaining tasks.
    fn is_fatal(&self) -> bool {
        false
    }

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails to execute, such as when system commands
    /// fail, file operations are not permitted, or configuration is invalid.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete, ordered set of tasks run by a bootstrap.
#[must_use]
pub fn all_tasks(config: &Config) -> Vec<Box<dyn Task>> {
    vec![
        Box::new(prerequisites::EnsureTool::new("stow")),
        Box::new(prerequisites::EnsureTool::new(&config.shell)),
        Box::new(shell::InstallFramework),
        Box::new(shell::ConfigureShell::new()),
        Box::new(links::ApplyLinks),
        Box::new(extras::LinkExtras),
        Box::new(verify::VerifyLinks),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// Returns the recorded status.
pub fn execute(task: &dyn Task, ctx: &Context) -> TaskStatus {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return TaskStatus::NotApplicable;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            TaskStatus::Ok
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            TaskStatus::Skipped
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            TaskStatus::DryRun
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            TaskStatus::Failed
        }
    }
}
