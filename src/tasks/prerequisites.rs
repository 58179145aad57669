//! Prerequisite tools (stow and the shell) installed on demand.
use anyhow::Result;

use super::helpers::best_effort;
use super::{Context, Task, TaskResult};
use crate::resources::framework::fetch_script;
use crate::resources::package::{HOMEBREW_INSTALL_SCRIPT, PackageManager, ToolResource};
use crate::resources::{Applicable as _, Resource as _, ResourceState};

/// Ensure a command-line tool is on `PATH`, installing it when absent.
#[derive(Debug)]
pub struct EnsureTool {
    name: String,
    tool: String,
}

impl EnsureTool {
    /// Create a task that ensures `tool` is installed.
    #[must_use]
    pub fn new(tool: &str) -> Self {
        Self {
            name: format!("Install {tool}"),
            tool: tool.to_string(),
        }
    }
}

impl Task for EnsureTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn is_fatal(&self) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource = ToolResource::new(self.tool.clone(), *ctx.platform, &*ctx.executor);
        if resource.current_state()? == ResourceState::Correct {
            ctx.log.debug(&format!("{} already installed", self.tool));
            return Ok(TaskResult::Ok);
        }

        let manager = resource.manager()?;

        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would install {} via {manager}", self.tool));
            return Ok(TaskResult::DryRun);
        }

        ctx.log
            .info(&format!("{} not found; installing via {manager}", self.tool));
        if manager == PackageManager::Brew && !ctx.executor.which("brew") {
            ctx.log.info("Homebrew not found; installing");
            best_effort(ctx, "installing Homebrew", || {
                let script = fetch_script(HOMEBREW_INSTALL_SCRIPT, &*ctx.executor)?;
                ctx.executor
                    .run_interactive("/bin/bash", &["-c", &script], &[])?
                    .checked("Homebrew installer")?;
                Ok(())
            });
        }

        resource.apply()?;
        ctx.log
            .info(&format!("installed {} via {manager}", resource.description()));
        Ok(TaskResult::Ok)
    }
}
