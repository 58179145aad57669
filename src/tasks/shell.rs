//! Shell framework installation and login shell configuration.
use anyhow::Result;
use std::path::{Path, PathBuf};

use super::helpers::best_effort;
use super::{Context, Task, TaskResult};
use crate::resources::framework::FrameworkResource;
use crate::resources::package::ToolResource;
use crate::resources::shell::{DefaultShellResource, SHELLS_FILE, register_shell, shells_file_lists};
use crate::resources::{Applicable as _, Resource as _, ResourceState};

/// Install the shell framework (Oh My Zsh by default).
#[derive(Debug)]
pub struct InstallFramework;

impl Task for InstallFramework {
    fn name(&self) -> &str {
        "Install shell framework"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.install_framework
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let framework = &ctx.config.framework;
        let resource = FrameworkResource::new(
            framework.name.clone(),
            ctx.config.framework_dir(),
            framework.install_url.clone(),
            &*ctx.executor,
        );

        if resource.current_state()? == ResourceState::Correct {
            ctx.log
                .info(&format!("{} already present; skipping", framework.name));
            return Ok(TaskResult::Ok);
        }

        let shell = &ctx.config.shell;
        if !ctx.executor.which(shell) {
            ctx.log.warn(&format!(
                "{shell} not found (should have been installed); skipping {}",
                framework.name
            ));
            return Ok(TaskResult::Skipped(format!("{shell} not installed")));
        }

        if ctx.platform.is_linux() && !ctx.executor.which("curl") {
            ensure_curl(ctx);
        }

        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would install {}", resource.description()));
            return Ok(TaskResult::DryRun);
        }

        ctx.log.info(&format!(
            "Installing {} (preserving any existing .zshrc)",
            framework.name
        ));
        let what = format!("installing {}", framework.name);
        match best_effort(ctx, &what, || resource.apply()) {
            Some(_) => Ok(TaskResult::Ok),
            None => Ok(TaskResult::Skipped(format!("{} installer failed", framework.name))),
        }
    }
}

/// Install curl with the system package manager without failing the run.
fn ensure_curl(ctx: &Context) {
    if ctx.dry_run {
        ctx.log.dry_run("would install curl");
        return;
    }
    best_effort(ctx, "installing curl", || {
        ToolResource::new("curl".to_string(), *ctx.platform, &*ctx.executor).apply()
    });
}

/// Change the user's login shell with `chsh`.
#[derive(Debug)]
pub struct ConfigureShell {
    shells_file: PathBuf,
}

impl ConfigureShell {
    /// Create the task using the system `/etc/shells`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_shells_file(PathBuf::from(SHELLS_FILE))
    }

    /// Create the task consulting `shells_file` as the allow-list.
    #[must_use]
    pub const fn with_shells_file(shells_file: PathBuf) -> Self {
        Self { shells_file }
    }

    /// Make sure `path` is an allowed login shell on macOS.
    fn ensure_listed(&self, ctx: &Context, path: &Path) {
        let Ok(contents) = std::fs::read_to_string(&self.shells_file) else {
            return;
        };
        if shells_file_lists(&contents, path) {
            return;
        }
        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would add {} to {}",
                path.display(),
                self.shells_file.display()
            ));
            return;
        }
        ctx.log.info(&format!(
            "Adding {} to {} so chsh is allowed",
            path.display(),
            self.shells_file.display()
        ));
        best_effort(ctx, "registering shell", || {
            register_shell(path, &*ctx.executor)
        });
    }
}

impl Default for ConfigureShell {
    fn default() -> Self {
        Self::new()
    }
}

impl Task for ConfigureShell {
    fn name(&self) -> &str {
        "Configure default shell"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.change_shell
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let shell = &ctx.config.shell;
        let Some(path) = ctx.executor.resolve(shell) else {
            ctx.log
                .warn(&format!("{shell} not installed; cannot change default shell"));
            return Ok(TaskResult::Skipped(format!("{shell} not installed")));
        };

        let resource = DefaultShellResource::new(
            shell.clone(),
            path,
            ctx.config.login_shell.clone(),
            &*ctx.executor,
        );
        if resource.current_state()? == ResourceState::Correct {
            ctx.log.info(&format!("Default shell already {shell}"));
            return Ok(TaskResult::Ok);
        }

        if ctx.platform.is_darwin() {
            self.ensure_listed(ctx, resource.shell_path());
        }
        if ctx.platform.is_wsl {
            ctx.log
                .warn("WSL detected: chsh may not affect Windows Terminal profiles");
        }

        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would change default shell to {}",
                resource.shell_path().display()
            ));
            return Ok(TaskResult::DryRun);
        }

        ctx.log.info(&format!("Changing default shell to {shell}"));
        if best_effort(ctx, "changing default shell", || resource.apply()).is_some() {
            ctx.log.info(&format!(
                "Default shell changed to {shell}; log out and back in to apply"
            ));
            Ok(TaskResult::Ok)
        } else {
            ctx.log.warn(&format!(
                "Could not change shell. Try manually: chsh -s \"$(command -v {shell})\""
            ));
            Ok(TaskResult::Skipped("chsh failed".to_string()))
        }
    }
}
