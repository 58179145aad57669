//! The bootstrap run: configuration, context and task list.
use anyhow::Result;
use std::sync::Arc;

use super::{resolve_root, run_tasks_to_completion};
use crate::cli::{BootstrapOpts, GlobalOpts};
use crate::config::Config;
use crate::exec::Executor;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context, Task};

/// Run the bootstrap.
///
/// # Errors
///
/// Returns an error if the repository root cannot be resolved, the settings
/// file is malformed, or any task fails.
pub fn run(
    global: &GlobalOpts,
    opts: &BootstrapOpts,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
) -> Result<()> {
    let root = resolve_root(global)?;
    let config = Config::load(&root, opts)?;
    run_with(config, Platform::detect(), global.dry_run, log, executor)
}

/// Run the bootstrap with an already-built configuration and platform.
///
/// # Errors
///
/// Returns an error if any task fails.
pub fn run_with(
    config: Config,
    platform: Platform,
    dry_run: bool,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
) -> Result<()> {
    let version = option_env!("BOOTSTRAP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.debug(&format!("bootstrap {version}"));
    log.info(&format!("Dotfiles root: {}", config.root.display()));
    log.info(&format!("Target: {}", config.target.display()));
    log.info(&format!("Mode: {}", config.mode));
    log.info(&format!("Packages: {}", config.packages.join(" ")));
    if dry_run {
        log.info("Dry run: nothing will be changed");
    }

    let all_tasks = tasks::all_tasks(&config);
    let ctx = Context::new(
        Arc::new(config),
        Arc::new(platform),
        Arc::clone(log) as Arc<dyn Log>,
        dry_run,
        executor,
    );

    let tasks_to_run: Vec<&dyn Task> = all_tasks.iter().map(AsRef::as_ref).collect();
    run_tasks_to_completion(tasks_to_run, &ctx, log)
}
