//! `bootstrap` command-line entry point.
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use dotfiles_bootstrap::cli::Cli;
use dotfiles_bootstrap::commands;
use dotfiles_bootstrap::exec::SystemExecutor;
use dotfiles_bootstrap::logging::{self, Logger};

/// Name used for the log file and its header.
const COMMAND: &str = "bootstrap";

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose, COMMAND);
    let log = Arc::new(Logger::new(COMMAND));

    commands::bootstrap::run(&args.global, &args.opts, &log, Arc::new(SystemExecutor))
}
