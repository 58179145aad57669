//! Dotfiles bootstrap engine.
//!
//! Installs GNU Stow and the login shell with the system package manager,
//! optionally sets up Oh My Zsh and the default shell, then links stow
//! packages into the home directory. Real files that would block a link are
//! renamed to `<path>.pre-stow.<timestamp>` first.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: CLI flags merged with the optional `bootstrap.toml`
//! - **[`resources`]**: idempotent `check + apply` primitives (tools, backups, shell)
//! - **[`tasks`]**: named, ordered units of work wired to resources
//! - **[`commands`]**: top-level orchestration of a bootstrap run
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod stow;
pub mod tasks;
