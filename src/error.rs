//! Domain-specific error types for the bootstrap engine.
//!
//! Internal modules return typed errors where the failure has a name
//! (missing package manager, failed stow run, ...) and convert them to
//! [`anyhow::Error`] with `?` at task and command boundaries.
//!
//! # Error hierarchy
//!
//! ```text
//! BootstrapError
//! ├── NoPackageManager   - Linux system with no apt/dnf/pacman
//! ├── UnsupportedOs      - package install requested on an unknown OS
//! ├── InstallFailed      - package manager invocation failed
//! ├── LinkFailed         - the real (non-preview) stow run failed
//! ├── RootNotFound       - dotfiles repository could not be located
//! ├── HomeNotSet         - no HOME to link into
//! └── Settings           - malformed bootstrap.toml
//! ```

use thiserror::Error;

use crate::platform::Os;

/// Fatal errors raised by the bootstrap engine.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// No supported package manager is available to install a tool.
    #[error("no supported package manager found to install '{tool}'; install it manually and re-run")]
    NoPackageManager {
        /// Tool that needed installing.
        tool: String,
    },

    /// Automatic installation is not supported on this OS.
    #[error("unsupported OS '{os}' for installing '{tool}'; install it manually")]
    UnsupportedOs {
        /// Tool that needed installing.
        tool: String,
        /// Detected OS family.
        os: Os,
    },

    /// The package manager failed while installing a tool.
    #[error("installing '{tool}' with {manager} failed: {reason}")]
    InstallFailed {
        /// Tool that needed installing.
        tool: String,
        /// Package manager that was used.
        manager: String,
        /// Underlying failure description.
        reason: String,
    },

    /// The stow invocation failed.
    #[error("stow {mode} failed: {reason}")]
    LinkFailed {
        /// Stow mode that was running.
        mode: String,
        /// Underlying failure description.
        reason: String,
    },

    /// The dotfiles repository root could not be determined.
    #[error("cannot determine dotfiles root; use --root or set DOTFILES_ROOT")]
    RootNotFound,

    /// The HOME environment variable is not set.
    #[error("HOME environment variable is not set")]
    HomeNotSet,

    /// The settings file could not be read or parsed.
    #[error("invalid settings file {path}: {reason}")]
    Settings {
        /// Path to the settings file.
        path: String,
        /// Parser or I/O error message.
        reason: String,
    },
}
