//! Prerequisite tool installation through the OS package manager.
use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::BootstrapError;
use crate::exec::Executor;
use crate::platform::{Os, Platform};

/// Official Homebrew installer, used when `brew` itself is missing on macOS.
pub const HOMEBREW_INSTALL_SCRIPT: &str =
    "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Homebrew (macOS).
    Brew,
    /// Debian/Ubuntu apt.
    Apt,
    /// Fedora dnf.
    Dnf,
    /// Arch Linux pacman.
    Pacman,
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brew => write!(f, "brew"),
            Self::Apt => write!(f, "apt"),
            Self::Dnf => write!(f, "dnf"),
            Self::Pacman => write!(f, "pacman"),
        }
    }
}

/// Linux package managers in detection order.
const LINUX_MANAGERS: [PackageManager; 3] = [
    PackageManager::Apt,
    PackageManager::Dnf,
    PackageManager::Pacman,
];

impl PackageManager {
    /// Pick the package manager used to install `tool` on this platform.
    ///
    /// macOS always uses Homebrew (whether or not `brew` is installed yet);
    /// Linux uses the first of apt, dnf and pacman found on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::NoPackageManager`] on Linux when none of the
    /// supported managers is available, and [`BootstrapError::UnsupportedOs`]
    /// on any other OS.
    pub fn detect(
        tool: &str,
        platform: &Platform,
        executor: &dyn Executor,
    ) -> Result<Self, BootstrapError> {
        match platform.os {
            Os::Darwin => Ok(Self::Brew),
            Os::Linux => LINUX_MANAGERS
                .into_iter()
                .find(|m| executor.which(m.binary()))
                .ok_or_else(|| BootstrapError::NoPackageManager {
                    tool: tool.to_string(),
                }),
            Os::Other => Err(BootstrapError::UnsupportedOs {
                tool: tool.to_string(),
                os: platform.os,
            }),
        }
    }

    /// Executable looked up on `PATH` for this manager.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Brew => "brew",
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
        }
    }

    /// Commands that install `tool`, in execution order.
    ///
    /// Each entry is `(program, args)`. apt refreshes its index first.
    #[must_use]
    pub fn install_commands(self, tool: &str) -> Vec<(&'static str, Vec<String>)> {
        let args = |parts: &[&str]| -> Vec<String> {
            parts
                .iter()
                .map(ToString::to_string)
                .chain(std::iter::once(tool.to_string()))
                .collect()
        };
        match self {
            Self::Brew => vec![("brew", args(&["install"]))],
            Self::Apt => vec![
                ("sudo", vec!["apt".to_string(), "update".to_string()]),
                ("sudo", args(&["apt", "install", "-y"])),
            ],
            Self::Dnf => vec![("sudo", args(&["dnf", "install", "-y"]))],
            Self::Pacman => vec![("sudo", args(&["pacman", "-S", "--noconfirm"]))],
        }
    }
}

/// A command-line tool that must be present on `PATH`.
///
/// The package manager is only detected when an install is needed.
#[derive(Debug)]
pub struct ToolResource<'a> {
    /// Executable name, also used as the package name.
    pub tool: String,
    platform: Platform,
    executor: &'a dyn Executor,
}

impl<'a> ToolResource<'a> {
    /// Create a new tool resource.
    #[must_use]
    pub const fn new(tool: String, platform: Platform, executor: &'a dyn Executor) -> Self {
        Self {
            tool,
            platform,
            executor,
        }
    }

    /// Package manager that would install this tool.
    ///
    /// # Errors
    ///
    /// Propagates [`PackageManager::detect`] failures.
    pub fn manager(&self) -> Result<PackageManager, BootstrapError> {
        PackageManager::detect(&self.tool, &self.platform, self.executor)
    }
}

impl Applicable for ToolResource<'_> {
    fn description(&self) -> String {
        self.tool.clone()
    }

    fn apply(&self) -> Result<ResourceChange> {
        let manager = self.manager()?;
        for (program, args) in manager.install_commands(&self.tool) {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            self.executor
                .run_interactive(program, &args, &[])
                .and_then(|result| result.checked(program))
                .map_err(|e| BootstrapError::InstallFailed {
                    tool: self.tool.clone(),
                    manager: manager.to_string(),
                    reason: format!("{e:#}"),
                })?;
        }
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ToolResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.executor.which(&self.tool) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
