//! Repository settings file (`bootstrap.toml`).
use serde::Deserialize;
use std::path::Path;

use super::toml_loader::load_config;
use crate::error::BootstrapError;

/// Packages linked when neither `--packages` nor the settings file names any.
pub const DEFAULT_PACKAGES: [&str; 4] = ["zsh", "nvim", "git", "alacritty"];

/// Paths (relative to the target) listed after a successful run.
pub const DEFAULT_VERIFY: [&str; 6] = [
    ".zshrc",
    ".gitconfig",
    ".config/nvim",
    ".config/alacritty",
    ".config/hypr",
    ".config/waybar",
];

/// Repository-level settings. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Stow packages linked by default.
    pub packages: Vec<String>,
    /// Shell installed as a prerequisite and used by `--chsh`.
    pub shell: String,
    /// Directories under the target created before previewing.
    pub ensure_dirs: Vec<String>,
    /// Paths under the target shown in the verification listing.
    pub verify: Vec<String>,
    /// Shell framework installed after the prerequisites.
    pub framework: FrameworkSettings,
    /// Packages linked only when their prerequisites are met.
    pub extras: Vec<Extra>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            packages: DEFAULT_PACKAGES.iter().map(ToString::to_string).collect(),
            shell: "zsh".to_string(),
            ensure_dirs: vec![".config".to_string()],
            verify: DEFAULT_VERIFY.iter().map(ToString::to_string).collect(),
            framework: FrameworkSettings::default(),
            extras: vec![Extra::new("hypr", "hyprctl"), Extra::new("waybar", "waybar")],
        }
    }
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Settings`] if the file cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, BootstrapError> {
        load_config(path).map_err(|e| BootstrapError::Settings {
            path: path.display().to_string(),
            reason: format!("{e:#}"),
        })
    }
}

/// Shell framework installation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameworkSettings {
    /// Display name.
    pub name: String,
    /// Installation directory relative to the target.
    pub dir: String,
    /// Installer script URL.
    pub install_url: String,
}

impl Default for FrameworkSettings {
    fn default() -> Self {
        Self {
            name: "Oh My Zsh".to_string(),
            dir: ".oh-my-zsh".to_string(),
            install_url: "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh"
                .to_string(),
        }
    }
}

/// A package linked only on Linux when `requires` is on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Extra {
    /// Stow package name.
    pub package: String,
    /// Sentinel executable that must be on `PATH`.
    pub requires: String,
}

impl Extra {
    /// Create an extra package entry.
    #[must_use]
    pub fn new(package: &str, requires: &str) -> Self {
        Self {
            package: package.to_string(),
            requires: requires.to_string(),
        }
    }
}
