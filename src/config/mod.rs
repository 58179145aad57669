//! Run configuration: CLI flags merged with the repository settings file.
pub mod settings;
pub mod toml_loader;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::BootstrapOpts;
use crate::error::BootstrapError;
use crate::stow::StowMode;
use settings::{Extra, FrameworkSettings, Settings};

/// Settings file looked up in the repository root.
pub const SETTINGS_FILE: &str = "bootstrap.toml";

/// Everything a bootstrap run needs to know, fixed at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Dotfiles repository root (the stow directory).
    pub root: PathBuf,
    /// Directory links are created in.
    pub target: PathBuf,
    /// The user's home directory, where the shell framework lives.
    pub home: PathBuf,
    /// Requested stow packages, extras included.
    pub packages: Vec<String>,
    /// Shell to install and optionally make the login shell.
    pub shell: String,
    /// Directories under `target` created before previewing.
    pub ensure_dirs: Vec<PathBuf>,
    /// Paths under `target` shown by the verification listing.
    pub verify: Vec<PathBuf>,
    /// Shell framework settings.
    pub framework: FrameworkSettings,
    /// Conditionally linked packages.
    pub extras: Vec<Extra>,
    /// Stow operation for this run.
    pub mode: StowMode,
    /// Whether the shell framework should be installed.
    pub install_framework: bool,
    /// Whether the login shell should be changed.
    pub change_shell: bool,
    /// `$SHELL` at startup.
    pub login_shell: Option<String>,
}

impl Config {
    /// Load the settings file under `root` and merge `opts` over it.
    ///
    /// The target is `--target` when given, otherwise `$HOME`. The home
    /// directory is `$HOME`, falling back to the target when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is malformed or no target
    /// directory can be determined.
    pub fn load(root: &Path, opts: &BootstrapOpts) -> Result<Self> {
        let settings = Settings::load(&root.join(SETTINGS_FILE))?;
        let home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from);
        let target = match (&opts.target, &home) {
            (Some(target), _) => target.clone(),
            (None, Some(home)) => home.clone(),
            (None, None) => return Err(BootstrapError::HomeNotSet.into()),
        };
        let login_shell = std::env::var("SHELL").ok();
        let config = Self::from_parts(
            root.to_path_buf(),
            target,
            settings,
            opts,
            login_shell,
        );
        Ok(match home {
            Some(home) => config.with_home(home),
            None => config,
        })
    }

    /// Merge already-loaded settings with CLI options.
    ///
    /// The home directory starts out equal to `target`.
    #[must_use]
    pub fn from_parts(
        root: PathBuf,
        target: PathBuf,
        settings: Settings,
        opts: &BootstrapOpts,
        login_shell: Option<String>,
    ) -> Self {
        Self {
            root,
            home: target.clone(),
            target,
            packages: opts.package_list().unwrap_or(settings.packages),
            shell: settings.shell,
            ensure_dirs: settings.ensure_dirs.into_iter().map(PathBuf::from).collect(),
            verify: settings.verify.into_iter().map(PathBuf::from).collect(),
            framework: settings.framework,
            extras: settings.extras,
            mode: opts.mode(),
            install_framework: !opts.no_framework,
            change_shell: opts.chsh,
            login_shell,
        }
    }

    /// Use `home` as the home directory.
    #[must_use]
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Whether `package` is handled as a conditional extra.
    #[must_use]
    pub fn is_extra(&self, package: &str) -> bool {
        self.extras.iter().any(|e| e.package == package)
    }

    /// Requested packages that are linked in the main stow invocation.
    #[must_use]
    pub fn main_packages(&self) -> Vec<String> {
        self.packages
            .iter()
            .filter(|p| !self.is_extra(p))
            .cloned()
            .collect()
    }

    /// Extras whose package was requested, in settings order.
    #[must_use]
    pub fn requested_extras(&self) -> Vec<&Extra> {
        self.extras
            .iter()
            .filter(|e| self.packages.contains(&e.package))
            .collect()
    }

    /// Absolute framework installation directory, under the home directory
    /// whatever the link target.
    #[must_use]
    pub fn framework_dir(&self) -> PathBuf {
        self.home.join(&self.framework.dir)
    }
}
