//! Shell framework (Oh My Zsh) installation resource.
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Environment passed to the framework installer so it keeps an existing
/// `.zshrc`, does not launch a shell and does not run `chsh` itself.
///
/// `ZSH` is added per install so the installer writes to the directory
/// whose presence is checked.
pub const INSTALLER_ENV: [(&str, &str); 3] =
    [("KEEP_ZSHRC", "yes"), ("RUNZSH", "no"), ("CHSH", "no")];

/// Download the script at `url` with curl and return its contents.
///
/// # Errors
///
/// Returns an error if curl cannot be run or the download fails.
pub fn fetch_script(url: &str, executor: &dyn Executor) -> Result<String> {
    let result = executor
        .run("curl", &["-fsSL", url])
        .with_context(|| format!("downloading {url}"))?;
    Ok(result.stdout)
}

/// A shell framework installed into a directory under the home directory.
#[derive(Debug)]
pub struct FrameworkResource<'a> {
    /// Display name (e.g., "Oh My Zsh").
    pub name: String,
    /// Installation directory; its presence means the framework is installed.
    pub dir: PathBuf,
    /// URL of the installer script.
    pub install_url: String,
    executor: &'a dyn Executor,
}

impl<'a> FrameworkResource<'a> {
    /// Create a new framework resource.
    #[must_use]
    pub const fn new(
        name: String,
        dir: PathBuf,
        install_url: String,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            name,
            dir,
            install_url,
            executor,
        }
    }
}

impl Applicable for FrameworkResource<'_> {
    fn description(&self) -> String {
        format!("{} ({})", self.name, self.dir.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let script = fetch_script(&self.install_url, self.executor)?;
        let dir = self.dir.to_string_lossy();
        let mut env: Vec<(&str, &str)> = INSTALLER_ENV.to_vec();
        env.push(("ZSH", &*dir));
        self.executor
            .run_interactive("sh", &["-c", &script], &env)
            .and_then(|result| result.checked("sh"))
            .with_context(|| format!("running {} installer", self.name))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for FrameworkResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.dir.is_dir() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
