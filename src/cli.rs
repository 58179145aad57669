//! Command-line arguments.
use clap::{Args, Parser};
use std::path::PathBuf;

use crate::stow::StowMode;

/// Command-line entry point for the dotfiles bootstrap tool.
#[derive(Parser, Debug)]
#[command(
    name = "bootstrap",
    about = "Install prerequisites, set up the shell and link dotfiles with GNU Stow",
    version
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Options that affect every step.
    #[command(flatten)]
    pub global: GlobalOpts,

    /// What to install and link.
    #[command(flatten)]
    pub opts: BootstrapOpts,
}

/// Options that affect every step.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Override dotfiles root directory
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// Options selecting what the bootstrap does.
#[derive(Args, Debug, Clone, Default)]
pub struct BootstrapOpts {
    /// Skip installing the shell framework (Oh My Zsh)
    #[arg(long, alias = "no-ohmyzsh")]
    pub no_framework: bool,

    /// Change the default login shell
    #[arg(long)]
    pub chsh: bool,

    /// Space-separated list of stow packages to link
    #[arg(long, value_name = "\"a b c\"")]
    pub packages: Option<String>,

    /// Remove symlinks for the selected packages
    #[arg(long, conflicts_with = "restow")]
    pub unstow: bool,

    /// Re-link (stow -R) the selected packages
    #[arg(long)]
    pub restow: bool,

    /// Directory to link into (defaults to $HOME)
    #[arg(long)]
    pub target: Option<PathBuf>,
}

impl BootstrapOpts {
    /// Stow mode selected by `--unstow` / `--restow`.
    #[must_use]
    pub const fn mode(&self) -> StowMode {
        if self.unstow {
            StowMode::Unstow
        } else if self.restow {
            StowMode::Restow
        } else {
            StowMode::Stow
        }
    }

    /// Package override from `--packages`; blank input means no override.
    #[must_use]
    pub fn package_list(&self) -> Option<Vec<String>> {
        let packages: Vec<String> = self
            .packages
            .as_deref()?
            .split_whitespace()
            .map(String::from)
            .collect();
        (!packages.is_empty()).then_some(packages)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["bootstrap"]);
        assert!(!cli.verbose);
        assert!(!cli.global.dry_run);
        assert!(!cli.opts.chsh);
        assert!(!cli.opts.no_framework);
        assert_eq!(cli.opts.mode(), StowMode::Stow);
        assert_eq!(cli.opts.package_list(), None);
    }

    #[test]
    fn parse_dry_run_short() {
        let cli = Cli::parse_from(["bootstrap", "-d"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_packages_split_on_whitespace() {
        let cli = Cli::parse_from(["bootstrap", "--packages", "zsh  git\tnvim"]);
        assert_eq!(
            cli.opts.package_list(),
            Some(vec!["zsh".to_string(), "git".to_string(), "nvim".to_string()])
        );
    }

    #[test]
    fn blank_packages_fall_back_to_defaults() {
        let cli = Cli::parse_from(["bootstrap", "--packages", "  "]);
        assert_eq!(cli.opts.package_list(), None);
    }

    #[test]
    fn no_ohmyzsh_alias() {
        let cli = Cli::parse_from(["bootstrap", "--no-ohmyzsh"]);
        assert!(cli.opts.no_framework);
        let cli = Cli::parse_from(["bootstrap", "--no-framework"]);
        assert!(cli.opts.no_framework);
    }

    #[test]
    fn modes() {
        let cli = Cli::parse_from(["bootstrap", "--restow"]);
        assert_eq!(cli.opts.mode(), StowMode::Restow);
        let cli = Cli::parse_from(["bootstrap", "--unstow"]);
        assert_eq!(cli.opts.mode(), StowMode::Unstow);
    }

    #[test]
    fn unstow_and_restow_conflict() {
        let result = Cli::try_parse_from(["bootstrap", "--unstow", "--restow"]);
        assert!(result.is_err(), "--unstow and --restow are exclusive");
    }

    #[test]
    fn parse_root_and_target() {
        let cli = Cli::parse_from([
            "bootstrap",
            "--root",
            "/srv/dotfiles",
            "--target",
            "/tmp/home",
            "--chsh",
            "-v",
        ]);
        assert_eq!(cli.global.root, Some(PathBuf::from("/srv/dotfiles")));
        assert_eq!(cli.opts.target, Some(PathBuf::from("/tmp/home")));
        assert!(cli.opts.chsh);
        assert!(cli.verbose);
    }
}
