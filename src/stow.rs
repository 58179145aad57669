//! GNU Stow command construction and preview-output parsing.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Stow 2.3 conflict message prefix for a real file blocking a link.
const CONFLICT_MARKER: &str = "existing target is neither a link nor a directory:";

/// Stow 2.4 conflict wording: `cannot stow <src> over existing target <rel> since …`.
const CONFLICT_OVER: &str = "over existing target ";
const CONFLICT_SINCE: &str = " since ";

/// Which stow operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StowMode {
    /// Create links (`stow`).
    #[default]
    Stow,
    /// Remove and recreate links (`stow -R`).
    Restow,
    /// Remove links (`stow -D`).
    Unstow,
}

impl StowMode {
    /// Mode flag passed to stow, if any.
    #[must_use]
    pub const fn flag(self) -> Option<&'static str> {
        match self {
            Self::Stow => None,
            Self::Restow => Some("-R"),
            Self::Unstow => Some("-D"),
        }
    }

    /// Whether conflicting files must be backed up before running.
    #[must_use]
    pub const fn backs_up(self) -> bool {
        matches!(self, Self::Stow | Self::Restow)
    }

    /// Progressive verb for log messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Stow => "Stowing",
            Self::Restow => "Re-stowing",
            Self::Unstow => "Unstowing",
        }
    }
}

impl std::fmt::Display for StowMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stow => write!(f, "stow"),
            Self::Restow => write!(f, "restow"),
            Self::Unstow => write!(f, "unstow"),
        }
    }
}

/// Build the argument list for a stow invocation.
///
/// Produces `<mode-flag> [-n -v] -t <target> <packages…>`.
#[must_use]
pub fn stow_args(mode: StowMode, dry_run: bool, target: &Path, packages: &[String]) -> Vec<String> {
    let mut args = Vec::with_capacity(packages.len() + 5);
    if let Some(flag) = mode.flag() {
        args.push(flag.to_string());
    }
    if dry_run {
        args.push("-n".to_string());
        args.push("-v".to_string());
    }
    args.push("-t".to_string());
    args.push(target.display().to_string());
    args.extend(packages.iter().cloned());
    args
}

/// Build the argument list for the conflict preview of a single package.
#[must_use]
pub fn preview_args(target: &Path, package: &str) -> Vec<String> {
    vec![
        "-n".to_string(),
        "-v".to_string(),
        "-t".to_string(),
        target.display().to_string(),
        package.to_string(),
    ]
}

/// Extract the target paths stow plans to link from its preview output.
///
/// Recognises three line shapes:
///
/// - `LINK: <rel> => <source>` (stow's own format), resolved against `target`;
/// - `LINK: <rel> -> <abs>` / `RELINK: …` whose last token is absolute;
/// - `… existing target is neither a link nor a directory: <rel>` (stow 2.3)
///   and `cannot stow <src> over existing target <rel> since …` (stow 2.4),
///   both resolved against `target`.
///
/// Anything else is ignored. Duplicates collapse.
#[must_use]
pub fn parse_link_plan(raw: &str, target: &Path) -> BTreeSet<PathBuf> {
    let mut paths = BTreeSet::new();
    for line in raw.lines() {
        let line = line.trim();
        if let Some(rest) = line
            .strip_prefix("LINK:")
            .or_else(|| line.strip_prefix("RELINK:"))
        {
            // `=>` points at the package source, never at the target.
            if let Some((rel, _)) = rest.split_once("=>") {
                let rel = rel.trim();
                if !rel.is_empty() {
                    paths.insert(target.join(rel));
                }
            } else if let Some(last) = rest.split_whitespace().last()
                && Path::new(last).is_absolute()
            {
                paths.insert(PathBuf::from(last));
            }
        } else if let Some(rel) = conflict_target(line) {
            paths.insert(target.join(rel));
        }
    }
    paths
}

/// Relative target named by a stow conflict line, in either wording.
fn conflict_target(line: &str) -> Option<&str> {
    let rel = if let Some((_, rel)) = line.split_once(CONFLICT_MARKER) {
        rel.trim()
    } else {
        let (_, rest) = line.split_once(CONFLICT_OVER)?;
        let (rel, _) = rest.split_once(CONFLICT_SINCE)?;
        rel.trim()
    };
    (!rel.is_empty()).then_some(rel)
}
