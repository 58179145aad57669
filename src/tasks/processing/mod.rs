//! Generic resource processing loop: check state, apply, collect stats.
//!
//! Single-resource handling lives in [`apply`].

mod apply;

use anyhow::Result;

use super::Context;
use crate::resources::Resource;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("no packages to link".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task was skipped (nothing to do, or a best-effort step failed).
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

impl TaskResult {
    /// `DryRun` in dry-run mode, `Ok` otherwise.
    #[must_use]
    pub const fn done(ctx: &Context) -> Self {
        if ctx.dry_run { Self::DryRun } else { Self::Ok }
    }
}

/// Counters for batch steps that process many items.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::tasks::TaskStats;
///
/// let mut stats = TaskStats::new();
/// stats.changed = 3;
/// stats.already_ok = 10;
///
/// assert_eq!(stats.summary(false), "3 changed, 10 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 10 already ok");
/// ```
///
/// When items are skipped, the summary includes the count:
///
/// ```
/// use dotfiles_bootstrap::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 3 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 skipped");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items skipped due to errors or inapplicability.
    pub skipped: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        if self.skipped > 0 {
            format!(
                "{} {verb}, {} already ok, {} skipped",
                self.changed, self.already_ok, self.skipped
            )
        } else {
            format!("{} {verb}, {} already ok", self.changed, self.already_ok)
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
    }
}

/// Configuration for the generic resource processing loop.
///
/// Every `Missing` or `Incorrect` resource is applied; `bail_on_error`
/// decides whether an apply failure stops the loop.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::tasks::ProcessOpts;
///
/// // Bail on errors (strict):
/// let opts = ProcessOpts::apply_all("install");
/// assert!(opts.bail_on_error);
///
/// // Warn on errors (lenient):
/// let opts = ProcessOpts::apply_all("back up").no_bail();
/// assert!(!opts.bail_on_error);
/// ```
#[derive(Debug)]
pub struct ProcessOpts<'a> {
    /// Verb for log messages (e.g., "install", "back up").
    pub verb: &'a str,
    /// Propagate errors from `apply()` (bail). If `false`, warn and count as skipped.
    pub bail_on_error: bool,
}

impl<'a> ProcessOpts<'a> {
    /// Fix both missing and incorrect resources, bailing on errors.
    #[must_use]
    pub const fn apply_all(verb: &'a str) -> Self {
        Self {
            verb,
            bail_on_error: true,
        }
    }

    /// Warn on errors instead of bailing.
    #[must_use]
    pub const fn no_bail(mut self) -> Self {
        self.bail_on_error = false;
        self
    }
}

/// Process resources in order by checking each one's current state and
/// applying as needed.
///
/// # Errors
///
/// Returns an error if any resource fails to check its state, or fails to
/// apply while `bail_on_error` is set. With `bail_on_error` unset, apply
/// failures are logged as warnings and counted as skipped.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let mut stats = TaskStats::new();
    for resource in resources {
        let current = resource.current_state()?;
        stats += apply::process_single(ctx, &resource, current, opts)?;
    }
    Ok(stats)
}
