//! Shared state handed to every task.
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;

/// Shared context for task execution.
pub struct Context {
    /// Run configuration (CLI flags merged with the settings file).
    pub config: Arc<Config>,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            config,
            platform,
            log,
            dry_run,
            executor,
        }
    }

    /// Root directory of the dotfiles repository.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Directory links are created in.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.config.target
    }

    /// Create a copy of this context with a different logger.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            platform: Arc::clone(&self.platform),
            log,
            dry_run: self.dry_run,
            executor: Arc::clone(&self.executor),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::Logger;
    use crate::tasks::test_helpers::{empty_config, make_linux_context};
    use std::path::PathBuf;

    #[test]
    fn root_and_target_come_from_config() {
        let ctx = make_linux_context(empty_config(PathBuf::from("/dotfiles")));
        assert_eq!(ctx.root(), Path::new("/dotfiles"));
        assert_eq!(ctx.target(), Path::new("/home/test"));
    }

    #[test]
    fn with_log_preserves_other_fields() {
        let ctx = make_linux_context(empty_config(PathBuf::from("/dotfiles")));
        let new_log: Arc<dyn Log> = Arc::new(Logger::new("new"));
        let ctx2 = ctx.with_log(new_log);
        assert_eq!(ctx2.root(), ctx.root());
        assert_eq!(ctx2.dry_run, ctx.dry_run);
        assert_eq!(ctx2.platform, ctx.platform);
    }

    #[test]
    fn debug_format_includes_key_fields() {
        let ctx = make_linux_context(empty_config(PathBuf::from("/dotfiles")));
        let debug = format!("{ctx:?}");
        assert!(debug.contains("Context"));
        assert!(debug.contains("dry_run"));
        assert!(debug.contains("/home/test"));
    }
}
