//! Login shell resource.
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::error::ResourceError;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// System allow-list consulted by `chsh`.
pub const SHELLS_FILE: &str = "/etc/shells";

/// A resource for configuring the default login shell.
#[derive(Debug)]
pub struct DefaultShellResource<'a> {
    /// Target shell name (e.g., "zsh").
    shell_name: String,
    /// Resolved absolute path of the target shell.
    shell_path: PathBuf,
    /// Value of `$SHELL` captured at startup.
    current: Option<String>,
    /// Executor for running system commands.
    executor: &'a dyn Executor,
}

impl<'a> DefaultShellResource<'a> {
    /// Create a new default shell resource.
    #[must_use]
    pub const fn new(
        shell_name: String,
        shell_path: PathBuf,
        current: Option<String>,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            shell_name,
            shell_path,
            current,
            executor,
        }
    }

    /// Resolved path of the target shell.
    #[must_use]
    pub fn shell_path(&self) -> &Path {
        &self.shell_path
    }
}

impl Applicable for DefaultShellResource<'_> {
    fn description(&self) -> String {
        format!("default shell → {}", self.shell_name)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let path = self.shell_path.to_string_lossy();
        let result = self.executor.run_interactive("chsh", &["-s", &path], &[])?;
        if !result.success {
            return Err(ResourceError::ExecutionFailed {
                program: "chsh".to_string(),
                exit_code: result.code.unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
            }
            .into());
        }
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DefaultShellResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let current = self.current.as_deref().unwrap_or_default();
        if current.is_empty() {
            return Ok(ResourceState::Missing);
        }
        let current_path = Path::new(current);
        let same_path = current_path == self.shell_path;
        let same_name = current_path
            .file_name()
            .is_some_and(|name| name == self.shell_name.as_str());
        if same_path || same_name {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: current.to_string(),
            })
        }
    }
}

/// Whether `path` appears as a line of the `/etc/shells` contents.
#[must_use]
pub fn shells_file_lists(contents: &str, path: &Path) -> bool {
    contents
        .lines()
        .map(str::trim)
        .any(|line| Path::new(line) == path)
}

/// Append `path` to `/etc/shells` through `sudo`.
///
/// # Errors
///
/// Returns an error if the privileged append fails.
pub fn register_shell(path: &Path, executor: &dyn Executor) -> Result<()> {
    let script = format!("echo '{}' >> {SHELLS_FILE}", path.display());
    executor
        .run_interactive("sudo", &["sh", "-c", &script], &[])?
        .checked("sudo")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;

    fn resource<'a>(current: Option<&str>, executor: &'a MockExecutor) -> DefaultShellResource<'a> {
        DefaultShellResource::new(
            "zsh".to_string(),
            PathBuf::from("/usr/bin/zsh"),
            current.map(String::from),
            executor,
        )
    }

    #[test]
    fn description_includes_shell_name() {
        let executor = MockExecutor::with_responses(vec![]);
        assert_eq!(
            resource(None, &executor).description(),
            "default shell → zsh"
        );
    }

    #[test]
    fn correct_when_path_matches() {
        let executor = MockExecutor::with_responses(vec![]);
        let state = resource(Some("/usr/bin/zsh"), &executor)
            .current_state()
            .unwrap();
        assert_eq!(state, ResourceState::Correct);
    }

    #[test]
    fn correct_when_file_name_matches_other_path() {
        let executor = MockExecutor::with_responses(vec![]);
        let state = resource(Some("/opt/homebrew/bin/zsh"), &executor)
            .current_state()
            .unwrap();
        assert_eq!(state, ResourceState::Correct);
    }

    #[test]
    fn incorrect_when_different_shell_set() {
        let executor = MockExecutor::with_responses(vec![]);
        let state = resource(Some("/bin/bash"), &executor)
            .current_state()
            .unwrap();
        assert!(
            matches!(state, ResourceState::Incorrect { ref current } if current == "/bin/bash"),
            "expected Incorrect(/bin/bash), got {state:?}"
        );
    }

    #[test]
    fn missing_when_shell_unset() {
        let executor = MockExecutor::with_responses(vec![]);
        assert_eq!(
            resource(None, &executor).current_state().unwrap(),
            ResourceState::Missing
        );
        assert_eq!(
            resource(Some(""), &executor).current_state().unwrap(),
            ResourceState::Missing
        );
    }

    #[test]
    fn apply_runs_chsh_with_resolved_path() {
        let executor = MockExecutor::ok("");
        let change = resource(Some("/bin/bash"), &executor).apply().unwrap();
        assert_eq!(change, ResourceChange::Applied);
        assert_eq!(executor.interactive_calls(), vec!["chsh -s /usr/bin/zsh"]);
    }

    #[test]
    fn apply_propagates_chsh_failure() {
        let executor = MockExecutor::fail();
        let err = resource(Some("/bin/bash"), &executor).apply().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResourceError>(),
            Some(ResourceError::ExecutionFailed { program, exit_code: 1, .. }) if program == "chsh"
        ));
    }

    #[test]
    fn shells_file_lookup_matches_whole_lines() {
        let contents = "# /etc/shells\n/bin/bash\n/bin/zsh\n";
        assert!(shells_file_lists(contents, Path::new("/bin/zsh")));
        assert!(!shells_file_lists(contents, Path::new("/opt/homebrew/bin/zsh")));
        assert!(!shells_file_lists(contents, Path::new("/bin/zs")));
    }

    #[test]
    fn register_shell_appends_through_sudo() {
        let executor = MockExecutor::ok("");
        register_shell(Path::new("/opt/homebrew/bin/zsh"), &executor).unwrap();
        assert_eq!(executor.interactive_calls(), vec![
            "sudo sh -c echo '/opt/homebrew/bin/zsh' >> /etc/shells"
        ]);
    }

    #[test]
    fn register_shell_failure_is_error() {
        let executor = MockExecutor::fail();
        assert!(register_shell(Path::new("/opt/homebrew/bin/zsh"), &executor).is_err());
    }
}
