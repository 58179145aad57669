//! External command execution behind an injectable [`Executor`].
use anyhow::{Context as _, Result, bail};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// Standard output followed by standard error.
    ///
    /// Stow reports its plan on stderr, so preview parsing needs both.
    #[must_use]
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.clone();
        if !out.is_empty() && !out.ends_with('\n') && !self.stderr.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.stderr);
        out
    }

    /// Turn a non-zero exit into an error labelled with `label`.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the exit code and trimmed stderr when the
    /// process did not succeed.
    pub fn checked(self, label: &str) -> Result<Self> {
        if !self.success {
            let stderr = self.stderr.trim();
            if stderr.is_empty() {
                bail!("{label} failed (exit {})", self.code.unwrap_or(-1));
            }
            bail!("{label} failed (exit {}): {stderr}", self.code.unwrap_or(-1));
        }
        Ok(self)
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over process execution and `PATH` lookup.
///
/// Production code uses [`SystemExecutor`]; tests substitute scripted
/// executors so no real package manager or stow is ever invoked.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command with captured output, failing on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command in `dir` with captured output, returning the result
    /// even on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error only if the command cannot be spawned.
    fn run_unchecked_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command attached to the terminal, with extra environment
    /// variables, returning the result even on non-zero exit.
    ///
    /// Standard input, output and error are inherited so password prompts
    /// and installer progress reach the user. The returned `stdout` and
    /// `stderr` are always empty.
    ///
    /// # Errors
    ///
    /// Returns an error only if the command cannot be spawned.
    fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult>;

    /// Check whether `program` is available on `PATH`.
    fn which(&self, program: &str) -> bool;

    /// Resolve `program` to its absolute path on `PATH`.
    fn resolve(&self, program: &str) -> Option<PathBuf>;
}

/// [`Executor`] backed by [`std::process::Command`] and the `which` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

/// Execute a command and return the result regardless of exit status.
fn execute_unchecked(mut cmd: Command, label: &str) -> Result<ExecResult> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to execute: {label}"))?;
    Ok(ExecResult::from(output))
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        execute_unchecked(cmd, program)?.checked(program)
    }

    fn run_unchecked_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(dir);
        execute_unchecked(cmd, &format!("{program} in {}", dir.display()))
    }

    fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(env.iter().copied())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: status.success(),
            code: status.code(),
        })
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}
