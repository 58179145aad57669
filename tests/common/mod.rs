// Shared helpers for integration tests.
//
// Provides a temporary dotfiles repository plus home directory, a fluent
// builder for populating them, and a `FakeSystem` executor that answers
// `which` from a fixed set and behaves like GNU Stow for `stow` calls.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use dotfiles_bootstrap::cli::BootstrapOpts;
use dotfiles_bootstrap::commands::bootstrap;
use dotfiles_bootstrap::config::Config;
use dotfiles_bootstrap::exec::{ExecResult, Executor};
use dotfiles_bootstrap::logging::Logger;
use dotfiles_bootstrap::platform::Platform;

/// An isolated repository and home directory backed by [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary dotfiles repository.
    pub root: tempfile::TempDir,
    /// Temporary link target standing in for `$HOME`.
    pub home: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create an empty repository (marked by `.git`) and an empty home.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create repo dir");
        std::fs::create_dir(root.path().join(".git")).expect("create .git");
        let home = tempfile::tempdir().expect("create home dir");
        Self { root, home }
    }

    /// Path to the repository root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path to the link target.
    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// Options linking `packages` into the temporary home, framework off.
    pub fn opts(&self, packages: &str) -> BootstrapOpts {
        BootstrapOpts {
            packages: Some(packages.to_string()),
            no_framework: true,
            target: Some(self.home.path().to_path_buf()),
            ..BootstrapOpts::default()
        }
    }

    /// Load configuration from the repository with `opts` applied, using
    /// the temporary home as the home directory.
    pub fn load_config(&self, opts: &BootstrapOpts) -> Config {
        Config::load(self.root.path(), opts)
            .expect("load config")
            .with_home(self.home.path().to_path_buf())
    }

    /// Run a full bootstrap and return the logger holding the task summary.
    pub fn run(
        &self,
        opts: &BootstrapOpts,
        platform: Platform,
        dry_run: bool,
        system: &Arc<FakeSystem>,
    ) -> (Result<()>, Arc<Logger>) {
        self.run_config(self.load_config(opts), platform, dry_run, system)
    }

    /// Run a full bootstrap with an already-built configuration.
    pub fn run_config(
        &self,
        config: Config,
        platform: Platform,
        dry_run: bool,
        system: &Arc<FakeSystem>,
    ) -> (Result<()>, Arc<Logger>) {
        let log = Arc::new(Logger::new("test"));
        let result = bootstrap::run_with(
            config,
            platform,
            dry_run,
            &log,
            Arc::clone(system) as Arc<dyn Executor>,
        );
        (result, log)
    }

    /// Names of `.pre-stow.` backups directly inside `dir` (relative to home).
    pub fn backups_in(&self, dir: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.home.path().join(dir))
            .expect("read home dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .filter(|n| n.contains(".pre-stow."))
            .collect();
        names.sort();
        names
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Add `<package>/<rel>` to the repository.
    pub fn with_package_file(self, package: &str, rel: &str, content: &str) -> Self {
        let path = self.ctx.root.path().join(package).join(rel);
        write_file(&path, content);
        self
    }

    /// Write `bootstrap.toml` in the repository root.
    pub fn with_settings(self, content: &str) -> Self {
        write_file(&self.ctx.root.path().join("bootstrap.toml"), content);
        self
    }

    /// Put a real file at `<home>/<rel>`.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.ctx.home.path().join(rel), content);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// Executor standing in for the host system.
///
/// `which` answers from the registered program set. `stow` invocations are
/// carried out against the real temporary directories; every other program
/// succeeds without doing anything (`curl` prints a placeholder script).
#[derive(Debug, Default)]
pub struct FakeSystem {
    programs: HashSet<String>,
    calls: Mutex<Vec<String>>,
    interactive: Mutex<Vec<String>>,
    envs: Mutex<Vec<Vec<(String, String)>>>,
}

impl FakeSystem {
    /// A system where `programs` are on `PATH`.
    pub fn with_programs(programs: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            programs: programs.iter().map(ToString::to_string).collect(),
            ..Self::default()
        })
    }

    /// Every invocation as `"program arg arg"`, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Invocations attached to the terminal, in order.
    pub fn interactive_calls(&self) -> Vec<String> {
        self.interactive.lock().expect("interactive lock").clone()
    }

    /// Environment overrides passed to each `run_interactive` call.
    pub fn envs(&self) -> Vec<Vec<(String, String)>> {
        self.envs.lock().expect("envs lock").clone()
    }

    /// Invocations of `program`.
    pub fn calls_to(&self, program: &str) -> Vec<String> {
        let prefix = format!("{program} ");
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(&prefix))
            .collect()
    }

    fn record(&self, program: &str, args: &[&str]) {
        self.calls
            .lock()
            .expect("calls lock")
            .push(command_line(program, args));
    }

    fn dispatch(&self, dir: Option<&Path>, program: &str, args: &[&str]) -> ExecResult {
        self.record(program, args);
        match program {
            "stow" => fake_stow(dir.unwrap_or_else(|| Path::new(".")), args),
            "curl" => ok("echo installer\n", ""),
            _ => ok("", ""),
        }
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

fn ok(stdout: &str, stderr: &str) -> ExecResult {
    ExecResult {
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        success: true,
        code: Some(0),
    }
}

fn checked(result: ExecResult) -> Result<ExecResult> {
    if result.success {
        Ok(result)
    } else {
        anyhow::bail!("command failed: {}", result.stderr.trim())
    }
}

impl Executor for FakeSystem {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        checked(self.dispatch(None, program, args))
    }

    fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        self.envs.lock().expect("envs lock").push(
            env.iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        );
        self.interactive
            .lock()
            .expect("interactive lock")
            .push(command_line(program, args));
        Ok(self.dispatch(None, program, args))
    }

    fn run_unchecked_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        Ok(self.dispatch(Some(dir), program, args))
    }

    fn which(&self, program: &str) -> bool {
        self.programs.contains(program)
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.which(program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }
}

/// Files below `dir`, relative to `base`.
fn package_files(base: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            package_files(base, &path, out);
        } else if let Ok(rel) = path.strip_prefix(base) {
            out.push(rel.to_path_buf());
        }
    }
}

/// Link every file of each package individually (no tree folding).
///
/// Like stow, a run with conflicts reports them on stderr, exits non-zero
/// and changes nothing.
fn fake_stow(stow_dir: &Path, args: &[&str]) -> ExecResult {
    let mut simulate = false;
    let mut delete = false;
    let mut target = PathBuf::new();
    let mut packages = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "-n" => simulate = true,
            "-v" | "-R" => {}
            "-D" => delete = true,
            "-t" => target = PathBuf::from(iter.next().copied().unwrap_or_default()),
            pkg => packages.push(pkg.to_string()),
        }
    }

    let mut report = String::new();
    let mut conflicts = Vec::new();
    let mut links = Vec::new();
    let mut unlinks = Vec::new();
    for package in &packages {
        let base = stow_dir.join(package);
        let mut files = Vec::new();
        package_files(&base, &base, &mut files);
        for rel in files {
            let dest = target.join(&rel);
            let meta = dest.symlink_metadata();
            if delete {
                if meta.is_ok_and(|m| m.file_type().is_symlink()) {
                    report.push_str(&format!("UNLINK: {}\n", rel.display()));
                    unlinks.push(dest);
                }
                continue;
            }
            match meta {
                Ok(m) if m.file_type().is_symlink() => {}
                Ok(_) => conflicts.push((base.join(&rel), rel)),
                Err(_) => {
                    report.push_str(&format!(
                        "LINK: {} => {}\n",
                        rel.display(),
                        base.join(&rel).display()
                    ));
                    links.push((base.join(&rel), dest));
                }
            }
        }
    }

    if !conflicts.is_empty() {
        // Top-level conflicts use the stow 2.3 wording, nested ones 2.4.
        for (source, rel) in &conflicts {
            if rel.components().count() == 1 {
                report.push_str(&format!(
                    "  * existing target is neither a link nor a directory: {}\n",
                    rel.display()
                ));
            } else {
                report.push_str(&format!(
                    "  * cannot stow {} over existing target {} since neither a link nor a \
                     directory and --adopt not specified\n",
                    source.display(),
                    rel.display()
                ));
            }
        }
        return ExecResult {
            stdout: String::new(),
            stderr: report,
            success: false,
            code: Some(1),
        };
    }

    if !simulate {
        for (source, dest) in links {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent).expect("create link parent");
            }
            std::os::unix::fs::symlink(source, dest).expect("create link");
        }
        for dest in unlinks {
            std::fs::remove_file(dest).expect("remove link");
        }
    }
    ok("", &report)
}
