use crate::error::Result;
use crate::git::{CommandOutcome, CommandRunner, GitRunner};
use std::cell::RefCell;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

pub(crate) fn create_test_repo() -> TempDir {
    create_repo(CreateRepoOptions {
        trunk: "main",
        commits: 1,
        add_origin_remote: false,
    })
}

pub(crate) fn create_test_repo_on(trunk: &str) -> TempDir {
    create_repo(CreateRepoOptions {
        trunk,
        commits: 1,
        add_origin_remote: false,
    })
}

pub(crate) fn create_test_repo_with_remote() -> TempDir {
    create_repo(CreateRepoOptions {
        trunk: "main",
        commits: 2,
        add_origin_remote: true,
    })
}

struct CreateRepoOptions<'a> {
    trunk: &'a str,
    commits: usize,
    add_origin_remote: bool,
}

fn create_repo(opts: CreateRepoOptions<'_>) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init"]);
    // Deterministic trunk name across environments: point HEAD at an unborn branch.
    git(path, &["symbolic-ref", "HEAD", &format!("refs/heads/{}", opts.trunk)]);

    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    for i in 2..=opts.commits {
        std::fs::write(path.join(format!("file{}.txt", i)), format!("File {}\n", i)).unwrap();
        git(path, &["add", "."]);
        git(path, &["commit", "-m", &format!("Commit {}", i)]);
    }

    if opts.add_origin_remote {
        // Remote pointing at the repo itself, so fetch works offline.
        let path_str = path.to_string_lossy().to_string();
        git(path, &["remote", "add", "origin", &path_str]);
    }

    temp_dir
}

/// Run git directly for fixture setup, panicking on failure.
pub(crate) fn git(repo_dir: &Path, args: &[&str]) {
    git_stdout(repo_dir, args);
}

/// Run git directly and return trimmed stdout, panicking on failure.
pub(crate) fn git_stdout(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A runner for the git found on PATH.
pub(crate) fn system_git() -> GitRunner {
    GitRunner::new(which::which("git").expect("git must be on PATH for tests"))
}

enum Script {
    Fail,
    Stdout(String),
}

/// Runner that records every command and can replace chosen commands with
/// a scripted outcome instead of running them.
///
/// Commands without a matching rule run against the real git.
pub(crate) struct ScriptedRunner {
    inner: GitRunner,
    rules: Vec<(Vec<String>, Script)>,
    log: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::wrapping(system_git())
    }

    pub(crate) fn wrapping(inner: GitRunner) -> Self {
        Self {
            inner,
            rules: Vec::new(),
            log: RefCell::new(Vec::new()),
        }
    }

    /// Fail (exit 1) every command whose arguments start with `prefix`.
    pub(crate) fn fail_on(mut self, prefix: &[&str]) -> Self {
        self.rules.push((to_strings(prefix), Script::Fail));
        self
    }

    /// Succeed with `stdout` for every command whose arguments start with `prefix`.
    pub(crate) fn stdout_on(mut self, prefix: &[&str], stdout: &str) -> Self {
        self.rules
            .push((to_strings(prefix), Script::Stdout(stdout.to_string())));
        self
    }

    /// Every command seen, as space-joined arguments.
    pub(crate) fn commands(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Whether any recorded command contains `needle`.
    pub(crate) fn ran_any(&self, needle: &str) -> bool {
        self.log.borrow().iter().any(|c| c.contains(needle))
    }

    /// Whether any recorded command starts with `prefix`.
    pub(crate) fn ran_prefix(&self, prefix: &str) -> bool {
        self.log
            .borrow()
            .iter()
            .any(|c| c == prefix || c.starts_with(&format!("{} ", prefix)))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, cwd: &Path, args: &[&str]) -> Result<CommandOutcome> {
        self.log.borrow_mut().push(args.join(" "));

        let rule = self
            .rules
            .iter()
            .find(|(prefix, _)| args.len() >= prefix.len() && prefix.iter().zip(args).all(|(p, a)| p == a));

        match rule {
            Some((_, Script::Fail)) => Ok(CommandOutcome {
                args: to_strings(args),
                exit_code: Some(1),
                stdout: String::new(),
                stderr: "injected failure".to_string(),
                timed_out: false,
            }),
            Some((_, Script::Stdout(stdout))) => Ok(CommandOutcome {
                args: to_strings(args),
                exit_code: Some(0),
                stdout: stdout.clone(),
                stderr: String::new(),
                timed_out: false,
            }),
            None => self.inner.run(cwd, args),
        }
    }
}

fn to_strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}
