//! Git command runner for trunk-reset.
//!
//! Every git invocation goes through a [`CommandRunner`]. A non-zero exit is
//! not an error here: it is reported through [`CommandOutcome`] so each step
//! can decide whether the failure is fatal. Only a failure to launch the
//! executable at all is raised, as [`ResetError::ToolUnavailable`].

use crate::error::{ResetError, Result};
use std::io::Read;
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long to wait for output pipes once the process itself is gone.
const PIPE_GRACE: Duration = Duration::from_millis(500);

/// Result of one git command invocation.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Arguments passed to git (without the executable).
    pub args: Vec<String>,
    /// Exit code, or `None` if the process was killed or ended by a signal.
    pub exit_code: Option<i32>,
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
    /// Whether the process was killed because it exceeded the timeout.
    pub timed_out: bool,
}

impl CommandOutcome {
    fn from_output(args: &[&str], output: &Output) -> Self {
        Self {
            args: args.iter().map(|a| a.to_string()).collect(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            timed_out: false,
        }
    }

    /// True when the command exited with code 0.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Returns stdout lines as a vector.
    pub fn lines(&self) -> Vec<&str> {
        if self.stdout.is_empty() {
            Vec::new()
        } else {
            self.stdout.lines().collect()
        }
    }

    /// The command as it would be typed, e.g. `git reset --hard HEAD`.
    pub fn command_line(&self) -> String {
        format!("git {}", shell_words::join(&self.args))
    }

    /// Short description of a failure for warnings and report details.
    pub fn failure_summary(&self) -> String {
        let reason = if self.timed_out {
            "timed out".to_string()
        } else {
            match self.exit_code {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            }
        };
        let message = if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        if message.is_empty() {
            format!("`{}` failed ({})", self.command_line(), reason)
        } else {
            format!("`{}` failed ({}): {}", self.command_line(), reason, message)
        }
    }
}

/// Executes git commands against a working directory.
///
/// The reset steps depend on this trait rather than on [`GitRunner`] so
/// sequencing can be observed in tests.
pub trait CommandRunner {
    /// Run `git <args>` in `cwd` and wait for it to finish.
    ///
    /// # Returns
    ///
    /// * `Ok(CommandOutcome)` - The command ran, whatever its exit code
    /// * `Err(ResetError::ToolUnavailable)` - The executable could not be launched
    fn run(&self, cwd: &Path, args: &[&str]) -> Result<CommandOutcome>;
}

/// Runs a located git executable as a child process.
#[derive(Debug, Clone)]
pub struct GitRunner {
    executable: PathBuf,
    timeout: Option<Duration>,
}

impl GitRunner {
    /// Create a runner for the given git executable.
    pub fn new<P: Into<PathBuf>>(executable: P) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
        }
    }

    /// Kill any command that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path of the executable this runner launches.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Check that the executable launches and answers `--version`.
    pub fn probe(&self) -> Result<String> {
        let output = Command::new(&self.executable)
            .arg("--version")
            .output()
            .map_err(|e| self.launch_error(e))?;

        if !output.status.success() {
            return Err(ResetError::ToolUnavailable(format!(
                "'{}' --version exited with {:?}",
                self.executable.display(),
                output.status.code()
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(executable = %self.executable.display(), %version, "git executable probed");
        Ok(version)
    }

    fn command(&self, cwd: &Path, args: &[&str]) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .current_dir(cwd)
            .args(args)
            // Outcome classification matches git's untranslated messages.
            .env("LC_ALL", "C")
            // A credential prompt would stall the run forever.
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        command
    }

    fn launch_error(&self, e: std::io::Error) -> ResetError {
        ResetError::ToolUnavailable(format!(
            "failed to launch '{}': {} (is git installed?)",
            self.executable.display(),
            e
        ))
    }

    fn run_with_timeout(
        &self,
        cwd: &Path,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutcome> {
        let mut command = self.command(cwd, args);
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        // Own process group, so helpers such as ssh or git-remote-https are
        // killed along with git.
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|e| self.launch_error(e))?;

        // Drain both pipes while waiting so a chatty command cannot block on a full pipe.
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let (exit_code, timed_out) = wait_with_timeout(&mut child, timeout)?;

        // A surviving helper may hold the pipes open; never wait on it for long.
        let pipe_deadline = Instant::now() + PIPE_GRACE;
        let stdout = collect_pipe(&stdout_reader, pipe_deadline);
        let stderr = collect_pipe(&stderr_reader, pipe_deadline);
        if stdout.is_none() || stderr.is_none() {
            warn!("output pipes still open after git exited; killing its process group");
            kill_process_tree(&mut child);
        }

        Ok(CommandOutcome {
            args: args.iter().map(|a| a.to_string()).collect(),
            exit_code,
            stdout: String::from_utf8_lossy(&stdout.unwrap_or_default()).trim().to_string(),
            stderr: String::from_utf8_lossy(&stderr.unwrap_or_default()).trim().to_string(),
            timed_out,
        })
    }
}

impl CommandRunner for GitRunner {
    fn run(&self, cwd: &Path, args: &[&str]) -> Result<CommandOutcome> {
        info!(
            cwd = %cwd.display(),
            "running: {} {}",
            self.executable.display(),
            shell_words::join(args)
        );

        let outcome = match self.timeout {
            Some(timeout) => self.run_with_timeout(cwd, args, timeout)?,
            None => {
                let output = self
                    .command(cwd, args)
                    .output()
                    .map_err(|e| self.launch_error(e))?;
                CommandOutcome::from_output(args, &output)
            }
        };

        for line in outcome.lines() {
            info!("  {}", line);
        }

        if !outcome.success() {
            warn!(
                exit_code = ?outcome.exit_code,
                timed_out = outcome.timed_out,
                stderr = %outcome.stderr,
                "command failed: {}",
                outcome.command_line()
            );
        }

        Ok(outcome)
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(buf);
    });
    rx
}

/// Output of a reader thread, or `None` if the pipe is still open at `deadline`.
fn collect_pipe(reader: &Receiver<Vec<u8>>, deadline: Instant) -> Option<Vec<u8>> {
    reader
        .recv_timeout(deadline.saturating_duration_since(Instant::now()))
        .ok()
}

/// Kill the child and everything in its process group, then reap it.
fn kill_process_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: kill(2) takes plain integers; a negative pid targets the
            // process group created by `process_group(0)`.
            unsafe {
                libc::kill(-pid, libc::SIGKILL);
            }
        }
    }
    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
    let _ = child.kill();
    let _ = child.wait();
}

/// Wait for a child process with timeout.
///
/// Returns (exit_code, timed_out). On timeout the whole process group is killed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(20);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status.code(), false)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    kill_process_tree(child);
                    return Ok((None, true));
                }
                thread::sleep(poll_interval);
            }
            Err(e) => {
                kill_process_tree(child);
                return Err(ResetError::ToolUnavailable(format!(
                    "failed to check git process status: {}",
                    e
                )));
            }
        }
    }
}
