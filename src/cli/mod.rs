//! CLI argument parsing for trunk-reset.
//!
//! Flags override the corresponding config file values.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Force a git working copy back to a clean trunk.
///
/// Checks out `main` (or `master`), hard-resets it to the fetched remote
/// trunk (or local HEAD if the fetch fails), removes untracked and ignored
/// files, and deletes every other local branch. Local work is discarded.
#[derive(Parser, Debug)]
#[command(name = "trunk-reset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the git repository to reset.
    #[arg(default_value = ".")]
    pub repo_path: PathBuf,

    /// Git executable to use instead of the one on PATH.
    #[arg(long, value_name = "PATH")]
    pub git: Option<PathBuf>,

    /// Config file (default: .trunk-reset.yaml in the repository, if present).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Remote to fetch trunk from.
    #[arg(long)]
    pub remote: Option<String>,

    /// Do not fetch; reset to the local trunk HEAD.
    #[arg(long)]
    pub no_fetch: bool,

    /// Do not delete local branches.
    #[arg(long)]
    pub no_prune: bool,

    /// Keep local branches matching this glob (repeatable).
    #[arg(long = "keep", value_name = "GLOB")]
    pub keep: Vec<String>,

    /// Kill any git command running longer than this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Append the run report as a JSON line to this file.
    #[arg(long, value_name = "FILE")]
    pub report_log: Option<PathBuf>,

    /// Print the run report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Emit log lines as JSON.
    #[arg(long)]
    pub log_json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Apply flag values on top of a loaded config.
    ///
    /// `--git` is not folded in here: it outranks `TRUNK_RESET_GIT`, which
    /// outranks the config file, so it is passed to the locator directly.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(remote) = &self.remote {
            config.remote = remote.clone();
        }
        if self.no_fetch {
            config.fetch = false;
        }
        if self.no_prune {
            config.prune_branches = false;
        }
        config.protected_branches.extend(self.keep.iter().cloned());
        if let Some(secs) = self.timeout_secs {
            config.command_timeout_secs = Some(secs);
        }
        if let Some(path) = &self.report_log {
            config.report_log = Some(path.clone());
        }
    }
}
