//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for a reset run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Branch settings
    // =========================================================================
    /// Branches tried as trunk, first match wins.
    #[serde(default = "default_trunk_candidates")]
    pub trunk_candidates: Vec<String>,

    /// Remote fetched before the hard reset.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Whether to fetch the remote trunk. When false, reset to local HEAD.
    #[serde(default = "default_true")]
    pub fetch: bool,

    // =========================================================================
    // Cleanup settings
    // =========================================================================
    /// Label of the throwaway stash entry.
    #[serde(default = "default_stash_message")]
    pub stash_message: String,

    /// Whether `git clean` also removes ignored files.
    #[serde(default = "default_true")]
    pub clean_ignored: bool,

    /// Whether to delete local branches other than trunk.
    #[serde(default = "default_true")]
    pub prune_branches: bool,

    /// Glob patterns of branches never deleted.
    #[serde(default)]
    pub protected_branches: Vec<String>,

    // =========================================================================
    // Execution settings
    // =========================================================================
    /// Kill any single git command running longer than this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,

    /// Explicit git executable. PATH lookup when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_executable: Option<PathBuf>,

    /// NDJSON file the final report is appended to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trunk_candidates: default_trunk_candidates(),
            remote: default_remote(),
            fetch: true,
            stash_message: default_stash_message(),
            clean_ignored: true,
            prune_branches: true,
            protected_branches: Vec::new(),
            command_timeout_secs: None,
            git_executable: None,
            report_log: None,
        }
    }
}
