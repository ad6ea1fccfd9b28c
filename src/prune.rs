//! Deletion of every local branch except trunk.
//!
//! Each branch is deleted with `git branch -D`, falling back to
//! `git branch -d` if the forced delete is rejected. A branch that survives
//! both attempts is recorded and the remaining branches are still tried.

use crate::branch::BranchName;
use crate::error::{ResetError, Result};
use crate::git::CommandRunner;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Lists local branch names, one per line, free of markers and colour codes
/// whatever the user's `color.*` settings.
pub const LIST_BRANCHES_ARGS: [&str; 2] = ["branch", "--format=%(refname:short)"];

/// Deletion attempts, in the order they are tried.
const DELETE_MODES: [DeleteMode; 2] = [DeleteMode::Force, DeleteMode::Safe];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    /// `git branch -D`
    Force,
    /// `git branch -d`
    Safe,
}

impl DeleteMode {
    fn flag(self) -> &'static str {
        match self {
            DeleteMode::Force => "-D",
            DeleteMode::Safe => "-d",
        }
    }
}

/// A branch that could not be deleted, with the last error seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDeletion {
    pub branch: String,
    pub reason: String,
}

/// What the pruner did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PruneOutcome {
    /// The branch list was read and every other branch attempted.
    Pruned {
        deleted: Vec<String>,
        failed: Vec<FailedDeletion>,
        kept: Vec<String>,
    },
    /// Listing branches failed, so nothing was attempted.
    ListingFailed { reason: String },
}

/// Branches the pruner must keep besides trunk.
#[derive(Debug, Clone)]
pub struct ProtectedBranches {
    patterns: Vec<String>,
    set: GlobSet,
}

impl ProtectedBranches {
    /// Compile glob patterns such as `release/*`.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                ResetError::UserError(format!(
                    "invalid glob pattern '{}' in protected_branches: {}",
                    pattern, e
                ))
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| {
            ResetError::UserError(format!("failed to build protected_branches globs: {}", e))
        })?;
        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    pub fn none() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    pub fn is_protected(&self, branch: &str) -> bool {
        !self.patterns.is_empty() && self.set.is_match(branch)
    }
}

/// Parse a branch listing into branch names.
///
/// Accepts both [`LIST_BRANCHES_ARGS`] output and plain `git branch` output,
/// stripping the `*` (current) and `+` (checked out in another worktree)
/// markers of the latter. Detached-HEAD entries are skipped.
pub fn parse_branch_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.strip_prefix("* ")
                .or_else(|| line.strip_prefix("+ "))
                .unwrap_or(line)
                .trim()
        })
        .filter(|name| !name.starts_with('('))
        .map(str::to_string)
        .collect()
}

/// Delete every local branch except `trunk` and protected branches.
pub fn prune_branches(
    runner: &dyn CommandRunner,
    repo: &Path,
    trunk: &BranchName,
    protected: &ProtectedBranches,
) -> Result<PruneOutcome> {
    info!("Deleting other local branches...");
    let listing = runner.run(repo, &LIST_BRANCHES_ARGS)?;
    if !listing.success() {
        warn!("Could not list branches; skipping branch deletion.");
        return Ok(PruneOutcome::ListingFailed {
            reason: listing.failure_summary(),
        });
    }

    let mut deleted = Vec::new();
    let mut failed = Vec::new();
    let mut kept = Vec::new();

    for branch in parse_branch_list(&listing.stdout) {
        if trunk == branch.as_str() {
            continue;
        }
        if protected.is_protected(&branch) {
            info!("Keeping protected branch: {}", branch);
            kept.push(branch);
            continue;
        }

        info!("Deleting branch: {}", branch);
        match delete_branch(runner, repo, &branch)? {
            Ok(mode) => {
                if mode == DeleteMode::Safe {
                    info!("Deleted {} with safe delete after force delete failed", branch);
                }
                deleted.push(branch);
            }
            Err(reason) => {
                warn!("Failed to delete branch {}", branch);
                failed.push(FailedDeletion { branch, reason });
            }
        }
    }

    info!("Deleted {} other local branches.", deleted.len());
    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(|f| f.branch.as_str()).collect();
        warn!("Could not delete branches: {}", names.join(", "));
    }

    Ok(PruneOutcome::Pruned {
        deleted,
        failed,
        kept,
    })
}

/// Try each delete mode in order, stopping at the first that succeeds.
///
/// The inner result carries the mode that worked, or the last failure.
fn delete_branch(
    runner: &dyn CommandRunner,
    repo: &Path,
    branch: &str,
) -> Result<std::result::Result<DeleteMode, String>> {
    let mut last_failure = String::new();
    for mode in DELETE_MODES {
        let outcome = runner.run(repo, &["branch", mode.flag(), branch])?;
        if outcome.success() {
            return Ok(Ok(mode));
        }
        last_failure = outcome.failure_summary();
    }
    Ok(Err(last_failure))
}
