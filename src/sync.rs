//! Checkout, fetch, and hard reset of the trunk branch.
//!
//! The steps run strictly in order with no retries: checkout, verify,
//! fetch, hard reset. Classifying a failure as fatal is left to the
//! orchestrator; this module only reports what happened.

use crate::branch::{BranchName, current_branch};
use crate::error::Result;
use crate::git::{CommandOutcome, CommandRunner};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// The reference the working tree is hard-reset to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResetTarget {
    /// A remote-tracking reference such as `origin/main`.
    Remote { remote: String, branch: BranchName },
    /// The local `HEAD`.
    LocalHead,
}

impl ResetTarget {
    /// Argument passed to `git reset --hard`.
    pub fn git_ref(&self) -> String {
        match self {
            ResetTarget::Remote { remote, branch } => format!("{}/{}", remote, branch),
            ResetTarget::LocalHead => "HEAD".to_string(),
        }
    }
}

impl std::fmt::Display for ResetTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.git_ref())
    }
}

/// Result of comparing the checked-out branch with trunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Confirmed,
    /// `actual` is `None` when HEAD is detached.
    Mismatch { actual: Option<String> },
}

/// How the reset target was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetChoice {
    /// The remote trunk was fetched.
    Fetched(ResetTarget),
    /// Fetching is disabled by configuration.
    FetchSkipped(ResetTarget),
    /// The fetch failed and the run falls back to the local `HEAD`.
    Degraded { target: ResetTarget, reason: String },
}

impl TargetChoice {
    pub fn target(&self) -> &ResetTarget {
        match self {
            TargetChoice::Fetched(t) | TargetChoice::FetchSkipped(t) => t,
            TargetChoice::Degraded { target, .. } => target,
        }
    }
}

/// Switch the working tree to trunk.
pub fn checkout_trunk(
    runner: &dyn CommandRunner,
    repo: &Path,
    trunk: &BranchName,
) -> Result<CommandOutcome> {
    info!("Switching to branch: {}", trunk);
    runner.run(repo, &["checkout", trunk.as_str()])
}

/// Confirm trunk is actually checked out.
///
/// Catches checkouts that exit 0 without switching branches.
pub fn verify_checkout(
    runner: &dyn CommandRunner,
    repo: &Path,
    trunk: &BranchName,
) -> Result<Verification> {
    let current = current_branch(runner, repo)?;
    if current.as_deref() == Some(trunk.as_str()) {
        Ok(Verification::Confirmed)
    } else {
        Ok(Verification::Mismatch { actual: current })
    }
}

/// Pick the reset target, fetching the remote trunk when enabled.
///
/// Candidates are tried in order and the first available one wins: the
/// remote-tracking ref (only if its fetch succeeds), then the local `HEAD`,
/// which is always available.
pub fn choose_reset_target(
    runner: &dyn CommandRunner,
    repo: &Path,
    remote: &str,
    trunk: &BranchName,
    fetch: bool,
) -> Result<TargetChoice> {
    if !fetch {
        info!("Fetching disabled; resetting to local {}", trunk);
        return Ok(TargetChoice::FetchSkipped(ResetTarget::LocalHead));
    }

    let candidates = [
        ResetTarget::Remote {
            remote: remote.to_string(),
            branch: trunk.clone(),
        },
        ResetTarget::LocalHead,
    ];

    let mut failure: Option<String> = None;
    for target in candidates {
        match target {
            ResetTarget::Remote { .. } => {
                info!("Fetching latest changes for {}...", trunk);
                let outcome = runner.run(repo, &["fetch", remote, trunk.as_str()])?;
                if outcome.success() {
                    info!("Successfully fetched {}.", target);
                    return Ok(TargetChoice::Fetched(target));
                }
                warn!(
                    "Failed to fetch {}/{}. Resetting to local {}.",
                    remote, trunk, trunk
                );
                failure = Some(outcome.failure_summary());
            }
            ResetTarget::LocalHead => {
                return Ok(match failure {
                    Some(reason) => TargetChoice::Degraded { target, reason },
                    None => TargetChoice::FetchSkipped(target),
                });
            }
        }
    }

    unreachable!("local HEAD is always the last reset candidate")
}

/// Force the index and working tree to match `target`.
pub fn hard_reset(
    runner: &dyn CommandRunner,
    repo: &Path,
    target: &ResetTarget,
) -> Result<CommandOutcome> {
    info!("Resetting index and working directory to {}...", target);
    runner.run(repo, &["reset", "--hard", &target.git_ref()])
}
