//! Branch names and trunk resolution.

use crate::error::{ResetError, Result};
use crate::git::CommandRunner;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

/// Characters and sequences git refuses in a ref name, plus leading `-`
/// which would be read as an option.
static INVALID_BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^-|^/|/$|\.\.|@\{|//|\.lock$|/\.|^\.|[\x00-\x20\x7f~^:?*\[\\])")
        .expect("Invalid branch name regex")
});

/// A validated, non-empty local or remote branch name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BranchName(String);

impl BranchName {
    /// Validate a branch name.
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ResetError::UserError("branch name must not be empty".to_string()));
        }
        if name == "@" || INVALID_BRANCH_RE.is_match(&name) {
            return Err(ResetError::UserError(format!("invalid branch name '{}'", name)));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified local ref, e.g. `refs/heads/main`.
    pub fn local_ref(&self) -> String {
        format!("refs/heads/{}", self.0)
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for BranchName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BranchName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Check whether a local branch exists (`git show-ref --verify --quiet`).
pub fn branch_exists(runner: &dyn CommandRunner, repo: &Path, branch: &BranchName) -> Result<bool> {
    let outcome = runner.run(
        repo,
        &["show-ref", "--verify", "--quiet", &branch.local_ref()],
    )?;
    Ok(outcome.success())
}

/// Return the first candidate that exists as a local branch.
///
/// Candidates are checked in order and the search stops at the first hit,
/// so `master` is never queried when `main` exists.
///
/// # Returns
///
/// * `Ok(Some(branch))` - The trunk branch
/// * `Ok(None)` - No candidate exists
/// * `Err(ResetError::ToolUnavailable)` - git could not be launched
pub fn resolve_trunk(
    runner: &dyn CommandRunner,
    repo: &Path,
    candidates: &[BranchName],
) -> Result<Option<BranchName>> {
    for candidate in candidates {
        if branch_exists(runner, repo, candidate)? {
            info!("Detected trunk branch: {}", candidate);
            return Ok(Some(candidate.clone()));
        }
    }
    Ok(None)
}

/// Name of the currently checked-out branch, or `None` when HEAD is detached.
pub fn current_branch(runner: &dyn CommandRunner, repo: &Path) -> Result<Option<String>> {
    let outcome = runner.run(repo, &["branch", "--show-current"])?;
    if !outcome.success() || outcome.stdout.is_empty() {
        return Ok(None);
    }
    Ok(Some(outcome.stdout))
}
