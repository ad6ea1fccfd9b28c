//! Defensive stash before destructive operations.
//!
//! Pending modifications (tracked and untracked) are pushed into a labeled
//! stash entry which is then dropped straight away. Nothing is preserved:
//! the stash only clears the working tree ahead of checkout and reset.
//! This step never gates the run.

use crate::error::Result;
use crate::git::CommandRunner;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Marker git prints on a successful `stash push` with nothing to save.
const NO_LOCAL_CHANGES: &str = "No local changes to save";

/// What the stash step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum StashOutcome {
    /// Changes were stashed and the entry dropped.
    Discarded,
    /// Changes were stashed but the drop failed; the entry is still in `git stash list`.
    DropFailed(String),
    /// There was nothing to stash.
    NothingToStash,
    /// `git stash push` itself failed.
    StashFailed(String),
}

impl StashOutcome {
    /// True when the outcome should be reported as a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, StashOutcome::DropFailed(_) | StashOutcome::StashFailed(_))
    }
}

/// Stash everything, including untracked files, then drop the stash.
pub fn stash_and_discard(
    runner: &dyn CommandRunner,
    repo: &Path,
    message: &str,
) -> Result<StashOutcome> {
    info!("Attempting to stash potential leftovers...");
    let stash = runner.run(
        repo,
        &["stash", "push", "--include-untracked", "-m", message],
    )?;

    if !stash.success() {
        warn!(
            "Stash command failed (may be expected if no changes): {}",
            stash.stderr
        );
        return Ok(StashOutcome::StashFailed(stash.failure_summary()));
    }

    if stash.stdout.contains(NO_LOCAL_CHANGES) {
        info!("No local changes to stash.");
        return Ok(StashOutcome::NothingToStash);
    }

    info!("Stashed changes. Dropping stash...");
    let drop = runner.run(repo, &["stash", "drop"])?;
    if drop.success() {
        Ok(StashOutcome::Discarded)
    } else {
        warn!("Failed to drop stash. Manual cleanup might be needed ('git stash list').");
        Ok(StashOutcome::DropFailed(drop.failure_summary()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedRunner, create_test_repo, git_stdout, system_git};

    const MESSAGE: &str = "AutoAgentResetStash";

    #[test]
    fn test_clean_tree_has_nothing_to_stash() {
        let temp_dir = create_test_repo();
        let runner = ScriptedRunner::new();
        let outcome = stash_and_discard(&runner, temp_dir.path(), MESSAGE).unwrap();
        assert_eq!(outcome, StashOutcome::NothingToStash);
        assert!(!runner.ran_any("stash drop"));
    }

    #[test]
    fn test_changes_are_stashed_and_dropped() {
        let temp_dir = create_test_repo();
        std::fs::write(temp_dir.path().join("README.md"), "# Modified\n").unwrap();
        std::fs::write(temp_dir.path().join("scratch.tmp"), "scratch\n").unwrap();

        let outcome = stash_and_discard(&system_git(), temp_dir.path(), MESSAGE).unwrap();

        assert_eq!(outcome, StashOutcome::Discarded);
        assert!(!temp_dir.path().join("scratch.tmp").exists());
        let readme = std::fs::read_to_string(temp_dir.path().join("README.md")).unwrap();
        assert_eq!(readme, "# Test\n");
        assert!(git_stdout(temp_dir.path(), &["stash", "list"]).is_empty());
    }

    #[test]
    fn test_drop_failure_is_a_warning() {
        let temp_dir = create_test_repo();
        std::fs::write(temp_dir.path().join("README.md"), "# Modified\n").unwrap();

        let runner = ScriptedRunner::new().fail_on(&["stash", "drop"]);
        let outcome = stash_and_discard(&runner, temp_dir.path(), MESSAGE).unwrap();

        assert!(matches!(outcome, StashOutcome::DropFailed(_)));
        assert!(outcome.is_warning());
        let list = git_stdout(temp_dir.path(), &["stash", "list"]);
        assert!(list.contains(MESSAGE));
    }

    #[test]
    fn test_stash_failure_is_a_warning() {
        let temp_dir = create_test_repo();
        let runner = ScriptedRunner::new().fail_on(&["stash", "push"]);
        let outcome = stash_and_discard(&runner, temp_dir.path(), MESSAGE).unwrap();
        assert!(matches!(outcome, StashOutcome::StashFailed(_)));
        assert!(outcome.is_warning());
        assert!(!runner.ran_any("stash drop"));
    }

    #[test]
    fn test_nothing_to_stash_is_not_a_warning() {
        assert!(!StashOutcome::NothingToStash.is_warning());
        assert!(!StashOutcome::Discarded.is_warning());
    }
}
