//! Removal of untracked (and optionally ignored) files and directories.

use crate::error::Result;
use crate::git::{CommandOutcome, CommandRunner};
use std::path::Path;
use tracing::info;

/// Arguments for `git clean`.
///
/// `-f` force, `-d` directories, `-x` ignored files too.
pub fn clean_args(include_ignored: bool) -> Vec<&'static str> {
    if include_ignored {
        vec!["clean", "-fdx"]
    } else {
        vec!["clean", "-fd"]
    }
}

/// Remove every file not tracked by git.
pub fn clean_workspace(
    runner: &dyn CommandRunner,
    repo: &Path,
    include_ignored: bool,
) -> Result<CommandOutcome> {
    info!("Cleaning untracked files...");
    runner.run(repo, &clean_args(include_ignored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_repo, git, system_git};

    #[test]
    fn test_clean_removes_untracked_files_and_directories() {
        let temp_dir = create_test_repo();
        let path = temp_dir.path();
        std::fs::write(path.join("scratch.tmp"), "scratch\n").unwrap();
        std::fs::create_dir_all(path.join("build/out")).unwrap();
        std::fs::write(path.join("build/out/artifact.bin"), "bin").unwrap();

        let outcome = clean_workspace(&system_git(), path, true).unwrap();

        assert!(outcome.success());
        assert!(!path.join("scratch.tmp").exists());
        assert!(!path.join("build").exists());
        assert!(path.join("README.md").exists());
    }

    #[test]
    fn test_clean_ignored_files_only_when_requested() {
        let temp_dir = create_test_repo();
        let path = temp_dir.path();
        std::fs::write(path.join(".gitignore"), "*.log\n").unwrap();
        git(path, &["add", ".gitignore"]);
        git(path, &["commit", "-m", "Ignore logs"]);
        std::fs::write(path.join("debug.log"), "log\n").unwrap();

        clean_workspace(&system_git(), path, false).unwrap();
        assert!(path.join("debug.log").exists());

        clean_workspace(&system_git(), path, true).unwrap();
        assert!(!path.join("debug.log").exists());
    }

    #[test]
    fn test_clean_args() {
        assert_eq!(clean_args(true), vec!["clean", "-fdx"]);
        assert_eq!(clean_args(false), vec!["clean", "-fd"]);
    }
}
