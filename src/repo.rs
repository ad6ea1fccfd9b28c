//! Repository handle validation.

use crate::error::{ResetError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Name of git's metadata directory.
pub const GIT_DIR: &str = ".git";

/// An absolute path to a directory containing a `.git` metadata directory.
///
/// Constructed only through [`RepositoryHandle::open`], so every handle has
/// been validated before any git command runs against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RepositoryHandle {
    root: PathBuf,
}

impl RepositoryHandle {
    /// Validate `path` and make it absolute.
    ///
    /// # Returns
    ///
    /// * `Ok(RepositoryHandle)` - The path is a directory containing `.git/`
    /// * `Err(ResetError::UserError)` - Missing, not a directory, or not a repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ResetError::UserError(format!(
                "path '{}' does not exist",
                path.display()
            )));
        }
        if !path.is_dir() {
            return Err(ResetError::UserError(format!(
                "path '{}' is not a directory",
                path.display()
            )));
        }

        let root = std::path::absolute(path).map_err(|e| {
            ResetError::UserError(format!(
                "failed to resolve absolute path for '{}': {}",
                path.display(),
                e
            ))
        })?;

        if !root.join(GIT_DIR).is_dir() {
            return Err(ResetError::UserError(format!(
                "'{}' does not appear to be an initialized git repository (no {} directory)",
                root.display(),
                GIT_DIR
            )));
        }

        Ok(Self { root })
    }

    /// Absolute path of the working tree root.
    pub fn path(&self) -> &Path {
        &self.root
    }
}

impl std::fmt::Display for RepositoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root.display())
    }
}
