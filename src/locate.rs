//! Locating the git executable.
//!
//! The executable is supplied from outside rather than hardcoded. Resolution
//! order: explicit flag, `TRUNK_RESET_GIT`, config file, then a PATH lookup.

use crate::error::{ResetError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides the git executable location.
pub const GIT_ENV_VAR: &str = "TRUNK_RESET_GIT";

/// Where the resolved executable came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSource {
    Flag,
    Environment,
    Config,
    Path,
}

/// A git executable location chosen by [`locate_git`].
#[derive(Debug, Clone)]
pub struct LocatedTool {
    pub path: PathBuf,
    pub source: ToolSource,
}

/// Resolve the git executable, reading `TRUNK_RESET_GIT` from the environment.
pub fn locate_git(flag: Option<&Path>, config: Option<&Path>) -> Result<LocatedTool> {
    locate_git_with_env(flag, std::env::var_os(GIT_ENV_VAR), config)
}

/// Resolve the git executable with an explicit environment value.
///
/// An explicitly supplied location must exist as a file; it is never
/// silently replaced by the PATH lookup.
pub fn locate_git_with_env(
    flag: Option<&Path>,
    env: Option<OsString>,
    config: Option<&Path>,
) -> Result<LocatedTool> {
    let explicit = flag
        .map(|p| (p.to_path_buf(), ToolSource::Flag))
        .or_else(|| {
            env.filter(|v| !v.is_empty())
                .map(|v| (PathBuf::from(v), ToolSource::Environment))
        })
        .or_else(|| config.map(|p| (p.to_path_buf(), ToolSource::Config)));

    if let Some((path, source)) = explicit {
        return explicit_tool(path, source);
    }

    let path = which::which("git").map_err(|e| {
        ResetError::ToolUnavailable(format!(
            "git not found on PATH: {}\n\
             Fix: install git, or pass --git <PATH> / set {}.",
            e, GIT_ENV_VAR
        ))
    })?;
    debug!(path = %path.display(), "git located on PATH");

    Ok(LocatedTool {
        path,
        source: ToolSource::Path,
    })
}

fn explicit_tool(path: PathBuf, source: ToolSource) -> Result<LocatedTool> {
    // A bare name such as "git" or "git.exe" is looked up on PATH.
    let resolved = if path.components().count() == 1 && !path.is_file() {
        which::which(&path).map_err(|e| {
            ResetError::ToolUnavailable(format!("'{}' not found on PATH: {}", path.display(), e))
        })?
    } else {
        path
    };

    if !resolved.is_file() {
        return Err(ResetError::ToolUnavailable(format!(
            "git executable not found at '{}' (from {:?})",
            resolved.display(),
            source
        )));
    }

    debug!(path = %resolved.display(), ?source, "git located");
    Ok(LocatedTool {
        path: resolved,
        source,
    })
}
