//! Error types for trunk-reset.
//!
//! Only configuration problems and an unusable git executable are errors.
//! Failed git commands travel as [`crate::git::CommandOutcome`] values and
//! fatal step failures are recorded in the [`crate::report::RunReport`].

use crate::exit_codes;
use thiserror::Error;

/// Main error type for trunk-reset operations.
#[derive(Error, Debug)]
pub enum ResetError {
    /// Invalid arguments, path, or configuration.
    #[error("{0}")]
    UserError(String),

    /// The git executable could not be located or launched.
    #[error("git executable unavailable: {0}")]
    ToolUnavailable(String),
}

impl ResetError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ResetError::UserError(_) => exit_codes::USER_ERROR,
            ResetError::ToolUnavailable(_) => exit_codes::TOOL_UNAVAILABLE,
        }
    }
}

/// Result type alias for trunk-reset operations.
pub type Result<T> = std::result::Result<T, ResetError>;
