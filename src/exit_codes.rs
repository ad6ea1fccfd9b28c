//! Exit code constants for the trunk-reset CLI.
//!
//! - 0: Reset completed (with or without warnings)
//! - 1: User error (bad args, invalid path, invalid config)
//! - 2: The git executable could not be located or launched
//! - 3: Reset aborted on a fatal step failure

/// Reset completed, possibly with warnings.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, missing or non-repository path, invalid config.
pub const USER_ERROR: i32 = 1;

/// The git executable is missing or cannot be launched.
pub const TOOL_UNAVAILABLE: i32 = 2;

/// A fatal step (trunk resolution, checkout, verification, hard reset) failed.
pub const RESET_ABORTED: i32 = 3;
