//! trunk-reset: force a git working copy back to a clean trunk.
//!
//! A reset resolves the trunk branch (`main`, else `master`), discards local
//! modifications, checks trunk out, hard-resets it to the fetched remote
//! trunk (or the local HEAD when the fetch fails), removes untracked and
//! ignored files, and deletes every other local branch. See [`reset`] for
//! which failures abort the run and which only produce warnings.

pub mod branch;
pub mod clean;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod git;
pub mod locate;
pub mod logging;
pub mod prune;
pub mod repo;
pub mod report;
pub mod reset;
pub mod stash;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;
