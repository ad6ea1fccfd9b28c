//! Run report for one reset invocation.
//!
//! A [`RunReport`] is built up step by step by the orchestrator and returned
//! to the caller. It is never persisted unless the caller appends it to a
//! report log with [`append_report`].

mod display;
mod ndjson;

pub use display::print_report;
pub use ndjson::append_report;

use crate::branch::BranchName;
use crate::error::{ResetError, Result};
use crate::exit_codes;
use crate::prune::FailedDeletion;
use crate::repo::RepositoryHandle;
use crate::stash::StashOutcome;
use crate::sync::ResetTarget;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The steps of a reset, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Validate,
    ResolveTrunk,
    Stash,
    Checkout,
    VerifyCheckout,
    Fetch,
    HardReset,
    Clean,
    Prune,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::Validate => "validate",
            Step::ResolveTrunk => "resolve trunk",
            Step::Stash => "stash",
            Step::Checkout => "checkout",
            Step::VerifyCheckout => "verify checkout",
            Step::Fetch => "fetch",
            Step::HardReset => "hard reset",
            Step::Clean => "clean",
            Step::Prune => "prune",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    Skipped,
    /// Failed without stopping the run.
    Warning,
    /// Failed and stopped the run.
    Fatal,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Succeeded => write!(f, "ok"),
            StepStatus::Skipped => write!(f, "skipped"),
            StepStatus::Warning => write!(f, "WARNING"),
            StepStatus::Fatal => write!(f, "FATAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: Step,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Why a run was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "failure", rename_all = "snake_case")]
pub enum FatalFailure {
    /// None of the trunk candidates exists locally.
    NoTrunkBranch { candidates: Vec<BranchName> },
    CheckoutFailed { branch: BranchName, detail: String },
    /// Checkout exited 0 but a different branch (or detached HEAD) is current.
    CheckoutMismatch {
        expected: BranchName,
        actual: Option<String>,
    },
    /// The repository may be partially reset.
    HardResetFailed { target: ResetTarget, detail: String },
}

impl std::fmt::Display for FatalFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FatalFailure::NoTrunkBranch { candidates } => {
                let names: Vec<&str> = candidates.iter().map(BranchName::as_str).collect();
                write!(
                    f,
                    "could not determine trunk branch (none of {} found)",
                    names.join(", ")
                )
            }
            FatalFailure::CheckoutFailed { branch, detail } => {
                write!(f, "failed to switch to branch {}: {}", branch, detail)
            }
            FatalFailure::CheckoutMismatch { expected, actual } => write!(
                f,
                "failed to confirm switch to branch {} (current: {})",
                expected,
                actual.as_deref().unwrap_or("detached HEAD")
            ),
            FatalFailure::HardResetFailed { target, detail } => write!(
                f,
                "hard reset to {} failed, state might be inconsistent: {}",
                target, detail
            ),
        }
    }
}

/// Terminal status of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    CompletedWithWarnings,
    AbortedFatal { step: Step, failure: FatalFailure },
}

/// Accumulated record of one reset run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub repository: RepositoryHandle,
    pub host: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub trunk: Option<BranchName>,
    pub reset_target: Option<ResetTarget>,
    pub stash: Option<StashOutcome>,
    pub steps: Vec<StepRecord>,
    pub deleted_branches: Vec<String>,
    pub failed_branches: Vec<FailedDeletion>,
    pub kept_branches: Vec<String>,
    /// `None` until the run completes or aborts.
    pub status: Option<RunStatus>,
}

impl RunReport {
    pub fn new(repository: RepositoryHandle) -> Self {
        Self {
            repository,
            host: host_string(),
            started_at: Utc::now(),
            finished_at: None,
            trunk: None,
            reset_target: None,
            stash: None,
            steps: Vec::new(),
            deleted_branches: Vec::new(),
            failed_branches: Vec::new(),
            kept_branches: Vec::new(),
            status: None,
        }
    }

    pub fn succeeded(&mut self, step: Step, detail: Option<String>) {
        self.push(step, StepStatus::Succeeded, detail);
    }

    pub fn skipped(&mut self, step: Step, reason: impl Into<String>) {
        self.push(step, StepStatus::Skipped, Some(reason.into()));
    }

    pub fn warning(&mut self, step: Step, reason: impl Into<String>) {
        self.push(step, StepStatus::Warning, Some(reason.into()));
    }

    /// Record a fatal failure and close the report.
    pub fn abort(&mut self, step: Step, failure: FatalFailure) {
        self.push(step, StepStatus::Fatal, Some(failure.to_string()));
        self.status = Some(RunStatus::AbortedFatal { step, failure });
        self.finished_at = Some(Utc::now());
    }

    /// Close a run that reached the end of the sequence.
    pub fn complete(&mut self) {
        self.status = Some(if self.has_warnings() {
            RunStatus::CompletedWithWarnings
        } else {
            RunStatus::Completed
        });
        self.finished_at = Some(Utc::now());
    }

    fn push(&mut self, step: Step, status: StepStatus, detail: Option<String>) {
        self.steps.push(StepRecord {
            step,
            status,
            detail,
        });
    }

    pub fn has_warnings(&self) -> bool {
        self.steps.iter().any(|s| s.status == StepStatus::Warning)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|s| s.status == StepStatus::Warning)
    }

    /// Whether `step` appears in the report at all.
    pub fn attempted(&self, step: Step) -> bool {
        self.steps.iter().any(|s| s.step == step)
    }

    pub fn step_status(&self, step: Step) -> Option<StepStatus> {
        self.steps.iter().find(|s| s.step == step).map(|s| s.status)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.status, Some(RunStatus::AbortedFatal { .. }))
    }

    /// Process exit code for this report.
    ///
    /// A report without a status never got past locating git.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            Some(RunStatus::Completed | RunStatus::CompletedWithWarnings) => exit_codes::SUCCESS,
            Some(RunStatus::AbortedFatal { .. }) => exit_codes::RESET_ABORTED,
            None => exit_codes::TOOL_UNAVAILABLE,
        }
    }

    /// Serialize the report to a single-line JSON string.
    pub fn to_json_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ResetError::UserError(format!("failed to serialize report to JSON: {}", e)))
    }

    /// Serialize the report to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ResetError::UserError(format!("failed to serialize report to JSON: {}", e)))
    }
}

fn host_string() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
