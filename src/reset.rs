//! Reset orchestrator.
//!
//! Sequences the reset of one repository:
//!
//! ```text
//! Validate -> ResolveTrunk -> Stash -> Checkout -> VerifyCheckout -> Fetch
//!          -> HardReset -> Clean -> Prune -> Done
//! ```
//!
//! Trunk resolution, checkout, checkout verification and the hard reset are
//! fatal on failure: the run stops and no later step executes. Stash, fetch,
//! clean and prune failures are recorded as warnings and the run continues.
//! Each phase carries the values resolved by earlier phases, so a later step
//! can only run once the data it depends on exists.

use crate::branch::{BranchName, resolve_trunk};
use crate::clean::clean_workspace;
use crate::config::Config;
use crate::error::Result;
use crate::git::CommandRunner;
use crate::prune::{ProtectedBranches, PruneOutcome, prune_branches};
use crate::report::{FatalFailure, RunReport, Step};
use crate::repo::RepositoryHandle;
use crate::stash::{StashOutcome, stash_and_discard};
use crate::sync::{
    ResetTarget, TargetChoice, Verification, checkout_trunk, choose_reset_target, hard_reset,
    verify_checkout,
};
use std::path::Path;
use tracing::{error, info, warn};

/// Settings for one reset run, validated from [`Config`].
#[derive(Debug, Clone)]
pub struct ResetOptions {
    pub trunk_candidates: Vec<BranchName>,
    pub remote: String,
    pub fetch: bool,
    pub stash_message: String,
    pub clean_ignored: bool,
    pub prune_branches: bool,
    pub protected: ProtectedBranches,
}

impl ResetOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            trunk_candidates: config.trunk_branches()?,
            remote: config.remote.clone(),
            fetch: config.fetch,
            stash_message: config.stash_message.clone(),
            clean_ignored: config.clean_ignored,
            prune_branches: config.prune_branches,
            protected: config.protected()?,
        })
    }
}

enum Phase {
    ResolveTrunk,
    Stash(BranchName),
    Checkout(BranchName),
    VerifyCheckout(BranchName),
    Fetch(BranchName),
    HardReset(BranchName, ResetTarget),
    Clean(BranchName),
    Prune(BranchName),
    Done,
}

enum Transition {
    Next(Phase),
    Abort(Step, FatalFailure),
}

/// Reset `repo` to a clean trunk.
///
/// # Returns
///
/// * `Ok(RunReport)` - The run finished or aborted on a fatal step; see `report.status`
/// * `Err(ResetError::ToolUnavailable)` - git could not be launched; the run stopped at once
pub fn run_reset(
    runner: &dyn CommandRunner,
    repo: &RepositoryHandle,
    options: &ResetOptions,
) -> Result<RunReport> {
    info!("--- Resetting git repository: {} ---", repo);

    let mut run = Run {
        runner,
        repo: repo.path(),
        options,
        report: RunReport::new(repo.clone()),
    };
    run.report.succeeded(Step::Validate, None);

    let mut phase = Phase::ResolveTrunk;
    loop {
        match run.advance(phase)? {
            Transition::Next(Phase::Done) => {
                run.report.complete();
                if run.report.has_warnings() {
                    warn!(
                        "--- Repository reset complete with {} warning(s) ---",
                        run.report.warnings().count()
                    );
                } else {
                    info!("--- Repository reset complete ---");
                }
                break;
            }
            Transition::Next(next) => phase = next,
            Transition::Abort(step, failure) => {
                error!("Aborting reset at {}: {}", step, failure);
                run.report.abort(step, failure);
                break;
            }
        }
    }

    Ok(run.report)
}

struct Run<'a> {
    runner: &'a dyn CommandRunner,
    repo: &'a Path,
    options: &'a ResetOptions,
    report: RunReport,
}

impl Run<'_> {
    fn advance(&mut self, phase: Phase) -> Result<Transition> {
        match phase {
            Phase::ResolveTrunk => self.resolve_trunk(),
            Phase::Stash(trunk) => self.stash(trunk),
            Phase::Checkout(trunk) => self.checkout(trunk),
            Phase::VerifyCheckout(trunk) => self.verify(trunk),
            Phase::Fetch(trunk) => self.fetch(trunk),
            Phase::HardReset(trunk, target) => self.hard_reset(trunk, target),
            Phase::Clean(trunk) => self.clean(trunk),
            Phase::Prune(trunk) => self.prune(trunk),
            Phase::Done => unreachable!("run_reset stops before advancing past Done"),
        }
    }

    fn resolve_trunk(&mut self) -> Result<Transition> {
        let candidates = &self.options.trunk_candidates;
        match resolve_trunk(self.runner, self.repo, candidates)? {
            Some(trunk) => {
                self.report
                    .succeeded(Step::ResolveTrunk, Some(trunk.to_string()));
                self.report.trunk = Some(trunk.clone());
                Ok(Transition::Next(Phase::Stash(trunk)))
            }
            None => Ok(Transition::Abort(
                Step::ResolveTrunk,
                FatalFailure::NoTrunkBranch {
                    candidates: candidates.clone(),
                },
            )),
        }
    }

    fn stash(&mut self, trunk: BranchName) -> Result<Transition> {
        let outcome = stash_and_discard(self.runner, self.repo, &self.options.stash_message)?;
        match &outcome {
            StashOutcome::Discarded => self
                .report
                .succeeded(Step::Stash, Some("stashed and dropped local changes".to_string())),
            StashOutcome::NothingToStash => self.report.skipped(Step::Stash, "no local changes"),
            StashOutcome::DropFailed(reason) => self.report.warning(
                Step::Stash,
                format!("stash entry left behind (check `git stash list`): {}", reason),
            ),
            StashOutcome::StashFailed(reason) => self.report.warning(Step::Stash, reason.clone()),
        }
        self.report.stash = Some(outcome);
        Ok(Transition::Next(Phase::Checkout(trunk)))
    }

    fn checkout(&mut self, trunk: BranchName) -> Result<Transition> {
        let outcome = checkout_trunk(self.runner, self.repo, &trunk)?;
        if !outcome.success() {
            return Ok(Transition::Abort(
                Step::Checkout,
                FatalFailure::CheckoutFailed {
                    branch: trunk,
                    detail: outcome.failure_summary(),
                },
            ));
        }
        self.report.succeeded(Step::Checkout, None);
        Ok(Transition::Next(Phase::VerifyCheckout(trunk)))
    }

    fn verify(&mut self, trunk: BranchName) -> Result<Transition> {
        match verify_checkout(self.runner, self.repo, &trunk)? {
            Verification::Confirmed => {
                self.report.succeeded(Step::VerifyCheckout, None);
                Ok(Transition::Next(Phase::Fetch(trunk)))
            }
            Verification::Mismatch { actual } => Ok(Transition::Abort(
                Step::VerifyCheckout,
                FatalFailure::CheckoutMismatch {
                    expected: trunk,
                    actual,
                },
            )),
        }
    }

    fn fetch(&mut self, trunk: BranchName) -> Result<Transition> {
        let choice = choose_reset_target(
            self.runner,
            self.repo,
            &self.options.remote,
            &trunk,
            self.options.fetch,
        )?;
        match &choice {
            TargetChoice::Fetched(target) => {
                self.report.succeeded(Step::Fetch, Some(target.to_string()))
            }
            TargetChoice::FetchSkipped(_) => self.report.skipped(Step::Fetch, "fetch disabled"),
            TargetChoice::Degraded { reason, .. } => self.report.warning(
                Step::Fetch,
                format!("falling back to local HEAD: {}", reason),
            ),
        }
        let target = choice.target().clone();
        self.report.reset_target = Some(target.clone());
        Ok(Transition::Next(Phase::HardReset(trunk, target)))
    }

    fn hard_reset(&mut self, trunk: BranchName, target: ResetTarget) -> Result<Transition> {
        let outcome = hard_reset(self.runner, self.repo, &target)?;
        if !outcome.success() {
            return Ok(Transition::Abort(
                Step::HardReset,
                FatalFailure::HardResetFailed {
                    target,
                    detail: outcome.failure_summary(),
                },
            ));
        }
        self.report
            .succeeded(Step::HardReset, Some(target.to_string()));
        Ok(Transition::Next(Phase::Clean(trunk)))
    }

    fn clean(&mut self, trunk: BranchName) -> Result<Transition> {
        let outcome = clean_workspace(self.runner, self.repo, self.options.clean_ignored)?;
        if outcome.success() {
            self.report.succeeded(Step::Clean, None);
        } else {
            warn!("Failed git clean. Untracked files might remain.");
            self.report.warning(
                Step::Clean,
                format!("untracked files might remain: {}", outcome.failure_summary()),
            );
        }
        Ok(Transition::Next(Phase::Prune(trunk)))
    }

    fn prune(&mut self, trunk: BranchName) -> Result<Transition> {
        if !self.options.prune_branches {
            self.report.skipped(Step::Prune, "branch pruning disabled");
            return Ok(Transition::Next(Phase::Done));
        }

        match prune_branches(self.runner, self.repo, &trunk, &self.options.protected)? {
            PruneOutcome::ListingFailed { reason } => {
                self.report
                    .warning(Step::Prune, format!("skipped, could not list branches: {}", reason));
            }
            PruneOutcome::Pruned {
                deleted,
                failed,
                kept,
            } => {
                if failed.is_empty() {
                    self.report
                        .succeeded(Step::Prune, Some(format!("deleted {} branch(es)", deleted.len())));
                } else {
                    let names: Vec<&str> = failed.iter().map(|f| f.branch.as_str()).collect();
                    self.report.warning(
                        Step::Prune,
                        format!(
                            "deleted {} branch(es), could not delete: {}",
                            deleted.len(),
                            names.join(", ")
                        ),
                    );
                }
                self.report.deleted_branches = deleted;
                self.report.failed_branches = failed;
                self.report.kept_branches = kept;
            }
        }
        Ok(Transition::Next(Phase::Done))
    }
}
