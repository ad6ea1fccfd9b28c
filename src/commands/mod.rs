//! The reset command: wires CLI, config, git location, and the orchestrator.

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::git::GitRunner;
use crate::locate::locate_git;
use crate::repo::RepositoryHandle;
use crate::report::{RunReport, append_report, print_report};
use crate::reset::{ResetOptions, run_reset};
use tracing::{info, warn};

/// Run a reset as described by `cli` and print its report.
///
/// Configuration problems (bad path, invalid config, unusable git) are
/// returned as errors before any git command touches the repository.
pub fn cmd_reset(cli: &Cli) -> Result<RunReport> {
    let repo = RepositoryHandle::open(&cli.repo_path)?;

    let mut config = Config::discover(cli.config.as_deref(), repo.path())?;
    cli.apply_overrides(&mut config);
    let options = ResetOptions::from_config(&config)?;

    let runner = match located_runner(cli, &config) {
        Ok(runner) => runner,
        Err(e) => {
            // Scripted callers still get a report, with no steps and no status.
            if cli.json {
                println!("{}", RunReport::new(repo).to_json_pretty()?);
            }
            return Err(e);
        }
    };

    let report = run_reset(&runner, &repo, &options)?;

    if cli.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        print_report(&report);
    }

    if let Some(path) = &config.report_log
        && let Err(e) = append_report(path, &report)
    {
        warn!("failed to append report to '{}': {}", path.display(), e);
    }

    Ok(report)
}

fn located_runner(cli: &Cli, config: &Config) -> Result<GitRunner> {
    let tool = locate_git(cli.git.as_deref(), config.git_executable.as_deref())?;
    let runner = GitRunner::new(tool.path).with_timeout(config.command_timeout());
    let version = runner.probe()?;
    info!(executable = %runner.executable().display(), "using {}", version);
    Ok(runner)
}
