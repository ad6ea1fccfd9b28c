//! Entry point for the `trunk-reset` CLI. Parses arguments, runs the reset,
//! and maps the outcome to an exit code.

use std::process::ExitCode;
use tracing::Level;
use trunk_reset::cli::Cli;
use trunk_reset::{commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    logging::init_tracing(cli.log_json, level);

    match commands::cmd_reset(&cli) {
        Ok(report) => ExitCode::from(report.exit_code() as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
