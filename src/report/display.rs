//! Human-readable rendering of a run report.

use super::{RunReport, RunStatus};

/// Render the report as text.
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Repository: {}\n", report.repository));
    if let Some(trunk) = &report.trunk {
        out.push_str(&format!("Trunk:      {}\n", trunk));
    }
    if let Some(target) = &report.reset_target {
        out.push_str(&format!("Reset to:   {}\n", target));
    }
    out.push('\n');

    out.push_str("Steps:\n");
    for record in &report.steps {
        match &record.detail {
            Some(detail) => out.push_str(&format!(
                "  [{}] {} - {}\n",
                record.status, record.step, detail
            )),
            None => out.push_str(&format!("  [{}] {}\n", record.status, record.step)),
        }
    }

    if !report.deleted_branches.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "Deleted branches ({}):\n",
            report.deleted_branches.len()
        ));
        for branch in &report.deleted_branches {
            out.push_str(&format!("  - {}\n", branch));
        }
    }

    if !report.failed_branches.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "Could not delete ({}):\n",
            report.failed_branches.len()
        ));
        for failed in &report.failed_branches {
            out.push_str(&format!("  - {}: {}\n", failed.branch, failed.reason));
        }
    }

    if !report.kept_branches.is_empty() {
        out.push('\n');
        out.push_str(&format!("Kept (protected): {}\n", report.kept_branches.join(", ")));
    }

    out.push('\n');
    match &report.status {
        Some(RunStatus::Completed) => out.push_str("Repository reset complete.\n"),
        Some(RunStatus::CompletedWithWarnings) => out.push_str(&format!(
            "Repository reset complete with {} warning(s).\n",
            report.warnings().count()
        )),
        Some(RunStatus::AbortedFatal { step, failure }) => {
            out.push_str(&format!("Reset ABORTED at {}: {}\n", step, failure));
            out.push_str("The repository may be in an intermediate state; inspect it manually.\n");
        }
        None => out.push_str("Reset did not run.\n"),
    }

    out
}

/// Print the report to stdout.
pub fn print_report(report: &RunReport) {
    print!("{}", render_report(report));
}
