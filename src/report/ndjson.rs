//! Append-only NDJSON log of run reports.

use super::RunReport;
use crate::error::{ResetError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Append the report as one JSON line to `path`, creating the file and its
/// parent directories if needed.
pub fn append_report(path: &Path, report: &RunReport) -> Result<()> {
    let json_line = report.to_json_line()?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            ResetError::UserError(format!(
                "failed to create report log directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            ResetError::UserError(format!(
                "failed to open report log '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        ResetError::UserError(format!(
            "failed to write report to '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        ResetError::UserError(format!(
            "failed to sync report log '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::RepositoryHandle;
    use crate::test_support::create_test_repo;
    use tempfile::TempDir;

    #[test]
    fn test_append_creates_file_and_appends_lines() {
        let repo_dir = create_test_repo();
        let log_dir = TempDir::new().unwrap();
        let log_path = log_dir.path().join("logs").join("resets.ndjson");

        let mut report = RunReport::new(RepositoryHandle::open(repo_dir.path()).unwrap());
        report.complete();

        append_report(&log_path, &report).unwrap();
        append_report(&log_path, &report).unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["status"]["status"], "completed");
        }
    }
}
