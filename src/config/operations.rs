//! Config loading, validation, and derived values.

use super::model::Config;
use super::types::CONFIG_FILE_NAME;
use crate::branch::BranchName;
use crate::error::{ResetError, Result};
use crate::prune::ProtectedBranches;
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ResetError::UserError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ResetError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load `--config` if given, else `.trunk-reset.yaml` in `repo` if it
    /// exists, else defaults.
    pub fn discover(explicit: Option<&Path>, repo: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = repo.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                ResetError::UserError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ResetError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// - `trunk_candidates` must be non-empty valid branch names
    /// - `remote` must be non-empty and must not start with `-`
    /// - `command_timeout_secs`, when set, must be positive
    /// - `protected_branches` must be valid globs
    pub fn validate(&self) -> Result<()> {
        self.trunk_branches()?;

        if self.remote.trim().is_empty() {
            return Err(ResetError::UserError(
                "config validation failed: remote must not be empty".to_string(),
            ));
        }

        if self.remote.starts_with('-') {
            return Err(ResetError::UserError(format!(
                "config validation failed: remote '{}' must not start with '-'",
                self.remote
            )));
        }

        if self.command_timeout_secs == Some(0) {
            return Err(ResetError::UserError(
                "config validation failed: command_timeout_secs must be greater than 0"
                    .to_string(),
            ));
        }

        self.protected()?;
        Ok(())
    }

    /// Trunk candidates as validated branch names.
    pub fn trunk_branches(&self) -> Result<Vec<BranchName>> {
        if self.trunk_candidates.is_empty() {
            return Err(ResetError::UserError(
                "config validation failed: trunk_candidates must not be empty".to_string(),
            ));
        }
        self.trunk_candidates
            .iter()
            .map(|name| {
                BranchName::new(name.as_str()).map_err(|e| {
                    ResetError::UserError(format!(
                        "config validation failed: trunk_candidates: {}",
                        e
                    ))
                })
            })
            .collect()
    }

    /// Compiled `protected_branches` globs.
    pub fn protected(&self) -> Result<ProtectedBranches> {
        ProtectedBranches::new(&self.protected_branches)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}
