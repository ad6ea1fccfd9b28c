//! Defaults for the config struct.

/// Config file looked up at the repository root when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = ".trunk-reset.yaml";

/// Trunk candidates, in preference order.
pub fn default_trunk_candidates() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

pub fn default_remote() -> String {
    "origin".to_string()
}

pub fn default_stash_message() -> String {
    "AutoAgentResetStash".to_string()
}

pub fn default_true() -> bool {
    true
}
