//! Configuration model for trunk-reset.
//!
//! Settings come from an optional YAML file (`--config`, or
//! `.trunk-reset.yaml` at the repository root) with defaults for every
//! field. Unknown fields are ignored so older binaries accept newer files.

mod model;
mod operations;
pub mod types;


pub use model::Config;
pub use types::CONFIG_FILE_NAME;
