//! Configuration loading, validation, and env substitution.
//!
//! Config files: `sendtick.toml`, `sendtick.yaml`, or `sendtick.json`
//! Searched in `./` then `~/.config/sendtick/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, config_dir, discover_and_load, find_config_file, load_config},
    schema::{ApiConfig, ConnectorConfig, DEFAULT_BASE_URL, SendtickConfig},
    validate::{Diagnostic, Severity, ValidationResult},
};
