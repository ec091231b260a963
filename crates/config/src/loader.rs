use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    env_subst::substitute_env,
    error::{Context, Error, Result},
    schema::SendtickConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "sendtick.toml",
    "sendtick.yaml",
    "sendtick.yml",
    "sendtick.json",
];

/// Environment variable overriding `api.api_key`.
pub const API_KEY_ENV: &str = "SENDTICK_API_KEY";
/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "SENDTICK_BASE_URL";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<SendtickConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./sendtick.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/sendtick/sendtick.{toml,yaml,yml,json}` (user-global)
///
/// Returns `SendtickConfig::default()` if no config file is found. Env
/// overrides are applied in both cases.
pub fn discover_and_load() -> SendtickConfig {
    let mut config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                SendtickConfig::default()
            })
        },
        None => {
            debug!("no config file found, using defaults");
            SendtickConfig::default()
        },
    };
    apply_env_overrides(&mut config);
    config
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/sendtick/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "sendtick").map(|d| d.config_dir().to_path_buf())
}

/// Apply `SENDTICK_API_KEY` / `SENDTICK_BASE_URL` on top of file values.
pub fn apply_env_overrides(config: &mut SendtickConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(config: &mut SendtickConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
        debug!("api key taken from {API_KEY_ENV}");
        config.api.api_key = Secret::new(key);
    }
    if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        debug!(base_url = %url, "base url taken from {BASE_URL_ENV}");
        config.api.base_url = url;
    }
}

pub(crate) fn parse_config(raw: &str, path: &Path) -> Result<SendtickConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::message(format!("unsupported config format: .{ext}"))),
    }
}
