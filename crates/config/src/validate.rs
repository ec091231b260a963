//! Configuration validation.
//!
//! Detects unknown/misspelled fields, type errors, and settings that would
//! make every outbound API call fail.

use std::path::{Path, PathBuf};

use crate::{
    env_subst::{substitute_env, unresolved_placeholders},
    loader::{apply_env_overrides, find_config_file},
    schema::SendtickConfig,
};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "type-error", "env", "api", "file-ref"
    pub category: &'static str,
    /// Dotted path, e.g. "api.base_url"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

// ── Known keys ──────────────────────────────────────────────────────────────

const API_KEYS: &[&str] = &["base_url", "api_key", "timeout_secs", "user_agent"];
const CONNECTOR_KEYS: &[&str] = &["media_enabled"];
const TOP_LEVEL_KEYS: &[&str] = &["api", "connector"];

fn known_children(section: &str) -> Option<&'static [&'static str]> {
    match section {
        "api" => Some(API_KEYS),
        "connector" => Some(CONNECTOR_KEYS),
        _ => None,
    }
}

fn check_unknown_fields(value: &serde_json::Value, diagnostics: &mut Vec<Diagnostic>) {
    let Some(root) = value.as_object() else {
        return;
    };
    for (key, child) in root {
        let Some(children) = known_children(key) else {
            diagnostics.push(unknown_field(key, key, TOP_LEVEL_KEYS));
            continue;
        };
        let Some(table) = child.as_object() else {
            continue;
        };
        for child_key in table.keys() {
            if !children.contains(&child_key.as_str()) {
                diagnostics.push(unknown_field(
                    &format!("{key}.{child_key}"),
                    child_key,
                    children,
                ));
            }
        }
    }
}

fn unknown_field(path: &str, key: &str, candidates: &[&str]) -> Diagnostic {
    let message = match suggest(key, candidates, 3) {
        Some(s) => format!("unknown field (did you mean \"{s}\"?)"),
        None => "unknown field".to_string(),
    };
    Diagnostic::new(Severity::Error, "unknown-field", path, message)
}

// ── Levenshtein distance ────────────────────────────────────────────────────

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

/// Closest candidate within `max_distance` edits, if any.
fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, levenshtein(needle, c)))
        .filter(|(_, d)| *d > 0 && *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

// ── Core validation ─────────────────────────────────────────────────────────

/// Validate a config file at the given path, or the discovered default
/// location if `path` is `None`. Env overrides are applied before the
/// semantic checks, matching what the connector sees at runtime.
#[must_use]
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

    let Some(actual_path) = config_path else {
        let mut config = SendtickConfig::default();
        apply_env_overrides(&mut config);
        let mut result = validate_config(&config);
        result.diagnostics.insert(
            0,
            Diagnostic::new(
                Severity::Info,
                "file-ref",
                "",
                "no config file found; using defaults",
            ),
        );
        return result;
    };

    let mut result = match std::fs::read_to_string(&actual_path) {
        Ok(raw) => {
            let ext = actual_path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("toml");
            validate_str(&raw, ext)
        },
        Err(e) => ValidationResult {
            diagnostics: vec![Diagnostic::new(
                Severity::Error,
                "syntax",
                "",
                format!("failed to read config file: {e}"),
            )],
            config_path: None,
        },
    };
    result.config_path = Some(actual_path);
    result
}

/// Validate raw config text in the format named by `ext`
/// (`toml`, `yaml`/`yml`, or `json`).
#[must_use]
pub fn validate_str(raw: &str, ext: &str) -> ValidationResult {
    let mut diagnostics = Vec::new();
    let substituted = substitute_env(raw);

    for name in unresolved_placeholders(&substituted) {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "env",
            "",
            format!("environment variable ${{{name}}} is not set"),
        ));
    }

    // 1. Syntax
    let value = match parse_value(&substituted, ext) {
        Ok(v) => v,
        Err(message) => {
            diagnostics.push(Diagnostic::new(Severity::Error, "syntax", "", message));
            return ValidationResult {
                diagnostics,
                config_path: None,
            };
        },
    };

    // 2. Unknown fields
    check_unknown_fields(&value, &mut diagnostics);

    // 3. Types, then semantics on the parsed config
    match serde_json::from_value::<SendtickConfig>(value) {
        Ok(mut config) => {
            apply_env_overrides(&mut config);
            diagnostics.extend(validate_config(&config).diagnostics);
        },
        Err(e) => diagnostics.push(Diagnostic::new(
            Severity::Error,
            "type-error",
            "",
            format!("type error: {e}"),
        )),
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

fn parse_value(raw: &str, ext: &str) -> Result<serde_json::Value, String> {
    match ext {
        "toml" => toml::from_str::<toml::Value>(raw)
            .map_err(|e| format!("TOML syntax error: {e}"))
            .and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str::<serde_yaml::Value>(raw)
            .map_err(|e| format!("YAML syntax error: {e}"))
            .and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string())),
        "json" => serde_json::from_str(raw).map_err(|e| format!("JSON syntax error: {e}")),
        other => Err(format!("unsupported config format: .{other}")),
    }
}

/// Semantic checks on an already-parsed config.
#[must_use]
pub fn validate_config(config: &SendtickConfig) -> ValidationResult {
    let mut diagnostics = Vec::new();

    match url::Url::parse(&config.api.base_url) {
        Ok(url) => match url.scheme() {
            "https" => {},
            "http" => {
                let local = matches!(
                    url.host_str(),
                    Some("localhost" | "127.0.0.1" | "[::1]")
                );
                if !local {
                    diagnostics.push(Diagnostic::new(
                        Severity::Warning,
                        "api",
                        "api.base_url",
                        "plain http base URL sends the API key unencrypted",
                    ));
                }
            },
            scheme => diagnostics.push(Diagnostic::new(
                Severity::Error,
                "api",
                "api.base_url",
                format!("unsupported URL scheme \"{scheme}\" (expected http or https)"),
            )),
        },
        Err(e) => diagnostics.push(Diagnostic::new(
            Severity::Error,
            "api",
            "api.base_url",
            format!("invalid URL \"{}\": {e}", config.api.base_url),
        )),
    }

    if !config.api.has_api_key() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "api",
            "api.api_key",
            "no API key configured (set api.api_key or SENDTICK_API_KEY)",
        ));
    }

    if config.api.timeout_secs == Some(0) {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "api",
            "api.timeout_secs",
            "timeout must be greater than zero",
        ));
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn paths(result: &ValidationResult, category: &str) -> Vec<String> {
        result
            .diagnostics
            .iter()
            .filter(|d| d.category == category)
            .map(|d| d.path.clone())
            .collect()
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("base_url", "base_url"), 0);
        assert_eq!(levenshtein("base_ulr", "base_url"), 2);
        assert_eq!(levenshtein("api_kye", "api_key"), 2);
    }

    #[test]
    fn suggests_close_field_name() {
        let result = validate_str("[api]\napi_kye = \"x\"\n", "toml");
        let diag = result
            .diagnostics
            .iter()
            .find(|d| d.category == "unknown-field")
            .unwrap();
        assert_eq!(diag.path, "api.api_kye");
        assert!(diag.message.contains("did you mean \"api_key\""));
    }

    #[test]
    fn unknown_top_level_section() {
        let result = validate_str("[conector]\nmedia_enabled = true\n", "toml");
        assert_eq!(paths(&result, "unknown-field"), vec!["conector"]);
        assert!(result.has_errors());
    }

    #[test]
    fn syntax_error_stops_early() {
        let result = validate_str("[api\n", "toml");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].category, "syntax");
    }

    #[test]
    fn type_error_reported() {
        let result = validate_str(
            r#"{"api": {"api_key": "k", "timeout_secs": "soon"}}"#,
            "json",
        );
        assert!(!paths(&result, "type-error").is_empty());
    }

    #[test]
    fn clean_config_has_no_errors() {
        let result = validate_str(
            "api:\n  base_url: https://sendtick.co/api/v1\n  api_key: tok\n",
            "yaml",
        );
        assert!(!result.has_errors(), "{:?}", result.diagnostics);
    }

    #[test]
    fn semantic_checks() {
        let mut config = SendtickConfig::default();
        config.api.base_url = "ftp://sendtick.co".into();
        config.api.timeout_secs = Some(0);
        let result = validate_config(&config);
        let paths = paths(&result, "api");
        assert!(paths.contains(&"api.base_url".to_string()));
        assert!(paths.contains(&"api.api_key".to_string()));
        assert!(paths.contains(&"api.timeout_secs".to_string()));
        assert_eq!(result.count(Severity::Error), 3);
    }

    #[test]
    fn plain_http_is_a_warning_unless_local() {
        let mut config = SendtickConfig::default();
        config.api.api_key = secrecy::Secret::new("tok".into());
        config.api.base_url = "http://sendtick.co/api/v1".into();
        assert_eq!(validate_config(&config).count(Severity::Warning), 1);

        config.api.base_url = "http://localhost:8080/api/v1".into();
        assert_eq!(validate_config(&config).count(Severity::Warning), 0);
    }

    #[test]
    fn unset_env_placeholder_warns() {
        let result = validate_str(
            "[api]\napi_key = \"${SENDTICK_SURELY_UNSET_VAR_42}\"\n",
            "toml",
        );
        assert_eq!(paths(&result, "env").len(), 1);
    }
}
