//! Config schema types (API endpoint, credential, connector capabilities).

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Base URL of the Sendtick REST API, including the version prefix.
pub const DEFAULT_BASE_URL: &str = "https://sendtick.co/api/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SendtickConfig {
    pub api: ApiConfig,
    pub connector: ConnectorConfig,
}

/// Where and how outbound API calls are made.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root; request paths such as `/messages` are appended to it.
    pub base_url: String,

    /// Bearer token injected into every request.
    #[serde(serialize_with = "serialize_secret")]
    pub api_key: Secret<String>,

    /// Per-request timeout. `None` leaves the HTTP client default in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    pub user_agent: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: Secret::new(String::new()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("sendtick-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Whether a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }
}

/// Which parts of the connector are exposed to workflows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Expose the `media` resource (upload/get/list).
    pub media_enabled: bool,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            media_enabled: true,
        }
    }
}
