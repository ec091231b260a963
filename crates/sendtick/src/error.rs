/// Crate-wide result type for connector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating input or talking to the Sendtick API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or malformed input; raised before any network call.
    #[error("{message}")]
    Validation { message: String },

    /// The (resource, operation) pair is unknown or not enabled.
    #[error("Unsupported resource/operation: {resource}/{operation}")]
    Unsupported { resource: String, operation: String },

    /// The API answered with a non-success status.
    #[error("Sendtick API request failed ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Sendtick API request failed: {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// A success response whose body is not valid JSON.
    #[error("invalid JSON in Sendtick API response: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn validation(message: impl std::fmt::Display) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unsupported(resource: impl std::fmt::Display, operation: impl std::fmt::Display) -> Self {
        Self::Unsupported {
            resource: resource.to_string(),
            operation: operation.to_string(),
        }
    }

    #[must_use]
    pub fn transport(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            context: context.into(),
            source,
        }
    }

    /// Whether the error was raised locally, before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Unsupported { .. })
    }

    /// Whether the error came from the API or the network.
    pub fn is_upstream(&self) -> bool {
        !self.is_validation()
    }
}
