use std::time::Duration;

use {
    async_trait::async_trait,
    reqwest::header::ACCEPT,
    secrecy::{ExposeSecret, Secret},
    serde_json::Value,
    tracing::debug,
};

use sendtick_config::ApiConfig;

use crate::{
    error::{Error, Result},
    request::RequestSpec,
};

/// Executes one [`RequestSpec`] with credentials injected and returns the
/// parsed JSON body. Non-success responses are errors.
///
/// Implemented by [`HttpApiClient`]; tests and embedding hosts can supply
/// their own.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn request(&self, spec: &RequestSpec) -> Result<Value>;
}

/// reqwest-backed client for the Sendtick REST API.
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Secret<String>,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Secret<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Build a client with the configured user agent and timeout.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| Error::transport("failed to build HTTP client", e))?;
        Ok(Self::new(config.base_url.clone(), config.api_key.clone()).with_http_client(http))
    }

    /// Replace the underlying reqwest client (connection pool, proxy, TLS).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn request(&self, spec: &RequestSpec) -> Result<Value> {
        let url = self.url(&spec.path);
        debug!(method = %spec.method, path = %spec.path, "sendtick request");

        let mut req = self
            .http
            .request(spec.method.clone(), &url)
            .bearer_auth(self.api_key.expose_secret())
            .header(ACCEPT, "application/json");
        if !spec.query.is_empty() {
            req = req.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            req = req.json(body);
        }

        let context = format!("{} {}", spec.method, spec.path);
        let resp = req
            .send()
            .await
            .map_err(|e| Error::transport(context.clone(), e))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::transport(context, e))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), path = %spec.path, "sendtick request failed");
            return Err(Error::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        // DELETE and friends may answer 204 with no body.
        if text.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{operations, request::JsonBody},
        mockito::Matcher,
        serde_json::json,
    };

    fn client(server: &mockito::Server) -> HttpApiClient {
        HttpApiClient::new(format!("{}/api/v1/", server.url()), Secret::new("tok_test".into()))
    }

    #[tokio::test]
    async fn get_sends_bearer_token_and_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/contacts/42")
            .match_header("authorization", "Bearer tok_test")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"42","name":"Aisha"}"#)
            .create_async()
            .await;

        let body = client(&server)
            .request(&operations::get_contact("42").unwrap())
            .await
            .unwrap();
        assert_eq!(body, json!({ "id": "42", "name": "Aisha" }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/media")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "url": "https://cdn.example.com/a.png" })))
            .with_status(201)
            .with_body(r#"{"id":"m_1"}"#)
            .create_async()
            .await;

        let spec = RequestSpec::post(
            "/media",
            JsonBody::new().field("url", "https://cdn.example.com/a.png"),
        );
        let body = client(&server).request(&spec).await.unwrap();
        assert_eq!(body["id"], "m_1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_sends_limit_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/sessions")
            .match_query(Matcher::UrlEncoded("limit".into(), "10".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let spec = operations::list_sessions(operations::ListOptions::limit(10)).unwrap();
        let body = client(&server).request(&spec).await.unwrap();
        assert_eq!(body, json!([]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/contacts/missing")
            .with_status(404)
            .with_body(r#"{"message":"Contact not found"}"#)
            .create_async()
            .await;

        let err = client(&server)
            .request(&RequestSpec::get("/contacts/missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream { status: 404, .. }));
        assert!(err.to_string().contains("Contact not found"));
    }

    #[tokio::test]
    async fn empty_success_body_is_empty_object() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/api/v1/contacts/42")
            .with_status(204)
            .create_async()
            .await;

        let body = client(&server)
            .request(&RequestSpec::delete("/contacts/42"))
            .await
            .unwrap();
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/sessions")
            .with_status(200)
            .with_body("{not json}")
            .create_async()
            .await;

        let err = client(&server)
            .request(&RequestSpec::get("/sessions"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let client = HttpApiClient::new("http://127.0.0.1:1/api/v1", Secret::new("t".into()));
        let err = client
            .request(&RequestSpec::get("/sessions"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
        assert!(err.to_string().contains("GET /sessions"));
    }

    #[test]
    fn from_config_trims_trailing_slash() {
        let config = ApiConfig {
            base_url: "https://sendtick.co/api/v1/".into(),
            ..ApiConfig::default()
        };
        let client = HttpApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://sendtick.co/api/v1");
        assert_eq!(client.url("/messages"), "https://sendtick.co/api/v1/messages");
    }
}
