use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use videoflix_model::ProgressRecord;

use crate::infra::constants::routes;

/// How the session token is presented in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    #[default]
    Bearer,
    /// Django REST framework style `Token <key>`
    Token,
}

impl AuthScheme {
    pub fn header_value(&self, token: &str) -> String {
        match self {
            AuthScheme::Bearer => format!("Bearer {}", token),
            AuthScheme::Token => format!("Token {}", token),
        }
    }
}

/// HTTP client for the Videoflix backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth_scheme: AuthScheme,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("auth_scheme", &self.auth_scheme)
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = normalize_base_url(base_url.into());
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    "[ApiClient] Falling back to default HTTP client: {}",
                    e
                );
                Client::new()
            });

        info!(
            "[ApiClient] Creating new API client with base URL: {}",
            base_url
        );

        Self {
            client,
            base_url,
            auth_scheme: AuthScheme::default(),
        }
    }

    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    /// Build an endpoint URL from a path relative to the base URL
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        format!("{}/{}", self.base_url, p.trim_start_matches('/'))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_scheme(&self) -> AuthScheme {
        self.auth_scheme
    }

    /// Attach the session token, if any
    fn build_request(
        &self,
        builder: RequestBuilder,
        token: Option<&str>,
    ) -> RequestBuilder {
        match token {
            Some(token) => builder
                .header("Authorization", self.auth_scheme.header_value(token)),
            None => builder,
        }
    }

    /// POST a JSON body to an endpoint that answers without a payload
    pub async fn post_no_content<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        token: Option<&str>,
    ) -> Result<()> {
        let url = self.build_url(path);
        let request = self.build_request(self.client.post(&url).json(body), token);
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => {
                debug!("[ApiClient] POST {} -> {}", url, response.status());
                Ok(())
            }
            status => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(anyhow!(
                    "Request failed with status {}: {}",
                    status,
                    error_text
                ))
            }
        }
    }

    /// Store watch progress for the authenticated user
    pub async fn update_progress(
        &self,
        record: &ProgressRecord,
        token: &str,
    ) -> Result<()> {
        self.post_no_content(routes::PROGRESS, record, Some(token))
            .await
    }
}

/// Add `http://` when the scheme is missing and trim trailing slashes so
/// endpoint paths join with exactly one separator.
fn normalize_base_url(raw: String) -> String {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    let with_scheme =
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed
        } else {
            format!("http://{}", trimmed)
        };
    if with_scheme != raw {
        debug!(
            "[ApiClient] Normalized base URL from '{}' to '{}'",
            raw, with_scheme
        );
    }
    with_scheme
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_scheme_and_loses_trailing_slash() {
        let client = ApiClient::new("localhost:8000/api/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");

        let client = ApiClient::new("https://videoflix.test/api");
        assert_eq!(client.base_url(), "https://videoflix.test/api");
    }

    #[test]
    fn build_url_keeps_endpoint_trailing_slash() {
        let client = ApiClient::new("https://videoflix.test/api/");
        assert_eq!(
            client.build_url(routes::PROGRESS),
            "https://videoflix.test/api/progress/"
        );
        assert_eq!(
            client.build_url("/progress/"),
            "https://videoflix.test/api/progress/"
        );
        assert_eq!(
            client.build_url("https://other.test/x"),
            "https://other.test/x"
        );
    }

    #[test]
    fn auth_scheme_formats_header() {
        assert_eq!(AuthScheme::Bearer.header_value("abc"), "Bearer abc");
        assert_eq!(AuthScheme::Token.header_value("abc"), "Token abc");
    }

    #[tokio::test]
    async fn unreachable_backend_surfaces_an_error() {
        // Port 9 (discard) on localhost is not expected to speak HTTP
        let client = ApiClient::new("http://127.0.0.1:9");
        let record =
            ProgressRecord::new(videoflix_model::AssetId(1), 10.0, 100.0);
        assert!(client.update_progress(&record, "t").await.is_err());
    }
}
