//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. It resolves request
//! paths against the configured base URL and applies a fixed timeout to
//! every call.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use fortuna_application::ports::{HttpTransport, TransportError};
use fortuna_domain::{ApiRequest, ApiResponse, HttpMethod};
use reqwest::{Client, Method};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Settings for [`ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransportConfig {
    /// Backend base URL, e.g. `https://api.example.com/v1`.
    pub base_url: Url,
    /// Timeout for each network call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// User-Agent header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_user_agent() -> String {
    format!("Fortuna/{}", env!("CARGO_PKG_VERSION"))
}

impl TransportConfig {
    /// Config for `base_url` with default timeout and user agent.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: default_user_agent(),
        }
    }

    /// Overrides the timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// HTTP transport backed by `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl ReqwestTransport {
    /// Creates a transport from its settings.
    ///
    /// Redirects are not followed: the backend never redirects API calls and
    /// following one would leak the bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
        })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Joins the base URL and the request path.
    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        let joined = format!("{}{path}", self.base_url);
        Url::parse(&joined).map_err(|e| TransportError::InvalidUrl(format!("{e}: {joined}")))
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(&self, error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                timeout_ms: self.timeout_ms,
            };
        }
        if error.is_connect() {
            return TransportError::ConnectionFailed(error.to_string());
        }
        if error.is_body() || error.is_decode() {
            return TransportError::Body(error.to_string());
        }
        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request.path)?;
        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let error = self.map_error(&e);
            warn!(method = %request.method, path = %request.path, %error, "request failed");
            error
        })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?
            .to_vec();
        let response = ApiResponse::new(status, headers, body, start.elapsed());

        debug!(
            method = %request.method,
            path = %request.path,
            status,
            elapsed_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
            content_type = response.header("content-type").unwrap_or("-"),
            "response received"
        );
        Ok(response)
    }
}
