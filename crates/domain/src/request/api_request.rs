//! Backend request descriptor.

use serde::{Deserialize, Serialize};

use super::HttpMethod;
use crate::error::{DomainError, DomainResult};

/// Name of the header carrying the bearer token.
pub const AUTHORIZATION: &str = "Authorization";

/// A request against the backend API.
///
/// The path is relative to the configured base URL; the transport joins the
/// two. Headers are kept in insertion order and matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the API base URL, starting with `/`.
    pub path: String,
    /// Query parameters in order.
    #[serde(default)]
    pub query: Vec<(String, String)>,
    /// Request headers in order.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Optional JSON body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Creates a request with the given method and path.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets a header, replacing any existing header with the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header in place, replacing any existing header with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Returns the value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Attaches `Authorization: Bearer <token>`.
    pub fn set_bearer(&mut self, token: &str) {
        self.set_header(AUTHORIZATION, format!("Bearer {token}"));
    }

    /// Returns the bearer token currently attached, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.header(AUTHORIZATION)
            .and_then(|v| v.strip_prefix("Bearer "))
    }

    /// The path without query string or trailing slash, used for endpoint matching.
    #[must_use]
    pub fn route(&self) -> &str {
        let path = self.path.split('?').next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        }
    }

    /// Checks that the path is usable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPath` if the path is empty or relative.
    pub fn validate(&self) -> DomainResult<()> {
        if self.path.is_empty() || !self.path.starts_with('/') {
            return Err(DomainError::InvalidPath(self.path.clone()));
        }
        Ok(())
    }
}
