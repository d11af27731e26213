//! Backend response type.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::StatusCode;

/// A response received from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers, lower-cased names.
    pub headers: HashMap<String, String>,
    /// Raw response body.
    pub body: Vec<u8>,
    /// Time between sending the request and reading the full body.
    pub duration: Duration,
}

/// Error payload shapes the backend uses.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiResponse {
    /// Creates a response from raw parts.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        Self {
            status: status.into(),
            headers,
            body,
            duration,
        }
    }

    /// Creates a response with a JSON body and no headers.
    #[must_use]
    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, HashMap::new(), body.to_string().into_bytes(), Duration::ZERO)
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as a lossy UTF-8 string.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserializes the body as JSON.
    ///
    /// An empty body is read as JSON `null`, so `()` and `Option<T>` targets
    /// accept `204 No Content`.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.is_empty() {
            return serde_json::from_slice(b"null");
        }
        serde_json::from_slice(&self.body)
    }

    /// Returns a header value, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Extracts the backend's error message from the body, if any.
    ///
    /// Looks for `message` then `error` in a JSON object, then a bare JSON
    /// string, and falls back to a short plain-text body. HTML error pages
    /// (proxies, gateways) yield `None`.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        if self.header("content-type").is_some_and(|v| v.contains("html")) {
            return None;
        }
        if let Ok(payload) = serde_json::from_slice::<ErrorPayload>(&self.body) {
            return payload.message.or(payload.error);
        }
        if let Ok(message) = serde_json::from_slice::<String>(&self.body) {
            let message = message.trim();
            return (!message.is_empty()).then(|| message.to_string());
        }
        let text = self.text();
        let text = text.trim();
        (!text.is_empty() && text.len() <= 200 && !text.starts_with('<')).then(|| text.to_string())
    }
}
