//! HTTP transport port
//!
//! The raw "send one request, read one response" capability. The
//! authenticated client and the refresh call are both built on it.

use std::sync::Arc;

use async_trait::async_trait;
use fortuna_domain::{ApiRequest, ApiResponse};

/// Errors raised when no response could be obtained.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the client-side timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that was exceeded.
        timeout_ms: u64,
    },

    /// A connection to the backend could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The base URL and path do not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for sending requests to the backend.
///
/// Implementations return every HTTP response, including non-2xx ones, as
/// `Ok`; `Err` is reserved for transport-level failures.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    /// Sends the request and reads the full response.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` when no response was received.
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).execute(request).await
    }
}
