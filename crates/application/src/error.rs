//! Application error types

use fortuna_domain::{DomainError, StatusCode};
use thiserror::Error;

use crate::ports::{TokenStoreError, TransportError};

/// Message used when a refresh is needed but no refresh token is stored.
pub const NO_REFRESH_TOKEN: &str = "no refresh token available";

/// Errors surfaced to callers of the API client.
///
/// The type is `Clone` so that a single refresh failure can be handed to
/// every request queued behind it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received (connect failure, timeout, broken body).
    #[error("network error: {0}")]
    Network(String),

    /// The backend rejected the access token on a request that was already
    /// replayed after a refresh.
    #[error("authentication expired ({status})")]
    AuthenticationExpired {
        /// 401 or 403.
        status: StatusCode,
        /// Backend-provided message, if any.
        message: Option<String>,
    },

    /// The session cannot be recovered; the user has been logged out.
    #[error("session invalid: {0}")]
    SessionInvalid(String),

    /// Any other non-2xx response.
    #[error("{message}")]
    Upstream {
        /// Response status.
        status: StatusCode,
        /// Backend-provided message, or a generic one.
        message: String,
    },

    /// The request was rejected before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response body did not have the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Reading or writing stored credentials failed.
    #[error("token store error: {0}")]
    TokenStore(String),
}

impl ApiError {
    /// Builds an `Upstream` error, falling back to a generic message.
    #[must_use]
    pub fn upstream(status: StatusCode, message: Option<String>) -> Self {
        Self::Upstream {
            status,
            message: message
                .unwrap_or_else(|| format!("request failed with status {}", status.as_u16())),
        }
    }

    /// Returns true if the error ended the session, so the UI should route to login.
    #[must_use]
    pub const fn is_session_terminal(&self) -> bool {
        matches!(self, Self::SessionInvalid(_))
    }

    /// Returns the HTTP status attached to this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::AuthenticationExpired { status, .. } | Self::Upstream { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::InvalidUrl(url) => Self::InvalidRequest(url),
            other => Self::Network(other.to_string()),
        }
    }
}

impl From<TokenStoreError> for ApiError {
    fn from(error: TokenStoreError) -> Self {
        Self::TokenStore(error.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::InvalidRequest(error.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
