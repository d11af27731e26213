//! Client configuration.

use serde::{Deserialize, Serialize};

/// Behaviour switches and endpoint paths for [`AuthenticatedHttpClient`].
///
/// [`AuthenticatedHttpClient`]: super::AuthenticatedHttpClient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Login endpoint.
    pub login_path: String,
    /// Registration endpoint.
    pub register_path: String,
    /// Token refresh endpoint.
    pub refresh_path: String,
    /// Logout endpoint. Not an auth endpoint for retry purposes: a stale
    /// token on logout is refreshed like any other request.
    pub logout_path: String,
    /// Treat 403 like 401 and attempt a refresh.
    pub refresh_on_forbidden: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            login_path: "/auth/login".to_string(),
            register_path: "/auth/register".to_string(),
            refresh_path: "/auth/refresh".to_string(),
            logout_path: "/auth/logout".to_string(),
            refresh_on_forbidden: true,
        }
    }
}

impl ClientConfig {
    /// Returns true for login, register and refresh routes.
    ///
    /// `route` is a path without query string or trailing slash, as
    /// produced by `ApiRequest::route`.
    #[must_use]
    pub fn is_auth_endpoint(&self, route: &str) -> bool {
        [&self.login_path, &self.register_path, &self.refresh_path]
            .into_iter()
            .any(|path| path.trim_end_matches('/') == route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_endpoints() {
        let config = ClientConfig::default();
        assert!(config.is_auth_endpoint("/auth/login"));
        assert!(config.is_auth_endpoint("/auth/register"));
        assert!(config.is_auth_endpoint("/auth/refresh"));
        assert!(!config.is_auth_endpoint("/auth/logout"));
        assert!(!config.is_auth_endpoint("/users/me"));
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"refresh_on_forbidden": false}"#).unwrap_or_default();
        assert!(!config.refresh_on_forbidden);
        assert_eq!(config.refresh_path, "/auth/refresh");
    }
}
