//! Sign-in, registration and sign-out.

use std::sync::Arc;

use fortuna_domain::{ApiRequest, AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use tracing::debug;

use crate::auth::SessionManager;
use crate::client::AuthenticatedHttpClient;
use crate::error::{ApiError, ApiResult};
use crate::ports::HttpTransport;

/// Profile endpoint of the signed-in user.
const PROFILE_PATH: &str = "/users/me";

/// Account operations that change the session.
pub struct AuthService<T> {
    client: Arc<AuthenticatedHttpClient<T>>,
    session: Arc<SessionManager>,
}

impl<T: HttpTransport> AuthService<T> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedHttpClient<T>>, session: Arc<SessionManager>) -> Self {
        Self { client, session }
    }

    /// Signs in with email and password and stores the issued credentials.
    ///
    /// # Errors
    /// `Upstream` with the backend's message for wrong credentials; any
    /// error of the client otherwise.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<UserProfile> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self
            .client
            .post_json(&self.client.config().login_path, &body)
            .await?;
        self.start_session(response).await
    }

    /// Creates an account and signs in.
    ///
    /// # Errors
    /// `Upstream` with the backend's message (e.g. email already used).
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<UserProfile> {
        let response: AuthResponse = self
            .client
            .post_json(&self.client.config().register_path, request)
            .await?;
        self.start_session(response).await
    }

    /// Signs out: tells the backend when possible, then drops local state.
    ///
    /// # Errors
    /// Only fails if the stored credentials cannot be cleared.
    pub async fn logout(&self) -> ApiResult<()> {
        let request = ApiRequest::post(self.client.config().logout_path.as_str());
        if let Err(error) = self.client.send(request).await {
            debug!(%error, "backend logout failed, clearing local session anyway");
        }
        self.client.token_store().clear().await?;
        self.client.clear_default_token();
        self.session.sign_out();
        Ok(())
    }

    /// Resumes a session from stored credentials; returns whether one existed.
    ///
    /// # Errors
    /// Returns `TokenStore` if the store cannot be read.
    pub async fn restore(&self) -> ApiResult<bool> {
        let restored = self.client.token_store().credentials().await?.is_some();
        if restored {
            self.session.sign_in(None);
        }
        Ok(restored)
    }

    /// Fetches the signed-in user's profile.
    ///
    /// # Errors
    /// Any error of the client.
    pub async fn profile(&self) -> ApiResult<UserProfile> {
        self.client.get_json(PROFILE_PATH).await
    }

    async fn start_session(&self, response: AuthResponse) -> ApiResult<UserProfile> {
        let credentials = response.credentials();
        credentials
            .validate()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.client.token_store().save(&credentials).await?;
        self.session.sign_in(Some(response.user.id.clone()));
        Ok(response.user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use fortuna_domain::{Credentials, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::auth::{MemoryTokenStore, SessionState};
    use crate::ports::TokenStore;
    use crate::testing::FakeBackend;

    fn service(
        tokens: MemoryTokenStore,
    ) -> (Arc<FakeBackend>, Arc<SessionManager>, AuthService<Arc<FakeBackend>>) {
        let backend = Arc::new(FakeBackend::new("access-1"));
        let session = Arc::new(SessionManager::new());
        let client = Arc::new(AuthenticatedHttpClient::new(
            Arc::clone(&backend),
            Arc::new(tokens),
            session.clone(),
        ));
        (backend, session.clone(), AuthService::new(client, session))
    }

    #[tokio::test]
    async fn test_login_stores_credentials_and_signs_in() {
        let tokens = MemoryTokenStore::new();
        let (_backend, session, auth) = service(tokens.clone());

        let user = auth.login("ada@example.com", "hunter2").await.unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.coins, 5);
        assert_eq!(
            tokens.credentials().await.unwrap(),
            Some(Credentials::new("access-1", "refresh-1"))
        );
        assert_eq!(
            session.state(),
            SessionState::Authenticated {
                user_id: Some("u1".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_wrong_password_surfaces_backend_message() {
        let tokens = MemoryTokenStore::new();
        let (backend, session, auth) = service(tokens.clone());

        let error = auth.login("ada@example.com", "nope").await.unwrap_err();

        assert_eq!(
            error,
            ApiError::Upstream {
                status: StatusCode::UNAUTHORIZED,
                message: "invalid email or password".to_string(),
            }
        );
        assert_eq!(backend.refresh_calls(), 0);
        assert!(!session.is_authenticated());
        assert_eq!(tokens.credentials().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let tokens = MemoryTokenStore::with_credentials(Credentials::new("access-1", "refresh-1"));
        let (backend, session, auth) = service(tokens.clone());
        assert!(auth.restore().await.unwrap());

        auth.logout().await.unwrap();

        assert_eq!(backend.requests("/auth/logout").len(), 1);
        assert_eq!(tokens.credentials().await.unwrap(), None);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_without_credentials() {
        let (_backend, session, auth) = service(MemoryTokenStore::new());

        assert!(!auth.restore().await.unwrap());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_profile_after_expired_token() {
        let tokens = MemoryTokenStore::with_credentials(Credentials::new("stale", "refresh-1"));
        let (backend, _session, auth) = service(tokens);
        backend.set_fixture(
            "/users/me",
            json!({"id": "u1", "name": "Ada", "email": "ada@example.com", "birthDate": "1990-08-01"}),
        );

        let profile = auth.profile().await.unwrap();

        assert_eq!(profile.name, "Ada");
        assert!(profile.birth_date.is_some());
        assert_eq!(backend.refresh_calls(), 1);
    }
}
