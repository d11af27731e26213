//! Bearer-token client with transparent, single-flight token refresh.

use std::sync::{Arc, PoisonError, RwLock};

use fortuna_domain::{ApiRequest, ApiResponse, Credentials, RefreshRequest, token_preview};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::config::ClientConfig;
use super::refresh::{RefreshGate, RefreshOutcome};
use crate::error::{ApiError, ApiResult, NO_REFRESH_TOKEN};
use crate::ports::{HttpTransport, SessionController, TokenStore};

/// Fallback bearer token, shared with the refresh task.
type TokenSlot = Arc<RwLock<Option<String>>>;

/// One in-progress call: the request as it will be sent, and whether it has
/// already been replayed after a refresh.
#[derive(Debug)]
struct RequestContext {
    request: ApiRequest,
    retried: bool,
}

/// API client that attaches the stored access token to every request and
/// recovers from an expired token by refreshing it once per wave of
/// failures.
///
/// Construct it once and share it (`Arc`) across the application; the
/// refresh flag and the queue of waiting requests live in the instance.
/// The refresh itself runs on its own task, so a caller that gives up does
/// not abort it for the others.
pub struct AuthenticatedHttpClient<T> {
    transport: Arc<T>,
    tokens: Arc<dyn TokenStore>,
    session: Arc<dyn SessionController>,
    config: ClientConfig,
    default_token: TokenSlot,
    refresh: Arc<RefreshGate>,
}

impl<T: HttpTransport> AuthenticatedHttpClient<T> {
    /// Creates a client with the default configuration.
    pub fn new(
        transport: T,
        tokens: Arc<dyn TokenStore>,
        session: Arc<dyn SessionController>,
    ) -> Self {
        Self::with_config(transport, tokens, session, ClientConfig::default())
    }

    /// Creates a client with an explicit configuration.
    pub fn with_config(
        transport: T,
        tokens: Arc<dyn TokenStore>,
        session: Arc<dyn SessionController>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport: Arc::new(transport),
            tokens,
            session,
            config,
            default_token: Arc::default(),
            refresh: Arc::new(RefreshGate::new()),
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The token store shared with this client.
    #[must_use]
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Returns true while a token refresh is running.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_refreshing()
    }

    /// Token attached when the store holds none; set by the last refresh.
    #[must_use]
    pub fn default_token(&self) -> Option<String> {
        self.default_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forgets the fallback token, e.g. after an explicit logout.
    pub fn clear_default_token(&self) {
        set_token(&self.default_token, None);
    }

    /// Sends a request and returns the successful response.
    ///
    /// A 401/403 on a non-auth endpoint triggers one refresh-and-replay. If
    /// another request is already refreshing, this one waits for that result
    /// instead of starting a second refresh.
    ///
    /// # Errors
    ///
    /// - `Network` when no response was received
    /// - `SessionInvalid` when the token could not be refreshed (the session
    ///   has been ended)
    /// - `AuthenticationExpired` when the replayed request is rejected again
    /// - `Upstream` for any other non-2xx response
    pub async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        request.validate()?;
        let mut ctx = RequestContext {
            request,
            retried: false,
        };
        self.authorize(&mut ctx.request).await?;

        let response = self.transport.execute(&ctx.request).await?;
        if response.is_success() {
            return Ok(response);
        }
        if !self.should_refresh(&ctx, &response) {
            return Err(self.reject(&ctx, &response));
        }

        debug!(
            method = %ctx.request.method,
            path = %ctx.request.path,
            status = response.status.as_u16(),
            "access token rejected, refreshing"
        );
        ctx.retried = true;
        let token = self.refreshed_token().await?;
        ctx.request.set_bearer(&token);

        let response = self.transport.execute(&ctx.request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(self.reject(&ctx, &response))
        }
    }

    /// Sends a request and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`send`](Self::send), or `Decode` if the body
    /// does not match `R`.
    pub async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<R> {
        let response = self.send(request).await?;
        Ok(response.json()?)
    }

    /// GETs a path and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.fetch(ApiRequest::get(path)).await
    }

    /// POSTs a JSON body and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch); serializing the body can fail with `Decode`.
    pub async fn post_json<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<R> {
        let body = serde_json::to_value(body)?;
        self.fetch(ApiRequest::post(path).with_body(body)).await
    }

    /// DELETEs a path.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn delete(&self, path: &str) -> ApiResult<ApiResponse> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Attaches the current access token, falling back to the default one.
    async fn authorize(&self, request: &mut ApiRequest) -> ApiResult<()> {
        let token = match self.tokens.access_token().await? {
            Some(token) => Some(token),
            None => self.default_token(),
        };
        if let Some(token) = token {
            request.set_bearer(&token);
        }
        Ok(())
    }

    fn should_refresh(&self, ctx: &RequestContext, response: &ApiResponse) -> bool {
        let status = response.status;
        if !status.is_auth_failure() {
            return false;
        }
        if status == fortuna_domain::StatusCode::FORBIDDEN && !self.config.refresh_on_forbidden {
            return false;
        }
        if self.config.is_auth_endpoint(ctx.request.route()) {
            return false;
        }
        !ctx.retried
    }

    /// Maps a final non-2xx response to the error handed to the caller.
    fn reject(&self, ctx: &RequestContext, response: &ApiResponse) -> ApiError {
        let message = response.error_message();
        if ctx.retried && response.status.is_auth_failure() {
            warn!(
                path = %ctx.request.path,
                status = response.status.as_u16(),
                "request rejected again after token refresh"
            );
            return ApiError::AuthenticationExpired {
                status: response.status,
                message,
            };
        }
        ApiError::upstream(response.status, message)
    }

    /// Returns a fresh access token, starting the refresh or waiting on the
    /// one already running.
    async fn refreshed_token(&self) -> ApiResult<String> {
        let (lease, outcome) = self.refresh.enter().into_parts();
        if let Some(lease) = lease {
            let job = self.refresh_job();
            tokio::spawn(async move {
                let result = job.run().await;
                let released = lease.settle(&result);
                match &result {
                    Ok(_) => info!(released, "token refreshed"),
                    Err(error) => warn!(released, %error, "token refresh failed"),
                }
            });
        }
        outcome
            .await
            .unwrap_or_else(|_| Err(ApiError::Network("token refresh was cancelled".to_string())))
    }

    fn refresh_job(&self) -> RefreshJob<T> {
        RefreshJob {
            transport: Arc::clone(&self.transport),
            tokens: Arc::clone(&self.tokens),
            session: Arc::clone(&self.session),
            refresh_path: self.config.refresh_path.clone(),
            default_token: Arc::clone(&self.default_token),
        }
    }
}

/// Everything one refresh needs, owned so it can run on its own task.
struct RefreshJob<T> {
    transport: Arc<T>,
    tokens: Arc<dyn TokenStore>,
    session: Arc<dyn SessionController>,
    refresh_path: String,
    default_token: TokenSlot,
}

impl<T: HttpTransport> RefreshJob<T> {
    async fn run(self) -> RefreshOutcome {
        let refresh_token = match self.tokens.refresh_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                return Err(self
                    .end_session(ApiError::SessionInvalid(NO_REFRESH_TOKEN.to_string()))
                    .await);
            }
            Err(error) => {
                return Err(self
                    .end_session(ApiError::SessionInvalid(format!(
                        "{NO_REFRESH_TOKEN}: {error}"
                    )))
                    .await);
            }
        };

        let credentials = match self.call_refresh_endpoint(refresh_token).await {
            Ok(credentials) => credentials,
            Err(error) => return Err(self.end_session(error).await),
        };

        if let Err(error) = self.tokens.save(&credentials).await {
            return Err(self
                .end_session(ApiError::SessionInvalid(format!(
                    "could not store refreshed credentials: {error}"
                )))
                .await);
        }
        debug!(
            access_token = %token_preview(&credentials.access_token),
            "stored refreshed credentials"
        );
        set_token(&self.default_token, Some(credentials.access_token.clone()));
        Ok(credentials.access_token)
    }

    /// Calls the refresh endpoint straight through the transport, so the
    /// call is never itself intercepted and retried.
    async fn call_refresh_endpoint(&self, refresh_token: String) -> ApiResult<Credentials> {
        let body = serde_json::to_value(RefreshRequest { refresh_token })?;
        let request = ApiRequest::post(self.refresh_path.as_str()).with_body(body);

        let response = self
            .transport
            .execute(&request)
            .await
            .map_err(|e| ApiError::SessionInvalid(format!("token refresh failed: {e}")))?;

        if !response.is_success() {
            return Err(ApiError::SessionInvalid(response.error_message().unwrap_or_else(
                || format!("token refresh rejected with status {}", response.status.as_u16()),
            )));
        }

        let credentials: Credentials = response
            .json()
            .map_err(|e| ApiError::SessionInvalid(format!("malformed refresh response: {e}")))?;
        credentials
            .validate()
            .map_err(|e| ApiError::SessionInvalid(format!("malformed refresh response: {e}")))?;
        Ok(credentials)
    }

    /// Clears stored credentials and forces logout; returns `error` for chaining.
    async fn end_session(&self, error: ApiError) -> ApiError {
        if let Err(clear_error) = self.tokens.clear().await {
            warn!(error = %clear_error, "failed to clear stored credentials");
        }
        set_token(&self.default_token, None);
        self.session.force_logout();
        warn!(%error, "session could not be recovered, logged out");
        error
    }
}

fn set_token(slot: &RwLock<Option<String>>, token: Option<String>) {
    *slot.write().unwrap_or_else(PoisonError::into_inner) = token;
}

impl<T> std::fmt::Debug for AuthenticatedHttpClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedHttpClient")
            .field("config", &self.config)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}
