//! In-process test doubles for the client's collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use fortuna_domain::{ApiRequest, ApiResponse};
use serde_json::{Value, json};

use crate::ports::{HttpTransport, SessionController, TransportError};

/// What the fake refresh endpoint does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshBehavior {
    /// Rotate both tokens when the presented refresh token is current.
    Issue,
    /// Answer 401 to every refresh.
    Reject,
    /// Fail without a response.
    Offline,
}

#[derive(Debug)]
struct BackendState {
    access: String,
    refresh: String,
    generation: u32,
    behavior: RefreshBehavior,
    refresh_delay: Duration,
    fixtures: HashMap<String, Value>,
    log: Vec<ApiRequest>,
}

/// Scripted backend.
///
/// Protected routes answer 200 only for the current access token. Special
/// routes: `/always-401`, `/forbidden-when-stale` (403 instead of 401),
/// `/boom` (500) and `/offline` (timeout).
#[derive(Debug)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
}

impl FakeBackend {
    /// Backend whose current pair is `(access, "refresh-1")`.
    pub fn new(access: &str) -> Self {
        Self {
            state: Mutex::new(BackendState {
                access: access.to_string(),
                refresh: "refresh-1".to_string(),
                generation: 1,
                behavior: RefreshBehavior::Issue,
                refresh_delay: Duration::ZERO,
                fixtures: HashMap::new(),
                log: Vec::new(),
            }),
        }
    }

    pub fn set_refresh_behavior(&self, behavior: RefreshBehavior) {
        self.lock().behavior = behavior;
    }

    pub fn set_refresh_delay_ms(&self, millis: u64) {
        self.lock().refresh_delay = Duration::from_millis(millis);
    }

    /// Body returned for `route` to an authorized caller.
    pub fn set_fixture(&self, route: &str, body: Value) {
        self.lock().fixtures.insert(route.to_string(), body);
    }

    pub fn refresh_calls(&self) -> usize {
        self.requests("/auth/refresh").len()
    }

    pub fn refresh_tokens_sent(&self) -> Vec<String> {
        self.requests("/auth/refresh")
            .iter()
            .filter_map(|r| r.body.as_ref()?.get("refreshToken")?.as_str().map(String::from))
            .collect()
    }

    /// Bearer tokens presented on each call to `route`, in order.
    pub fn bearers(&self, route: &str) -> Vec<Option<String>> {
        self.requests(route)
            .iter()
            .map(|r| r.bearer().map(String::from))
            .collect()
    }

    pub fn requests(&self, route: &str) -> Vec<ApiRequest> {
        self.lock()
            .log
            .iter()
            .filter(|r| r.route() == route)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut state = self.lock();
        match state.behavior {
            RefreshBehavior::Offline => {
                Err(TransportError::ConnectionFailed("connection refused".to_string()))
            }
            RefreshBehavior::Reject => Ok(expired_refresh()),
            RefreshBehavior::Issue => {
                let presented = request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("refreshToken"))
                    .and_then(Value::as_str);
                if presented != Some(state.refresh.as_str()) {
                    return Ok(expired_refresh());
                }
                state.generation += 1;
                state.access = format!("access-{}", state.generation);
                state.refresh = format!("refresh-{}", state.generation);
                Ok(ApiResponse::json_body(
                    200,
                    &json!({"accessToken": state.access, "refreshToken": state.refresh}),
                ))
            }
        }
    }

    fn login(&self, request: &ApiRequest) -> ApiResponse {
        let state = self.lock();
        let body = request.body.clone().unwrap_or(Value::Null);
        if body["email"] == "ada@example.com" && body["password"] == "hunter2" {
            return ApiResponse::json_body(
                200,
                &json!({
                    "accessToken": state.access,
                    "refreshToken": state.refresh,
                    "user": {"id": "u1", "name": "Ada", "email": "ada@example.com", "coins": 5}
                }),
            );
        }
        ApiResponse::json_body(401, &json!({"message": "invalid email or password"}))
    }

    fn protected(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let state = self.lock();
        let route = request.route();
        let authorized = request.bearer() == Some(state.access.as_str());
        let response = match route {
            "/offline" => return Err(TransportError::Timeout { timeout_ms: 30_000 }),
            "/boom" => {
                ApiResponse::json_body(500, &json!({"message": "the stars are misaligned"}))
            }
            "/always-401" => ApiResponse::json_body(401, &json!({"message": "jwt expired"})),
            "/forbidden-when-stale" if !authorized => {
                ApiResponse::json_body(403, &json!({"message": "forbidden"}))
            }
            _ if !authorized => ApiResponse::json_body(401, &json!({"message": "jwt expired"})),
            _ => {
                let body = state
                    .fixtures
                    .get(route)
                    .cloned()
                    .unwrap_or_else(|| json!({"ok": true, "path": route}));
                ApiResponse::json_body(200, &body)
            }
        };
        Ok(response)
    }
}

#[async_trait]
impl HttpTransport for FakeBackend {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let delay = {
            let mut state = self.lock();
            state.log.push(request.clone());
            state.refresh_delay
        };
        match request.route() {
            "/auth/refresh" => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                self.refresh(request)
            }
            "/auth/login" => Ok(self.login(request)),
            _ => self.protected(request),
        }
    }
}

fn expired_refresh() -> ApiResponse {
    ApiResponse::json_body(401, &json!({"message": "refresh token expired"}))
}

/// Session controller that counts forced logouts.
#[derive(Debug, Default)]
pub struct RecordingSession {
    pub logouts: AtomicUsize,
}

impl SessionController for RecordingSession {
    fn force_logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }
}
