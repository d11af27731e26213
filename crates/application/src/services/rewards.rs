//! Daily wheel spin.

use std::sync::Arc;

use fortuna_domain::{WheelReward, WheelStatus};

use crate::client::AuthenticatedHttpClient;
use crate::error::ApiResult;
use crate::ports::HttpTransport;

/// Wheel-spin rewards.
pub struct RewardService<T> {
    client: Arc<AuthenticatedHttpClient<T>>,
}

impl<T: HttpTransport> RewardService<T> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedHttpClient<T>>) -> Self {
        Self { client }
    }

    /// Whether a spin is available.
    ///
    /// # Errors
    /// Any error of the client.
    pub async fn wheel_status(&self) -> ApiResult<WheelStatus> {
        self.client.get_json("/wheel/status").await
    }

    /// Spins the wheel. The backend answers 409 while the wheel is locked,
    /// which surfaces as `Upstream`.
    ///
    /// # Errors
    /// Any error of the client.
    pub async fn spin_wheel(&self) -> ApiResult<WheelReward> {
        self.client
            .post_json("/wheel/spin", &serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use fortuna_domain::{Credentials, RewardKind};
    use serde_json::json;

    use super::*;
    use crate::auth::{MemoryTokenStore, SessionManager};
    use crate::testing::FakeBackend;

    #[tokio::test]
    async fn test_spin_decodes_reward() {
        let backend = Arc::new(FakeBackend::new("access-1"));
        backend.set_fixture(
            "/wheel/spin",
            json!({"kind": "coins", "amount": 20, "balance": 45}),
        );
        let client = AuthenticatedHttpClient::new(
            Arc::clone(&backend),
            Arc::new(MemoryTokenStore::with_credentials(Credentials::new(
                "access-1",
                "refresh-1",
            ))),
            Arc::new(SessionManager::new()),
        );
        let rewards = RewardService::new(Arc::new(client));

        let reward = rewards.spin_wheel().await.unwrap();

        assert_eq!(reward.kind, RewardKind::Coins);
        assert_eq!(reward.balance, 45);
    }
}
