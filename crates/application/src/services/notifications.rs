//! In-app notifications.

use std::sync::Arc;

use fortuna_domain::{ApiRequest, Notification};

use crate::client::AuthenticatedHttpClient;
use crate::error::ApiResult;
use crate::ports::HttpTransport;

/// Notification inbox.
pub struct NotificationService<T> {
    client: Arc<AuthenticatedHttpClient<T>>,
}

impl<T: HttpTransport> NotificationService<T> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedHttpClient<T>>) -> Self {
        Self { client }
    }

    /// Lists notifications, newest first.
    ///
    /// # Errors
    /// Any error of the client.
    pub async fn list(&self) -> ApiResult<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self.client.get_json("/notifications").await?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    /// Marks one notification as read.
    ///
    /// # Errors
    /// Any error of the client.
    pub async fn mark_read(&self, id: &str) -> ApiResult<()> {
        self.client
            .send(ApiRequest::post(format!("/notifications/{id}/read")))
            .await?;
        Ok(())
    }
}
