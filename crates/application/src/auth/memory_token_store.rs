//! In-memory credential storage.
//!
//! Used by tests and by sessions that should not outlive the process.

use std::sync::Arc;

use async_trait::async_trait;
use fortuna_domain::Credentials;
use tokio::sync::RwLock;

use crate::ports::{TokenStore, TokenStoreError};

/// Thread-safe in-memory token store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    credentials: Arc<RwLock<Option<Credentials>>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a pair.
    #[must_use]
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: Arc::new(RwLock::new(Some(credentials))),
        }
    }

    /// Returns true if a pair is stored.
    pub async fn is_signed_in(&self) -> bool {
        self.credentials.read().await.is_some()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn credentials(&self) -> Result<Option<Credentials>, TokenStoreError> {
        Ok(self.credentials.read().await.clone())
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), TokenStoreError> {
        *self.credentials.write().await = Some(credentials.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        self.credentials.write().await.take();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_save_replaces_whole_pair() {
        let store = MemoryTokenStore::with_credentials(Credentials::new("a1", "r1"));

        store.save(&Credentials::new("a2", "r2")).await.unwrap();

        assert_eq!(
            store.credentials().await.unwrap(),
            Some(Credentials::new("a2", "r2"))
        );
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("a2"));
        assert_eq!(store.refresh_token().await.unwrap().as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = MemoryTokenStore::with_credentials(Credentials::new("a1", "r1"));
        assert!(store.is_signed_in().await);

        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert!(!store.is_signed_in().await);
        assert_eq!(store.refresh_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_refresh_token_is_absent() {
        let store = MemoryTokenStore::with_credentials(Credentials::new("a1", ""));
        assert_eq!(store.refresh_token().await.unwrap(), None);
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("a1"));
    }
}
