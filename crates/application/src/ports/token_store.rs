//! Token store port
//!
//! Defines the interface for credential persistence.

use async_trait::async_trait;
use fortuna_domain::Credentials;

/// Errors that can occur during credential storage.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Storage for the current credential pair.
///
/// The pair is only ever written as a whole: `save` replaces both tokens at
/// once and `clear` removes both.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Loads the stored pair, or `None` when signed out.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    async fn credentials(&self) -> Result<Option<Credentials>, TokenStoreError>;

    /// Replaces the stored pair.
    ///
    /// # Errors
    /// Returns an error if the pair cannot be written.
    async fn save(&self, credentials: &Credentials) -> Result<(), TokenStoreError>;

    /// Removes the stored pair. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be updated.
    async fn clear(&self) -> Result<(), TokenStoreError>;

    /// Returns only the access token.
    async fn access_token(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.credentials().await?.map(|c| c.access_token))
    }

    /// Returns only the refresh token, treating an empty one as absent.
    async fn refresh_token(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self
            .credentials()
            .await?
            .map(|c| c.refresh_token)
            .filter(|t| !t.is_empty()))
    }
}
