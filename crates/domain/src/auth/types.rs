//! Authentication types exchanged with the backend.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Access and refresh token pair.
///
/// The pair is always stored and replaced as a whole. `Debug` only prints
/// token previews.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Short-lived bearer token sent with every request.
    pub access_token: String,
    /// Longer-lived token exchanged for a new pair.
    pub refresh_token: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Rejects pairs with an empty token.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCredentials` naming the empty field.
    pub fn validate(&self) -> DomainResult<()> {
        if self.access_token.is_empty() {
            return Err(DomainError::InvalidCredentials(
                "access token is empty".to_string(),
            ));
        }
        if self.refresh_token.is_empty() {
            return Err(DomainError::InvalidCredentials(
                "refresh token is empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &token_preview(&self.access_token))
            .field("refresh_token", &token_preview(&self.refresh_token))
            .finish()
    }
}

/// Get a preview of a token (first 8 chars + ...), safe for logs.
#[must_use]
pub fn token_preview(token: &str) -> String {
    match token.char_indices().nth(8) {
        Some((idx, _)) if token.len() > 12 => format!("{}...", &token[..idx]),
        _ => "***".to_string(),
    }
}

/// Body of the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The stored refresh token.
    pub refresh_token: String,
}

/// Body of the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Body of the register endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Birth date as `YYYY-MM-DD`, used for the zodiac sign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<chrono::NaiveDate>,
}

/// A signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend user id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Birth date, when known.
    #[serde(default)]
    pub birth_date: Option<chrono::NaiveDate>,
    /// Coin balance earned from wheel spins.
    #[serde(default)]
    pub coins: u32,
}

/// Response of the login and register endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Issued access token.
    pub access_token: String,
    /// Issued refresh token.
    pub refresh_token: String,
    /// The authenticated user.
    pub user: UserProfile,
}

impl AuthResponse {
    /// Splits out the credential pair.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.access_token.clone(), self.refresh_token.clone())
    }
}
