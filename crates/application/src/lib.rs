//! Fortuna Application - Client core
//!
//! Ports to the outside world, the authenticated API client with
//! single-flight token refresh, session state and the typed services the
//! app calls.

pub mod auth;
pub mod client;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;

pub use auth::{MemoryTokenStore, SessionEvent, SessionManager, SessionState};
pub use client::{AuthenticatedHttpClient, ClientConfig};
pub use error::{ApiError, ApiResult, NO_REFRESH_TOKEN};
pub use ports::{HttpTransport, SessionController, TokenStore, TokenStoreError, TransportError};
pub use services::{AuthService, FortuneService, NotificationService, RewardService};
