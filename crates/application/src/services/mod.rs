//! Typed wrappers over the backend endpoints.
//!
//! Each service is a thin pass-through to [`AuthenticatedHttpClient`];
//! token handling stays in the client.
//!
//! [`AuthenticatedHttpClient`]: crate::client::AuthenticatedHttpClient

mod auth;
mod fortune;
mod notifications;
mod rewards;

pub use auth::AuthService;
pub use fortune::{FortuneService, MAX_COFFEE_PHOTOS};
pub use notifications::NotificationService;
pub use rewards::RewardService;
