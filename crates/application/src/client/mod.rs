//! Authenticated API client.
//!
//! [`AuthenticatedHttpClient`] attaches the stored bearer token to each
//! request and refreshes it when the backend answers 401/403. Concurrent
//! failures share a single refresh through [`RefreshGate`].

mod authenticated;
mod config;
mod refresh;

pub use authenticated::AuthenticatedHttpClient;
pub use config::ClientConfig;
pub use refresh::{RefreshGate, RefreshLease, RefreshOutcome, Ticket};
