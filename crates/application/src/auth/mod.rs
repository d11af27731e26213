//! Authentication state for the Fortuna client.
//!
//! This module provides:
//! - In-memory credential storage
//! - Session state with forced-logout support

mod memory_token_store;
mod session;

pub use memory_token_store::MemoryTokenStore;
pub use session::{SessionEvent, SessionManager, SessionState};
