//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the client core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod http_transport;
mod session;
mod token_store;

pub use http_transport::{HttpTransport, TransportError};
pub use session::SessionController;
pub use token_store::{TokenStore, TokenStoreError};
