//! Request types sent to the backend.

mod api_request;
mod method;

pub use api_request::{ApiRequest, AUTHORIZATION};
pub use method::HttpMethod;
