//! Authentication domain types

mod types;

pub use types::{
    AuthResponse, Credentials, LoginRequest, RefreshRequest, RegisterRequest, UserProfile,
    token_preview,
};
