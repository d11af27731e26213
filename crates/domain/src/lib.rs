//! Fortuna Domain - Core client types
//!
//! This crate defines the types exchanged with the fortune-telling backend.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod fortune;
pub mod notification;
pub mod request;
pub mod response;
pub mod rewards;

pub use auth::{
    AuthResponse, Credentials, LoginRequest, RefreshRequest, RegisterRequest, UserProfile,
    token_preview,
};
pub use error::{DomainError, DomainResult};
pub use fortune::{
    CoffeeReading, CoffeeReadingRequest, Horoscope, HoroscopePeriod, TarotCard, TarotReading,
    TarotReadingRequest, TarotSpread, ZodiacSign,
};
pub use notification::{Notification, unread_count};
pub use request::{ApiRequest, HttpMethod};
pub use response::{ApiResponse, StatusCode};
pub use rewards::{RewardKind, WheelReward, WheelStatus};
