//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request path is empty or not rooted at `/`.
    #[error("invalid request path: {0}")]
    InvalidPath(String),

    /// A zodiac sign name could not be recognised.
    #[error("unknown zodiac sign: {0}")]
    UnknownZodiacSign(String),

    /// A horoscope period could not be recognised.
    #[error("unknown horoscope period: {0}")]
    UnknownHoroscopePeriod(String),

    /// A credential field is empty.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
