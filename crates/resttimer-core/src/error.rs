//! Core error type

/// Errors raised while building core values from untrusted input
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid duration: {0} (expected one of 30s, 60s, 90s, 120s)")]
    InvalidDuration(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
