// src/error.rs

//! Unified error handling for the deep-link toolkit.

use std::fmt;

use thiserror::Error;

/// Result type alias for toolkit operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Longest response-body prefix kept in a status error.
pub const STATUS_BODY_LIMIT: usize = 400;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or a body could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Regex compilation failed
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Access key or secret key is empty
    #[error("Partner API credentials are missing (set COUPANG_ACCESS_KEY and COUPANG_SECRET_KEY)")]
    MissingCredentials,

    /// Connect, timeout or other transport failure
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Non-2xx response from the partner API
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Retry budget spent; carries the last underlying cause
    #[error("{context} failed after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        context: String,
        attempts: u32,
        source: Box<AppError>,
    },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a transport error for the given URL.
    pub fn transport(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a status error, keeping only the first 400 characters of the body.
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body.chars().take(STATUS_BODY_LIMIT).collect(),
        }
    }
}
