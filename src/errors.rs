use thiserror::Error;

use crate::config::ConfigError;

/// Common result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type that unifies token signing, configuration and HTTP client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Errors produced by reqwest HTTP client.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint answered with something other than a success.
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fallback catch-all with a human readable message.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("JSONWebToken error: {0}")]
    JSONWebToken(#[from] jsonwebtoken::errors::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("mail build error: {0}")]
    Mail(#[from] lettre::error::Error),

    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}
