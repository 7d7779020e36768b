//! Error types for insta-core

use thiserror::Error;

/// Main error type shared by the insta-web crates
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session tokens expired or rejected (status {0})")]
    AuthExpired(u16),

    #[error("Rate limited by the remote API")]
    RateLimited,

    #[error("API error: status {status}, body: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    Parse(String),

    #[error("Unsupported entity: {0}")]
    UnsupportedEntity(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Map a non-success HTTP status to the matching error kind
    pub fn from_status(status: u16, body: impl Into<String>, what: &str) -> Self {
        match status {
            404 => Error::NotFound(what.to_string()),
            401 | 403 => Error::AuthExpired(status),
            429 => Error::RateLimited,
            _ => Error::Api {
                status,
                body: body.into(),
            },
        }
    }

    /// Whether refreshing the session tokens may fix this error
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Error::AuthExpired(_))
    }
}

/// Result type alias for insta-core
pub type Result<T> = std::result::Result<T, Error>;
