//! Error types shared across the crate

use thiserror::Error;

/// Errors that can occur when fetching or reshaping asset data
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed: {status} - {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("no assets given")]
    EmptyInput,

    #[error("invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),
}

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;
