//! Custom error types for medvault

use thiserror::Error;

/// Main error type for medvault operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Lookup error: {0}")]
    Lookup(String),
}

/// Result type alias for medvault
pub type Result<T> = std::result::Result<T, Error>;
