use thiserror::Error;

/// Library-wide error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience Result type using our Error
pub type Result<T> = std::result::Result<T, Error>;
