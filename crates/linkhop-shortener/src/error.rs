use linkhop_core::StorageError;
use thiserror::Error;

/// Why a submitted URL was rejected.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Invalid URL.")]
    Malformed,
    #[error("Only http/https URLs are allowed.")]
    UnsupportedScheme,
    #[error("URL too long.")]
    TooLong,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortenerError {
    #[error("{0}")]
    InvalidUrl(#[from] UrlError),
    #[error("failed to generate a unique short code after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for shortener operations.
pub type Result<T> = std::result::Result<T, ShortenerError>;
