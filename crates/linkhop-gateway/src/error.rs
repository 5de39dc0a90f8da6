use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use linkhop_core::StorageError;
use linkhop_redirector::RedirectorError;
use linkhop_shortener::{ShortenerError, UrlError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("longUrl is required")]
    MissingLongUrl,
    #[error("{0}")]
    InvalidUrl(#[from] UrlError),
    #[error("Not found")]
    NotFound,
    #[error("Gone")]
    Expired,
    #[error("Too Many Requests")]
    RateLimited { retry_after_seconds: u64 },
    #[error("Not allowed")]
    Forbidden,
    #[error("Failed to generate a unique short code")]
    ExhaustedRetries,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_seconds: Option<u64>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingLongUrl | AppError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Expired => StatusCode::GONE,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Storage(StorageError::Unavailable(_) | StorageError::Timeout(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::ExhaustedRetries | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short machine-readable tag for the failure.
    pub fn reason(&self) -> &'static str {
        match self {
            AppError::MissingLongUrl => "missing_long_url",
            AppError::InvalidUrl(_) => "invalid_url",
            AppError::NotFound => "not_found",
            AppError::Expired => "expired",
            AppError::RateLimited { .. } => "rate_limited",
            AppError::Forbidden => "forbidden",
            AppError::ExhaustedRetries => "exhausted_retries",
            AppError::Storage(StorageError::Unavailable(_) | StorageError::Timeout(_)) => {
                "store_unavailable"
            }
            AppError::Storage(_) | AppError::Internal(_) => "internal_error",
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        match value {
            ShortenerError::InvalidUrl(err) => AppError::InvalidUrl(err),
            ShortenerError::ExhaustedRetries { .. } => AppError::ExhaustedRetries,
            ShortenerError::Storage(err) => AppError::Storage(err),
        }
    }
}

impl From<RedirectorError> for AppError {
    fn from(value: RedirectorError) -> Self {
        match value {
            RedirectorError::Storage(err) => AppError::Storage(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store and internal details stay in the logs.
        let message = match &self {
            AppError::Storage(err) => {
                error!(error = %err, "Link store failure");
                "Internal error".to_string()
            }
            AppError::Internal(detail) => {
                error!(error = %detail, "Internal error");
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: message,
            reason: self.reason(),
            retry_after_seconds: match self {
                AppError::RateLimited {
                    retry_after_seconds,
                } => Some(retry_after_seconds),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}
