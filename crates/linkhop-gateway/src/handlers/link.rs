use crate::error::{AppError, Result};
use crate::model::{CreateLinkRequest, CreateLinkResponse};
use crate::state::AppState;
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use linkhop_core::ShortCode;
use linkhop_ratelimit::client_identity;
use linkhop_redirector::Resolution;
use tracing::debug;

/// Rate limit purpose for link creation.
pub const SHORTEN_PURPOSE: &str = "shorten";

/// `POST /api/shorten`
///
/// Every response, including errors, carries the `X-RateLimit-*` headers.
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let client = client_identity(&headers);
    let decision = state
        .limiter
        .check_now(SHORTEN_PURPOSE, &client, state.policy);

    let mut response = if decision.allowed {
        shorten(&state, &body).await.into_response()
    } else {
        AppError::RateLimited {
            retry_after_seconds: decision.retry_after_seconds.unwrap_or_default(),
        }
        .into_response()
    };

    response.headers_mut().extend(decision.headers());
    response
}

async fn shorten(state: &AppState, body: &[u8]) -> Result<(StatusCode, Json<CreateLinkResponse>)> {
    // Anything that is not an object with a string `longUrl` is a missing URL.
    let request: CreateLinkRequest =
        serde_json::from_slice(body).map_err(|_| AppError::MissingLongUrl)?;

    let row = state.shortener.shorten(&request.long_url).await?;
    debug!(code = %row.code, "Shortened link");

    Ok((
        StatusCode::CREATED,
        Json(CreateLinkResponse::from_row(row, &state.base_url)),
    ))
}

/// `GET /api/{code}` and `GET /{code}`
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response> {
    // A code that could never have been minted cannot exist in the store.
    let code = ShortCode::new(code).map_err(|_| AppError::NotFound)?;

    match state.redirector.resolve(&code).await? {
        Resolution::Redirect(long_url) => {
            let location = HeaderValue::try_from(long_url)
                .map_err(|err| AppError::Internal(format!("unusable redirect target: {err}")))?;
            Response::builder()
                .status(StatusCode::FOUND)
                .header(LOCATION, location)
                .body(Body::empty())
                .map_err(|err| AppError::Internal(err.to_string()))
        }
        Resolution::NotFound => Err(AppError::NotFound),
        Resolution::Expired => Err(AppError::Expired),
    }
}
