//! Increment route: records one event for a campaign.

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use super::query_param;
use crate::errors::{ApiResponse, AppError};
use crate::services::counter;
use crate::AppState;

/// POST /increment — increment a campaign and the global total.
///
/// The campaign comes from the `campaign` query parameter, a JSON or
/// form-encoded body, or falls back to `default`.
pub async fn increment(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let store = state.store()?;
    let campaign_param = query_param(query.as_deref(), "campaign");
    let campaign = counter::resolve_campaign(campaign_param.as_deref(), &body);

    let outcome = counter::increment(store, &campaign).await?;

    if wants_plain_text(&headers) {
        return Ok("OK".into_response());
    }
    Ok(ApiResponse::success(outcome).into_response())
}

/// OPTIONS /increment — empty 200 for clients that skip CORS preflight headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on /increment.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn wants_plain_text(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.trim_start().starts_with("text/plain"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn plain_text_only_when_asked_first() {
        let mut headers = HeaderMap::new();
        assert!(!wants_plain_text(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/plain"));
        assert!(wants_plain_text(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain"),
        );
        assert!(!wants_plain_text(&headers));
    }
}
