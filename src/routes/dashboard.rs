//! Dashboard route: HTML summary of totals, plus the administrative reset.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::Html,
};
use chrono::Utc;

use super::query_param;
use crate::errors::{AppError, HtmlError};
use crate::models::reset::ResetScope;
use crate::services::{aggregation, dashboard};
use crate::views;
use crate::AppState;

/// GET /dashboard — render totals, or reset when `action=reset`.
///
/// `campaign=all` clears everything; any other campaign name deletes only
/// that campaign and recomputes the global total.
pub async fn show(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, HtmlError> {
    let store = state.store()?;
    let query = query.as_deref();

    if query_param(query, "action").as_deref() == Some("reset") {
        let campaign = query_param(query, "campaign");
        match ResetScope::parse(campaign.as_deref()) {
            Some(scope) => {
                aggregation::reset(store, &scope).await?;
            }
            None => tracing::warn!("Reset requested without a campaign; nothing to do"),
        }
        return Ok(Html(views::reset_complete()));
    }

    let data = dashboard::load(store).await?;
    Ok(Html(views::dashboard(&data, Utc::now())))
}

/// OPTIONS /dashboard — empty 200.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on /dashboard.
pub async fn method_not_allowed() -> HtmlError {
    HtmlError(AppError::MethodNotAllowed)
}
