//! Consistency routes: compare and repair the global total.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::models::reset::ConsistencyReport;
use crate::services::aggregation;
use crate::AppState;

/// GET /consistency — global total versus the sum of campaign counts.
pub async fn report(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ConsistencyReport>>, AppError> {
    let report = aggregation::consistency(state.store()?).await?;
    Ok(ApiResponse::success(report))
}

/// POST /consistency/recompute — rewrite the global total from the campaigns.
pub async fn recompute(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ConsistencyReport>>, AppError> {
    let report = aggregation::recompute(state.store()?).await?;
    Ok(ApiResponse::success(report))
}
