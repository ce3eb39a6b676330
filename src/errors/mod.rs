//! Unified error handling with consistent API response envelope.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::ConfigError;
use crate::store::StoreError;
use crate::views;

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    /// Status, machine-readable code, and caller-facing message.
    ///
    /// Logs server-side failures as a side effect so every boundary that
    /// renders an error records it exactly once.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Configuration(e) => {
                tracing::error!(error = %e, "Counter store is not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    e.guidance(),
                )
            }
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                "Method not allowed".to_string(),
            ),
            AppError::Store(e) => {
                tracing::error!(error = %e, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    format!("Database error: {e}"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = ApiResponse::<()> {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// [`AppError`] rendered as an HTML fragment for browser-facing endpoints.
#[derive(Debug)]
pub struct HtmlError(pub AppError);

impl From<AppError> for HtmlError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for HtmlError {
    fn from(err: StoreError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let (status, _, message) = self.0.parts();
        let page = match &self.0 {
            AppError::Configuration(e) => views::configuration_error(e),
            AppError::MethodNotAllowed => views::error_fragment(&message),
            AppError::Store(_) => views::error_fragment("Error loading dashboard"),
        };
        (status, Html(page)).into_response()
    }
}
