//! Route definitions for the counter API.

pub mod consistency;
pub mod dashboard;
pub mod health;
pub mod increment;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let increment_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let dashboard_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let increment_routes = Router::new()
        .route(
            "/increment",
            post(increment::increment)
                .options(increment::preflight)
                .fallback(increment::method_not_allowed),
        )
        .layer(increment_cors);

    let dashboard_routes = Router::new()
        .route(
            "/dashboard",
            get(dashboard::show)
                .options(dashboard::preflight)
                .fallback(dashboard::method_not_allowed),
        )
        .layer(dashboard_cors);

    let admin_routes = Router::new()
        .route("/consistency", get(consistency::report))
        .route("/consistency/recompute", post(consistency::recompute));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .merge(increment_routes)
        .merge(dashboard_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// First value of `key` in a raw query string. Empty values count as absent.
pub(crate) fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
