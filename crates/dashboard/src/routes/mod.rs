//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Health check
//! GET  /                             - Redirect to the merchant form
//!
//! # Merchants
//! GET  /merchants/new                - New merchant form
//! POST /merchants                    - Create merchant
//!
//! # Stores
//! GET  /merchants/{id}/stores/new    - New store form for a merchant
//! POST /merchants/{id}/stores        - Create store (multipart)
//!
//! # Location
//! POST /location/reverse             - Reverse geocode browser coordinates (JSON)
//!
//! GET  /static/*                     - Stylesheet and scripts
//! ```

pub mod location;
pub mod merchants;
pub mod stores;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    response::Redirect,
    routing::{get, post},
};
use onboarding_core::MerchantId;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
const STATIC_DIR: &str = "crates/dashboard/static";

/// Build the page and API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/merchants/new") }))
        .route("/merchants/new", get(merchants::new_merchant))
        .route("/merchants", post(merchants::create))
        .route("/merchants/{id}/stores/new", get(stores::new_store))
        .route("/merchants/{id}/stores", post(stores::create))
        .route("/location/reverse", post(location::reverse))
}

/// Build the complete application with its middleware stack.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let body_limit = DefaultBodyLimit::max(state.config().max_upload_bytes);

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(body_limit)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Path of a merchant's store form, with the ID percent-encoded.
pub(crate) fn store_form_path(merchant_id: &MerchantId) -> String {
    format!(
        "/merchants/{}/stores/new",
        urlencoding::encode(merchant_id.as_str())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_form_path_encodes_id() {
        assert_eq!(
            store_form_path(&MerchantId::new("42")),
            "/merchants/42/stores/new"
        );
        assert_eq!(
            store_form_path(&MerchantId::new("m/1 a")),
            "/merchants/m%2F1%20a/stores/new"
        );
    }
}
