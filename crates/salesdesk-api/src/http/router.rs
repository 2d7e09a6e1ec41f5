//! Axum router configuration with middleware.
//!
//! API routes live under `/api/v1/`. Middleware: CORS, request tracing.
//!
//! The static inquiry page is served from the configured web directory
//! (`web_dir`, overridable with `SALESDESK_WEB_DIR`). API routes take
//! priority; if the directory does not exist only the API is served.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/sessions",
            post(handlers::session::create_session).get(handlers::session::list_sessions),
        )
        .route("/sessions/{id}", get(handlers::session::get_session))
        .route(
            "/sessions/{id}/inquiries",
            post(handlers::inquiry::submit_inquiry),
        )
        .fallback(api_not_found);

    let web_dir = state.web_dir.clone();

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if web_dir.is_dir() {
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(web_dir.join("index.html")));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir.display(), "Static page serving enabled");
    } else {
        tracing::info!(path = %web_dir.display(), "Web directory not found, serving API only");
    }

    router
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn api_not_found() -> ApiResponse<()> {
    ApiResponse::error("NOT_FOUND", "No such API route", &RequestClock::start())
}
