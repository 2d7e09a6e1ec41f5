//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/sessions      - Issue a new session token
//! - GET  /api/v1/sessions      - List stored sessions
//! - GET  /api/v1/sessions/{id} - Session history plus form defaults

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use salesdesk_core::turn::FormDefaults;
use salesdesk_types::session::{Session, SessionId, SessionSummary};

use crate::http::error::{ForRequest, RequestError};
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NewSession {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub session: Session,
    pub form: FormDefaults,
}

/// POST /api/v1/sessions - Issue a fresh random token. Nothing is persisted
/// until the first inquiry is answered.
pub async fn create_session() -> Json<ApiResponse<NewSession>> {
    let clock = RequestClock::start();
    let session_id = SessionId::generate().0;
    let href = format!("/api/v1/sessions/{session_id}");
    Json(ApiResponse::success(NewSession { session_id }, &clock).with_link("self", &href))
}

/// GET /api/v1/sessions - Summaries of every stored session.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SessionSummary>>>, RequestError> {
    let clock = RequestClock::start();
    let sessions = state.controller.list_sessions().await.for_request(&clock)?;
    Ok(Json(ApiResponse::success(sessions, &clock)))
}

/// GET /api/v1/sessions/{id} - Unknown ids return an empty session.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, RequestError> {
    let clock = RequestClock::start();

    let session = state.controller.session(&session_id).await.for_request(&clock)?;
    let form = state.controller.form_defaults(&session);

    let href = format!("/api/v1/sessions/{session_id}/inquiries");
    let view = SessionView {
        session_id,
        session,
        form,
    };
    Ok(Json(
        ApiResponse::success(view, &clock).with_link("inquiries", &href),
    ))
}
