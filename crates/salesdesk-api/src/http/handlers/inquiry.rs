//! POST /api/v1/sessions/{id}/inquiries - submit one inquiry and get the
//! committed turn back.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use salesdesk_types::inquiry::{Inquiry, TurnOutcome};

use crate::http::error::{AppError, ForRequest, RequestError};
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

pub async fn submit_inquiry(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<Inquiry>, JsonRejection>,
) -> Result<Json<ApiResponse<TurnOutcome>>, RequestError> {
    let clock = RequestClock::start();
    let Json(inquiry) = payload
        .map_err(|e| AppError::Validation(e.body_text()))
        .for_request(&clock)?;

    let outcome = state
        .controller
        .handle_inquiry(&session_id, &inquiry)
        .await
        .for_request(&clock)?;

    tracing::info!(
        request_id = %clock.request_id,
        session_id = %outcome.session_id,
        elapsed_ms = clock.elapsed_ms(),
        "Inquiry handled"
    );

    let href = format!("/api/v1/sessions/{}", outcome.session_id);
    Ok(Json(
        ApiResponse::success(outcome, &clock).with_link("session", &href),
    ))
}
