use super::state::AppState;
use crate::dashboard::summarize_now;
use crate::error::CallError;
use crate::import::{parse_phone_list, CallTarget};
use crate::session::CallController;
use crate::store::CallRecord;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tokio::sync::MutexGuard;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateNotesRequest {
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn call_error_response(e: CallError) -> Response {
    let status = match &e {
        CallError::NoSelection
        | CallError::AlreadyDialing
        | CallError::InvalidState(_)
        | CallError::NotConnected => StatusCode::CONFLICT,
        CallError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
        CallError::Connect(_) => StatusCode::BAD_GATEWAY,
        CallError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Call operation failed: {}", e);
    } else {
        warn!("Call operation rejected: {}", e);
    }

    error_response(status, e.to_string())
}

/// Take the controller for a mutating operation. A dial holds the lock for
/// as long as the transport takes to connect; concurrent requests are
/// turned away instead of queued.
fn controller_for_update(state: &AppState) -> Result<MutexGuard<'_, CallController>, Response> {
    state.controller.try_lock().map_err(|_| {
        warn!("Rejected request: another call operation is in progress");
        error_response(
            StatusCode::CONFLICT,
            "Another call operation is in progress",
        )
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /api/auth/token
/// Exchange the server-held credentials for a client access token
pub async fn get_access_token(State(state): State<AppState>) -> Response {
    let Some(issuer) = state.token_issuer.as_ref() else {
        error!("Error fetching access token: no voice credentials configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get access token");
    };

    match issuer.fetch_access_token().await {
        Ok(access_token) if !access_token.is_empty() => {
            (StatusCode::OK, Json(AccessTokenResponse { access_token })).into_response()
        }
        Ok(_) => {
            error!("Error fetching access token: empty token");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get access token")
        }
        Err(e) => {
            error!("Error fetching access token: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get access token")
        }
    }
}

/// POST /api/targets/import
/// Replace the phone list with the uploaded CSV text
pub async fn import_targets(State(state): State<AppState>, body: String) -> Response {
    let targets = parse_phone_list(&body);
    info!("Importing {} numbers from upload", targets.len());

    let mut controller = match controller_for_update(&state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match controller.load_targets(targets) {
        Ok(()) => (StatusCode::OK, Json(controller.targets().to_vec())).into_response(),
        Err(e) => call_error_response(e),
    }
}

/// GET /api/targets
pub async fn list_targets(State(state): State<AppState>) -> Json<Vec<CallTarget>> {
    let controller = state.controller.lock().await;
    Json(controller.targets().to_vec())
}

/// GET /api/session
pub async fn get_session(State(state): State<AppState>) -> Response {
    let mut controller = state.controller.lock().await;
    controller.refresh_status().await;
    (StatusCode::OK, Json(controller.snapshot().await)).into_response()
}

/// POST /api/session/select/:index
pub async fn select_target(
    State(state): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
) -> Response {
    let Path(index) = match index {
        Ok(index) => index,
        Err(rejection) => {
            warn!("Rejected select: {}", rejection.body_text());
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid target index: {}", rejection.body_text()),
            );
        }
    };

    let mut controller = match controller_for_update(&state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    if let Err(e) = controller.select(index) {
        return call_error_response(e);
    }

    (StatusCode::OK, Json(controller.snapshot().await)).into_response()
}

/// POST /api/session/next
pub async fn next_target(State(state): State<AppState>) -> Response {
    let mut controller = match controller_for_update(&state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    controller.next();
    (StatusCode::OK, Json(controller.snapshot().await)).into_response()
}

/// POST /api/session/previous
pub async fn previous_target(State(state): State<AppState>) -> Response {
    let mut controller = match controller_for_update(&state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    controller.previous();
    (StatusCode::OK, Json(controller.snapshot().await)).into_response()
}

/// PUT /api/session/notes
/// Update the notes buffer (not persisted until saved or the call ends)
pub async fn update_notes(
    State(state): State<AppState>,
    Json(req): Json<UpdateNotesRequest>,
) -> Response {
    let mut controller = match controller_for_update(&state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    controller.set_notes(req.notes);
    (StatusCode::OK, Json(controller.snapshot().await)).into_response()
}

/// POST /api/session/notes/save
pub async fn save_notes(State(state): State<AppState>) -> Response {
    let mut controller = match controller_for_update(&state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match controller.save_notes() {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => call_error_response(e),
    }
}

/// POST /api/session/call/start
/// Dial the selected number; responds once the transport connect resolves
pub async fn start_call(State(state): State<AppState>) -> Response {
    let mut controller = match controller_for_update(&state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    if let Err(e) = controller.start_call().await {
        return call_error_response(e);
    }

    (StatusCode::OK, Json(controller.snapshot().await)).into_response()
}

/// POST /api/session/call/cancel
/// Abandon a dial the transport has not connected yet
pub async fn cancel_call(State(state): State<AppState>) -> Response {
    let mut controller = match controller_for_update(&state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    if let Err(e) = controller.cancel_call().await {
        return call_error_response(e);
    }

    (StatusCode::OK, Json(controller.snapshot().await)).into_response()
}

/// POST /api/session/call/end
/// Hang up and store the call record
pub async fn end_call(State(state): State<AppState>) -> Response {
    let mut controller = match controller_for_update(&state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match controller.end_call().await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => call_error_response(e),
    }
}

/// GET /api/responses
pub async fn list_responses(State(state): State<AppState>) -> Json<Vec<CallRecord>> {
    let controller = state.controller.lock().await;
    Json(controller.store().snapshot())
}

/// GET /api/responses/:id
pub async fn get_response(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let controller = state.controller.lock().await;

    match controller.store().get(&id) {
        Some(record) => (StatusCode::OK, Json(record.clone())).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("No call record for {}", id),
        ),
    }
}

/// GET /api/dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> Response {
    let controller = state.controller.lock().await;
    let summary = summarize_now(controller.store().records());
    (StatusCode::OK, Json(summary)).into_response()
}
