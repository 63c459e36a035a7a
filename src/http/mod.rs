//! HTTP API for the operator console
//!
//! This module provides a REST API over the call session:
//! - GET /api/auth/token - Short-lived voice-provider access token
//! - POST /api/targets/import - Upload a phone list (CSV text body)
//! - GET /api/session, POST /api/session/... - Selection, notes and call control (start/cancel/end)
//! - GET /api/responses[/:id] - Stored call records
//! - GET /api/dashboard - Aggregated call metrics
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{AccessTokenResponse, ErrorResponse, UpdateNotesRequest};
pub use routes::create_router;
pub use state::AppState;
