use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Voice provider credentials
        .route("/api/auth/token", get(handlers::get_access_token))
        // Phone list
        .route("/api/targets", get(handlers::list_targets))
        .route("/api/targets/import", post(handlers::import_targets))
        // Call session
        .route("/api/session", get(handlers::get_session))
        .route("/api/session/select/:index", post(handlers::select_target))
        .route("/api/session/next", post(handlers::next_target))
        .route("/api/session/previous", post(handlers::previous_target))
        .route("/api/session/notes", put(handlers::update_notes))
        .route("/api/session/notes/save", post(handlers::save_notes))
        .route("/api/session/call/start", post(handlers::start_call))
        .route("/api/session/call/cancel", post(handlers::cancel_call))
        .route("/api/session/call/end", post(handlers::end_call))
        // Stored records
        .route("/api/responses", get(handlers::list_responses))
        .route("/api/responses/:id", get(handlers::get_response))
        .route("/api/dashboard", get(handlers::get_dashboard))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
