use crate::session::CallController;
use crate::token::TokenIssuer;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single call session (one operator per process)
    pub controller: Arc<Mutex<CallController>>,

    /// Issuer for voice-provider access tokens (`None` when no credentials are configured)
    pub token_issuer: Option<Arc<dyn TokenIssuer>>,
}

impl AppState {
    pub fn new(controller: CallController, token_issuer: Option<Arc<dyn TokenIssuer>>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            token_issuer,
        }
    }
}
