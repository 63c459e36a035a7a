use super::messages::VoiceMessage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection state as reported by the voice provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Voice transport trait
///
/// Implementations:
/// - `SimulatedTransport`: scripted in-process conversation (CLI, tests)
#[async_trait::async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Open a voice session
    async fn connect(&self) -> Result<()>;

    /// Close the active session
    async fn disconnect(&self);

    /// Current connection status
    async fn status(&self) -> ConnectionStatus;

    /// Messages accumulated for the active session, in arrival order
    async fn messages(&self) -> Vec<VoiceMessage>;

    /// Transport name for logging
    fn name(&self) -> &str;
}
