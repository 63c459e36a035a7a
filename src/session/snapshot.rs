use super::controller::CallState;
use crate::import::CallTarget;
use crate::voice::ConnectionStatus;
use serde::{Deserialize, Serialize};

/// Point-in-time view of the call session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Controller state
    pub state: CallState,

    /// Status last reported by the voice transport
    pub transport_status: ConnectionStatus,

    /// Index of the selected target, if any
    pub current_index: Option<usize>,

    /// The selected target, if any
    pub current_target: Option<CallTarget>,

    /// Notes buffer for the selected target
    pub notes: String,

    /// Number of imported targets
    pub target_count: usize,

    /// Whether the selected target already has a stored call record
    pub has_previous_call: bool,
}
