//! Voice transport contract
//!
//! The speech pipeline itself lives with the external voice provider. The
//! controller only needs connect/disconnect, the connection status and the
//! message stream accumulated for the active call.

mod messages;
mod simulated;
mod transport;

pub use messages::{assemble_transcript, ChatMessage, VoiceMessage};
pub use simulated::SimulatedTransport;
pub use transport::{ConnectionStatus, VoiceTransport};
