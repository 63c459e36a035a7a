//! Call session management
//!
//! This module provides the `CallController` that manages:
//! - The imported target list and the current selection
//! - The operator's notes buffer for the selected target
//! - Dialing and hanging up through a `VoiceTransport`
//! - Building and storing a `CallRecord` when a call ends

mod controller;
mod snapshot;

pub use controller::{CallController, CallState};
pub use snapshot::SessionSnapshot;
