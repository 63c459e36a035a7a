use super::snapshot::SessionSnapshot;
use crate::error::CallError;
use crate::import::CallTarget;
use crate::store::{CallRecord, ResponseStore};
use crate::voice::{assemble_transcript, ConnectionStatus, VoiceTransport};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Where the operator is in the call workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    /// Nothing selected (fresh start or just imported)
    NoSelection,
    /// A target is selected and no call is active
    Selected,
    /// Connect has been requested but the transport has not reported connected
    Dialing,
    /// Call in progress
    Connected,
}

impl CallState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallState::NoSelection => "no_selection",
            CallState::Selected => "selected",
            CallState::Dialing => "dialing",
            CallState::Connected => "connected",
        }
    }

    fn is_busy(&self) -> bool {
        matches!(self, CallState::Dialing | CallState::Connected)
    }

    fn is_connected(&self) -> bool {
        matches!(self, CallState::Connected)
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives calls through the target list one number at a time
pub struct CallController {
    targets: Vec<CallTarget>,
    current: Option<usize>,
    state: CallState,
    notes: String,
    store: ResponseStore,
    transport: Arc<dyn VoiceTransport>,
}

impl CallController {
    pub fn new(store: ResponseStore, transport: Arc<dyn VoiceTransport>) -> Self {
        info!(
            "Call controller ready (transport={}, {} stored records)",
            transport.name(),
            store.len()
        );

        Self {
            targets: Vec::new(),
            current: None,
            state: CallState::NoSelection,
            notes: String::new(),
            store,
            transport,
        }
    }

    /// Replace the target list. Stored records are kept, even for numbers
    /// that are no longer in the list.
    pub fn load_targets(&mut self, targets: Vec<CallTarget>) -> Result<(), CallError> {
        if self.state.is_busy() {
            return Err(CallError::InvalidState(self.state.as_str()));
        }

        info!("Loaded {} call targets", targets.len());
        self.targets = targets;
        self.current = None;
        self.state = CallState::NoSelection;
        self.notes.clear();

        Ok(())
    }

    /// Select the target at `index` and load its notes.
    ///
    /// Allowed while dialing; the pending call then belongs to the new
    /// selection.
    pub fn select(&mut self, index: usize) -> Result<&CallTarget, CallError> {
        if self.state.is_connected() {
            return Err(CallError::InvalidState(self.state.as_str()));
        }

        if index >= self.targets.len() {
            return Err(CallError::IndexOutOfRange {
                index,
                len: self.targets.len(),
            });
        }

        self.set_selection(index);
        Ok(&self.targets[index])
    }

    /// Move to the next target. No-op at the end of the list or while connected.
    pub fn next(&mut self) -> Option<usize> {
        if self.state.is_connected() || self.targets.is_empty() {
            return self.current;
        }

        let next = match self.current {
            None => 0,
            Some(i) if i + 1 < self.targets.len() => i + 1,
            Some(i) => i,
        };

        if self.current != Some(next) {
            self.set_selection(next);
        }

        self.current
    }

    /// Move to the previous target. No-op at the start of the list or while connected.
    pub fn previous(&mut self) -> Option<usize> {
        if self.state.is_connected() {
            return self.current;
        }

        if let Some(i) = self.current.filter(|&i| i > 0) {
            self.set_selection(i - 1);
        }

        self.current
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Persist the notes buffer for the selected target
    pub fn save_notes(&mut self) -> Result<CallRecord, CallError> {
        let target = self.current_target().cloned().ok_or(CallError::NoSelection)?;
        let record = self
            .store
            .save_notes(&target, self.notes_for_record(), Utc::now())?;

        info!("Saved notes for {}", target.id);
        Ok(record)
    }

    /// Dial the selected target.
    ///
    /// A request while a dial is already pending is rejected. If the
    /// transport fails to connect the selection is kept and no record is
    /// written.
    pub async fn start_call(&mut self) -> Result<CallState, CallError> {
        match self.state {
            CallState::Selected => {}
            CallState::NoSelection => return Err(CallError::NoSelection),
            CallState::Dialing => return Err(CallError::AlreadyDialing),
            CallState::Connected => return Err(CallError::InvalidState("connected")),
        }

        let number = self
            .current_target()
            .map(|t| t.number.clone())
            .ok_or(CallError::NoSelection)?;

        self.state = CallState::Dialing;
        info!("Dialing {}...", number);

        if let Err(e) = self.transport.connect().await {
            error!("Failed to connect: {:#}", e);
            self.state = CallState::Selected;
            return Err(CallError::Connect(e.to_string()));
        }

        Ok(self.refresh_status().await)
    }

    /// Fold the transport's reported status into the controller state
    pub async fn refresh_status(&mut self) -> CallState {
        if self.state == CallState::Dialing {
            match self.transport.status().await {
                ConnectionStatus::Connected => {
                    info!("Call connected");
                    self.state = CallState::Connected;
                }
                ConnectionStatus::Error | ConnectionStatus::Disconnected => {
                    warn!("Transport dropped while dialing");
                    self.state = CallState::Selected;
                }
                ConnectionStatus::Connecting => {}
            }
        }

        self.state
    }

    /// Abandon a pending dial: disconnect and go back to `Selected`
    /// without writing a record.
    pub async fn cancel_call(&mut self) -> Result<CallState, CallError> {
        if self.state != CallState::Dialing {
            return Err(CallError::InvalidState(self.state.as_str()));
        }

        self.transport.disconnect().await;
        self.state = CallState::Selected;
        info!("Dial cancelled");

        Ok(self.state)
    }

    /// Hang up, store the transcript and notes, and return the record
    pub async fn end_call(&mut self) -> Result<CallRecord, CallError> {
        if self.state != CallState::Connected {
            return Err(CallError::NotConnected);
        }

        let index = self.current.ok_or(CallError::NoSelection)?;
        let target = self.targets[index].clone();

        let messages = self.transport.messages().await;
        let transcript = assemble_transcript(&messages);
        let record = CallRecord::new(&target, Utc::now(), transcript, self.notes_for_record());

        let stored = self.store.upsert(record.clone());

        self.transport.disconnect().await;
        self.state = CallState::Selected;

        stored?;
        info!(
            "Call to {} ended, saved {} transcript lines",
            target.number,
            record.transcript.lines().count()
        );
        self.notes = self.initial_notes(index);

        Ok(record)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let current_target = self.current_target().cloned();
        let has_previous_call = current_target
            .as_ref()
            .is_some_and(|t| self.store.contains(&t.id));

        SessionSnapshot {
            state: self.state,
            transport_status: self.transport.status().await,
            current_index: self.current,
            current_target,
            notes: self.notes.clone(),
            target_count: self.targets.len(),
            has_previous_call,
        }
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn targets(&self) -> &[CallTarget] {
        &self.targets
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_target(&self) -> Option<&CallTarget> {
        self.current.and_then(|i| self.targets.get(i))
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn store(&self) -> &ResponseStore {
        &self.store
    }

    /// `index` must be in bounds. A pending dial stays pending.
    fn set_selection(&mut self, index: usize) {
        self.current = Some(index);
        if self.state != CallState::Dialing {
            self.state = CallState::Selected;
        }
        self.notes = self.initial_notes(index);
    }

    /// Stored notes win over notes shipped with the import
    fn initial_notes(&self, index: usize) -> String {
        let target = &self.targets[index];
        self.store
            .get(&target.id)
            .and_then(|r| r.notes.clone())
            .filter(|n| !n.is_empty())
            .or_else(|| target.notes.clone())
            .unwrap_or_default()
    }

    fn notes_for_record(&self) -> Option<String> {
        Some(self.notes.clone()).filter(|n| !n.trim().is_empty())
    }
}
