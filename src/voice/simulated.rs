use super::messages::VoiceMessage;
use super::transport::{ConnectionStatus, VoiceTransport};
use anyhow::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

struct CallLine {
    status: ConnectionStatus,
    messages: Vec<VoiceMessage>,
}

/// In-process transport that plays back a scripted conversation.
///
/// Script lines alternate assistant/user starting with the assistant. A
/// provider metadata message is emitted first so transcript filtering has
/// something to drop.
pub struct SimulatedTransport {
    script: Vec<String>,
    connect_delay: Duration,
    connect_failure: Option<String>,
    status_after_connect: ConnectionStatus,
    line: Mutex<CallLine>,
}

impl SimulatedTransport {
    pub fn new(script: Vec<String>) -> Self {
        Self {
            script,
            connect_delay: Duration::ZERO,
            connect_failure: None,
            status_after_connect: ConnectionStatus::Connected,
            line: Mutex::new(CallLine {
                status: ConnectionStatus::Disconnected,
                messages: Vec::new(),
            }),
        }
    }

    /// Make every connect attempt fail with `reason`
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.connect_failure = Some(reason.into());
        self
    }

    /// Wait this long before the connect attempt resolves
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    /// Status reported once connect resolves successfully
    pub fn with_status_after_connect(mut self, status: ConnectionStatus) -> Self {
        self.status_after_connect = status;
        self
    }

    /// Change the reported status, e.g. when the provider finishes connecting
    pub async fn set_status(&self, status: ConnectionStatus) {
        self.line.lock().await.status = status;
    }

    /// Append a message to the active call
    pub async fn push_message(&self, message: VoiceMessage) {
        self.line.lock().await.messages.push(message);
    }

    fn scripted_messages(&self) -> Vec<VoiceMessage> {
        let turns = self.script.iter().enumerate().map(|(i, text)| {
            if i % 2 == 0 {
                VoiceMessage::assistant(text.as_str())
            } else {
                VoiceMessage::user(text.as_str())
            }
        });

        std::iter::once(VoiceMessage::Other).chain(turns).collect()
    }
}

#[async_trait::async_trait]
impl VoiceTransport for SimulatedTransport {
    async fn connect(&self) -> Result<()> {
        {
            let mut line = self.line.lock().await;
            line.status = ConnectionStatus::Connecting;
            line.messages.clear();
        }

        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }

        let mut line = self.line.lock().await;

        if let Some(reason) = &self.connect_failure {
            warn!("Simulated connect failure: {}", reason);
            line.status = ConnectionStatus::Error;
            anyhow::bail!("{}", reason);
        }

        line.status = self.status_after_connect;
        line.messages = self.scripted_messages();
        info!("Simulated call connected ({} scripted turns)", self.script.len());

        Ok(())
    }

    async fn disconnect(&self) {
        let mut line = self.line.lock().await;
        line.status = ConnectionStatus::Disconnected;
        line.messages.clear();
        info!("Simulated call disconnected");
    }

    async fn status(&self) -> ConnectionStatus {
        self.line.lock().await.status
    }

    async fn messages(&self) -> Vec<VoiceMessage> {
        self.line.lock().await.messages.clone()
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_plays_script() {
        let transport = SimulatedTransport::new(vec!["Hi".to_string(), "Hello".to_string()]);
        assert_eq!(transport.status().await, ConnectionStatus::Disconnected);

        transport.connect().await.unwrap();
        assert_eq!(transport.status().await, ConnectionStatus::Connected);

        let messages = transport.messages().await;
        assert_eq!(
            messages,
            vec![
                VoiceMessage::Other,
                VoiceMessage::assistant("Hi"),
                VoiceMessage::user("Hello"),
            ]
        );

        transport.disconnect().await;
        assert_eq!(transport.status().await, ConnectionStatus::Disconnected);
        assert!(transport.messages().await.is_empty());
    }

    #[tokio::test]
    async fn test_failing_connect() {
        let transport = SimulatedTransport::new(vec![]).failing("no route");
        let err = transport.connect().await.unwrap_err();
        assert!(err.to_string().contains("no route"));
        assert_eq!(transport.status().await, ConnectionStatus::Error);
    }
}
