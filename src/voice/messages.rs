use serde::{Deserialize, Serialize};

/// Role/content pair carried by conversational messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Message received from the voice provider during a call
///
/// Only user and assistant turns make it into a transcript; everything
/// else the provider sends (metadata, audio output, tool calls) is `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceMessage {
    UserMessage { message: ChatMessage },
    AssistantMessage { message: ChatMessage },
    #[serde(other)]
    Other,
}

impl VoiceMessage {
    pub fn user(content: impl Into<String>) -> Self {
        VoiceMessage::UserMessage {
            message: ChatMessage {
                role: "user".to_string(),
                content: content.into(),
            },
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        VoiceMessage::AssistantMessage {
            message: ChatMessage {
                role: "assistant".to_string(),
                content: content.into(),
            },
        }
    }

    /// `role: content` for conversational turns, `None` otherwise
    pub fn transcript_line(&self) -> Option<String> {
        match self {
            VoiceMessage::UserMessage { message } | VoiceMessage::AssistantMessage { message } => {
                Some(format!("{}: {}", message.role, message.content))
            }
            VoiceMessage::Other => None,
        }
    }
}

/// Join the conversational turns of a call into a newline-separated transcript
pub fn assemble_transcript(messages: &[VoiceMessage]) -> String {
    messages
        .iter()
        .filter_map(VoiceMessage::transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}
