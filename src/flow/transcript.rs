//! Transcript types for the assistant conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Bot,
    User,
}

/// A selectable quick reply offered with a bot prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatOption {
    /// Label shown to the visitor.
    pub label: String,
    /// Stable code stored and submitted for this choice.
    pub value: String,
}

impl ChatOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One message in the conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub content: String,
    /// Quick replies attached to a bot prompt, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ChatOption>>,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// A plain bot message.
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Bot,
            content: content.into(),
            options: None,
            sent_at: Utc::now(),
        }
    }

    /// A bot prompt carrying a quick-reply set.
    pub fn bot_with_options(content: impl Into<String>, options: Vec<ChatOption>) -> Self {
        Self {
            options: Some(options),
            ..Self::bot(content)
        }
    }

    /// A visitor message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::User,
            content: content.into(),
            options: None,
            sent_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_message_has_no_options() {
        let msg = ChatMessage::bot("Olá!");
        assert_eq!(msg.sender, Sender::Bot);
        assert!(msg.options.is_none());
    }

    #[test]
    fn options_survive_serde() {
        let msg = ChatMessage::bot_with_options(
            "Escolha:",
            vec![ChatOption::new("a", "Opção A"), ChatOption::new("b", "Opção B")],
        );
        let json = serde_json::to_string(&msg).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.options.unwrap().len(), 2);
    }

    #[test]
    fn plain_message_omits_options_key() {
        let json = serde_json::to_string(&ChatMessage::user("oi")).unwrap();
        assert!(!json.contains("options"));
    }
}
