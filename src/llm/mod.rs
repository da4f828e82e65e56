pub mod ollama;

use async_trait::async_trait;
use serde::Serialize;
use crate::error::RelayError;
use crate::models::chat::{ ChatTurn, Role };

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequestMessage {
    pub role: Role,
    pub content: String,
}

/// A model reply together with the provider-assigned creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub content: String,
    pub created_at: String,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(&self, messages: Vec<ChatRequestMessage>) -> Result<ChatReply, RelayError>;

    fn get_model(&self) -> String;
}

/// Mirrors the whole conversation, prefixing whichever turn sits at
/// position 0 with the preamble.
pub fn build_messages(preamble: &str, turns: &[ChatTurn]) -> Vec<ChatRequestMessage> {
    turns
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            let content = if i == 0 {
                format!("{}{}", preamble, turn.content)
            } else {
                turn.content.clone()
            };
            ChatRequestMessage { role: turn.role, content }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: Role, content: &str) -> ChatTurn {
        ChatTurn { role, content: content.into(), timestamp: "2024-01-01T00:00:00Z".into() }
    }

    #[test]
    fn preamble_applies_only_to_first_turn() {
        let turns = vec![
            turn(Role::User, "first"),
            turn(Role::Assistant, "reply"),
            turn(Role::User, "second"),
        ];
        let messages = build_messages("Be brief. ", &turns);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, "Be brief. first");
        assert_eq!(messages[1], ChatRequestMessage { role: Role::Assistant, content: "reply".into() });
        assert_eq!(messages[2].content, "second");
    }

    #[test]
    fn empty_history_builds_empty_payload() {
        assert!(build_messages("x", &[]).is_empty());
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatRequestMessage {
            role: Role::Assistant,
            content: "ok".into(),
        }).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "assistant", "content": "ok" }));
    }
}
