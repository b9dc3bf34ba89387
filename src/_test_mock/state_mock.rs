use crate::modules::chat::{Conversation, Message, Role, UserAppState};
use crate::modules::emotion::{Emotion, EmotionalState, Shift, UserMindState};
use serde_json::{json, Value};

pub struct StateTestHelpers;

impl StateTestHelpers {
    pub fn emotion(name: &str) -> Emotion {
        Emotion::from_name(name).unwrap_or_else(|| panic!("'{}' is not in the catalog", name))
    }

    pub fn state_with(values: &[(&str, u8)]) -> EmotionalState {
        values
            .iter()
            .fold(EmotionalState::zeroed(), |state, (name, value)| state.set(Self::emotion(name), *value as f64))
    }

    pub fn shift(values: &[(&str, u8)]) -> Shift {
        values.iter().map(|(name, value)| (Self::emotion(name), *value)).collect()
    }

    /// A blob as written before schema versioning: no version tag, a top-level free-text
    /// memory and conversations without any of the later per-conversation fields.
    pub fn legacy_blob() -> Value {
        json!({
            "custom_instruction": "Be gentle.",
            "memory": "I remember the rain.",
            "active_chat_id": "chat-a",
            "chats": {
                "chat-a": {
                    "id": "chat-a",
                    "name": "First",
                    "created_at": "2024-03-01T10:00:00Z",
                    "messages": [
                        {"role": "user", "content": "hi", "timestamp": "2024-03-01T10:00:05Z"}
                    ],
                    "emotional_state": {"happiness": 70, "fear": 10, "retired_emotion": 40}
                },
                "chat-b": {
                    "id": "chat-b",
                    "name": "Second",
                    "created_at": "2024-03-02T10:00:00Z",
                    "emotional_state": {"sadness": 55}
                }
            }
        })
    }

    pub fn populated_app_state() -> UserAppState {
        let mut state = UserAppState::new();
        state.custom_instruction = "Stay curious.".to_string();
        state.identity.narrative = "Born on a quiet afternoon.".to_string();

        let mut conversation = Conversation::new("Populated");
        conversation.messages.push(Message::new(Role::User, "hello"));
        conversation.messages.push(Message::new(Role::Assistant, "hi there"));
        conversation.push_snapshot(10);
        conversation.emotional_state = Self::state_with(&[("joy", 45), ("grief", 12)]);
        conversation.mind_state = UserMindState {
            emotions: Self::shift(&[("curiosity", 60)]),
            intent: "chatting".to_string(),
            engagement: 80,
        };
        conversation.frozen = true;
        conversation.domain_state.knowledge = json!({"facts": ["sky is blue"]});
        state.add_conversation(conversation);

        state
    }
}
