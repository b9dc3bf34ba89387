use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::modules::emotion::{EmotionalState, UserMindState};

pub type ConversationId = String;

pub const DEFAULT_CORE_VALUES: &[&str] = &["honesty", "curiosity", "kindness"];
pub const DEFAULT_CONVERSATION_NAME: &str = "New Chat";

pub fn default_core_values() -> BTreeSet<String> {
    DEFAULT_CORE_VALUES.iter().map(|value| value.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    Thought,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub taken_at: DateTime<Utc>,
    pub state: EmotionalState,
}

/// Knowledge and agent bookkeeping owned by other subsystems; carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainState {
    #[serde(default = "empty_object")]
    pub knowledge: Value,
    #[serde(default = "empty_object")]
    pub agent: Value,
}

fn empty_object() -> Value {
    json!({})
}

fn default_conversation_name() -> String {
    DEFAULT_CONVERSATION_NAME.to_string()
}

/// Reads a value that may be null or of the wrong type; `None` in both cases.
fn lenient<T: DeserializeOwned>(raw: Value) -> Option<T> {
    if raw.is_null() {
        return None;
    }
    match serde_json::from_value(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Replacing unreadable stored field with its default: {}", e);
            None
        }
    }
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn or_now<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    Ok(lenient(Value::deserialize(deserializer)?).unwrap_or_else(Utc::now))
}

fn or_default_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient(Value::deserialize(deserializer)?).unwrap_or_else(default_conversation_name))
}

fn or_default_core_values<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<String>, D::Error> {
    Ok(lenient(Value::deserialize(deserializer)?).unwrap_or_else(default_core_values))
}

/// Keeps every readable entry of a stored list and drops the rest.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().filter_map(lenient).collect()),
        Value::Null => Ok(Vec::new()),
        other => {
            log::warn!("Expected a stored list, found {}", other);
            Ok(Vec::new())
        }
    }
}

/// Each conversation is read on its own. The map key is the conversation id; an entry
/// that is not an object is skipped instead of failing the whole aggregate.
fn deserialize_chats<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<ConversationId, Conversation>, D::Error> {
    let raw = Map::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| read_conversation(key, value))
        .collect())
}

fn read_conversation(key: ConversationId, value: Value) -> Option<(ConversationId, Conversation)> {
    let Value::Object(mut fields) = value else {
        log::warn!("Skipping stored conversation '{}': not an object", key);
        return None;
    };

    if let Some(stored) = fields.get("id").and_then(Value::as_str) {
        if stored != key {
            log::warn!("Conversation '{}' was stored under key '{}'; using the key", stored, key);
        }
    }
    fields.insert("id".to_string(), Value::String(key.clone()));

    match serde_json::from_value(Value::Object(fields)) {
        Ok(conversation) => Some((key, conversation)),
        Err(e) => {
            log::warn!("Skipping unreadable conversation '{}': {}", key, e);
            None
        }
    }
}

impl Default for DomainState {
    fn default() -> Self {
        Self {
            knowledge: empty_object(),
            agent: empty_object(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default = "default_conversation_name", deserialize_with = "or_default_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub messages: Vec<Message>,
    #[serde(default = "Utc::now", deserialize_with = "or_now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "or_default")]
    pub emotional_state: EmotionalState,
    #[serde(default, deserialize_with = "or_default")]
    pub mind_state: UserMindState,
    #[serde(default, deserialize_with = "lenient_list")]
    pub history: Vec<StateSnapshot>,
    #[serde(default, deserialize_with = "or_default")]
    pub frozen: bool,
    #[serde(default = "default_core_values", deserialize_with = "or_default_core_values")]
    pub core_values: BTreeSet<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub last_coherence_check: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "or_default")]
    pub domain_state: DomainState,
    /// Fields written by a newer schema, kept so a save does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Conversation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            messages: Vec::new(),
            created_at: Utc::now(),
            emotional_state: EmotionalState::create_default(),
            mind_state: UserMindState::default(),
            history: Vec::new(),
            frozen: false,
            core_values: default_core_values(),
            last_coherence_check: None,
            domain_state: DomainState::default(),
            extra: Map::new(),
        }
    }

    /// Records the current state in the history log, keeping at most `limit` snapshots.
    pub fn push_snapshot(&mut self, limit: usize) {
        self.history.push(StateSnapshot {
            taken_at: Utc::now(),
            state: self.emotional_state.clone(),
        });

        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiIdentity {
    #[serde(default, deserialize_with = "or_default")]
    pub narrative: String,
    #[serde(default, deserialize_with = "or_default")]
    pub total_messages: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub total_conversations: u64,
    #[serde(default = "Utc::now", deserialize_with = "or_now")]
    pub born_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AiIdentity {
    fn default() -> Self {
        Self {
            narrative: String::new(),
            total_messages: 0,
            total_conversations: 0,
            born_at: Utc::now(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAppState {
    #[serde(default, deserialize_with = "or_default")]
    pub custom_instruction: String,
    #[serde(deserialize_with = "deserialize_chats")]
    pub chats: BTreeMap<ConversationId, Conversation>,
    #[serde(default, deserialize_with = "or_default")]
    pub active_chat_id: Option<ConversationId>,
    #[serde(default, deserialize_with = "or_default")]
    pub identity: AiIdentity,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserAppState {
    /// A fresh aggregate with a single active conversation.
    pub fn new() -> Self {
        let mut state = Self {
            custom_instruction: String::new(),
            chats: BTreeMap::new(),
            active_chat_id: None,
            identity: AiIdentity::default(),
            extra: Map::new(),
        };
        state.add_conversation(Conversation::new(DEFAULT_CONVERSATION_NAME));
        state
    }

    pub fn add_conversation(&mut self, conversation: Conversation) -> ConversationId {
        let id = conversation.id.clone();
        self.chats.insert(id.clone(), conversation);
        self.active_chat_id = Some(id.clone());
        self.identity.total_conversations += 1;
        id
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active_chat_id.as_ref().and_then(|id| self.chats.get(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut Conversation> {
        let id = self.active_chat_id.as_ref()?;
        self.chats.get_mut(id)
    }

    /// Points a dangling active id at the earliest-created conversation. An aggregate
    /// left with no conversations gets a fresh one.
    pub fn repair_active(&mut self) {
        if self.chats.is_empty() {
            self.add_conversation(Conversation::new(DEFAULT_CONVERSATION_NAME));
            return;
        }

        let dangling = match &self.active_chat_id {
            Some(id) => !self.chats.contains_key(id),
            None => !self.chats.is_empty(),
        };

        if dangling {
            self.active_chat_id = self
                .chats
                .values()
                .min_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
                .map(|conversation| conversation.id.clone());
        }
    }
}

impl Default for UserAppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Conversation, UserAppState, DEFAULT_CONVERSATION_NAME, DEFAULT_CORE_VALUES};
    use serde_json::json;

    #[test]
    fn test_new_conversation_defaults() {
        let conversation = Conversation::new("Test");
        assert_eq!(conversation.name, "Test");
        assert!(!conversation.frozen);
        assert!(conversation.history.is_empty());
        assert_eq!(conversation.core_values.len(), DEFAULT_CORE_VALUES.len());
        assert_eq!(conversation.emotional_state.get_by_name("honesty").unwrap(), 90);
    }

    #[test]
    fn test_push_snapshot_respects_limit() {
        let mut conversation = Conversation::new("Test");
        for value in 0..5 {
            conversation.emotional_state = conversation.emotional_state.set_by_name("joy", value as f64).unwrap();
            conversation.push_snapshot(3);
        }
        assert_eq!(conversation.history.len(), 3);
        assert_eq!(conversation.history[0].state.get_by_name("joy").unwrap(), 2);
    }

    #[test]
    fn test_new_app_state_has_active_conversation() {
        let state = UserAppState::new();
        assert_eq!(state.chats.len(), 1);
        assert!(state.active().is_some());
        assert_eq!(state.identity.total_conversations, 1);
    }

    #[test]
    fn test_stored_conversation_fields_fall_back_individually() {
        let state: UserAppState = serde_json::from_value(json!({
            "custom_instruction": null,
            "chats": {
                "kept": {
                    "id": "renamed",
                    "frozen": null,
                    "name": 7,
                    "messages": [{"role": "user", "content": "hi", "timestamp": "2024-01-01T00:00:00Z"}, {"role": 3}],
                    "emotional_state": "broken",
                    "future_field": {"x": 1}
                },
                "dropped": 42
            }
        }))
        .unwrap();

        assert_eq!(state.custom_instruction, "");
        assert_eq!(state.chats.len(), 1);

        let kept = &state.chats["kept"];
        assert_eq!(kept.id, "kept");
        assert!(!kept.frozen);
        assert_eq!(kept.name, DEFAULT_CONVERSATION_NAME);
        assert_eq!(kept.messages.len(), 1);
        assert_eq!(kept.emotional_state.get_by_name("honesty").unwrap(), 90);
        assert_eq!(kept.extra["future_field"], json!({"x": 1}));
    }

    #[test]
    fn test_repair_active_on_empty_chats() {
        let mut state = UserAppState::new();
        state.chats.clear();
        state.repair_active();
        assert_eq!(state.chats.len(), 1);
        assert!(state.active().is_some());
    }

    #[test]
    fn test_repair_active_on_dangling_id() {
        let mut state = UserAppState::new();
        let id = state.active_chat_id.clone();
        state.active_chat_id = Some("missing".to_string());
        state.repair_active();
        assert_eq!(state.active_chat_id, id);
    }
}
