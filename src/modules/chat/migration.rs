use serde_json::{json, Map, Value};

use super::conversation::DEFAULT_CORE_VALUES;
use super::PersistenceError;
use crate::modules::emotion::UserMindState;

pub const SCHEMA_VERSION_KEY: &str = "schema_version";
pub const LEGACY_MEMORY_KEY: &str = "memory";

type UpgradeStep = fn(&mut Map<String, Value>);

/// Step `i` upgrades a blob from schema version `i` to `i + 1`. Every step only inserts
/// data that is missing and never rewrites fields that are already present.
const UPGRADES: &[(&str, UpgradeStep)] = &[
    ("hoist legacy memory into identity narrative", hoist_legacy_memory),
    ("add frozen flag", add_frozen),
    ("add inferred mind state", add_mind_state),
    ("add core values", add_core_values),
    ("add coherence check timestamp", add_coherence_check),
    ("add state history", add_history),
    ("add domain state", add_domain_state),
];

pub const CURRENT_SCHEMA_VERSION: u64 = UPGRADES.len() as u64;

pub fn schema_version(root: &Map<String, Value>) -> u64 {
    root.get(SCHEMA_VERSION_KEY).and_then(Value::as_u64).unwrap_or(0)
}

/// Validates the top-level shape and brings the blob up to the current schema. A blob
/// written by a newer schema keeps its version number.
pub fn migrate(mut blob: Value) -> Result<Value, PersistenceError> {
    let root = blob
        .as_object_mut()
        .ok_or_else(|| PersistenceError::Schema("stored state is not a JSON object".to_string()))?;

    if !root.get("chats").map(Value::is_object).unwrap_or(false) {
        return Err(PersistenceError::Schema("stored state has no 'chats' object".to_string()));
    }

    let version = schema_version(root);
    if version > CURRENT_SCHEMA_VERSION {
        log::warn!(
            "Stored state has schema version {} (newer than {}); loading what is understood",
            version,
            CURRENT_SCHEMA_VERSION
        );
    }

    for (index, (description, step)) in UPGRADES.iter().enumerate().skip(version as usize) {
        log::debug!("Applying state upgrade {} -> {}: {}", index, index + 1, description);
        step(root);
    }

    root.insert(SCHEMA_VERSION_KEY.to_string(), json!(version.max(CURRENT_SCHEMA_VERSION)));
    Ok(blob)
}

fn for_each_chat(root: &mut Map<String, Value>, mut apply: impl FnMut(&mut Map<String, Value>)) {
    if let Some(Value::Object(chats)) = root.get_mut("chats") {
        for chat in chats.values_mut() {
            if let Value::Object(chat) = chat {
                apply(chat);
            }
        }
    }
}

fn backfill_chats(root: &mut Map<String, Value>, key: &str, default: impl Fn() -> Value) {
    for_each_chat(root, |chat| {
        if !chat.contains_key(key) {
            chat.insert(key.to_string(), default());
        }
    });
}

fn hoist_legacy_memory(root: &mut Map<String, Value>) {
    let Some(memory) = root.remove(LEGACY_MEMORY_KEY) else {
        return;
    };

    let identity = root
        .entry("identity")
        .or_insert_with(|| json!({}));

    if let (Value::Object(identity), Value::String(text)) = (identity, memory) {
        let has_narrative = identity
            .get("narrative")
            .and_then(Value::as_str)
            .map(|narrative| !narrative.is_empty())
            .unwrap_or(false);

        if !has_narrative {
            identity.insert("narrative".to_string(), Value::String(text));
        }
    }
}

fn add_frozen(root: &mut Map<String, Value>) {
    backfill_chats(root, "frozen", || json!(false));
}

fn add_mind_state(root: &mut Map<String, Value>) {
    backfill_chats(root, "mind_state", || {
        serde_json::to_value(UserMindState::default()).unwrap_or_else(|_| json!({}))
    });
}

fn add_core_values(root: &mut Map<String, Value>) {
    backfill_chats(root, "core_values", || json!(DEFAULT_CORE_VALUES));
}

fn add_coherence_check(root: &mut Map<String, Value>) {
    backfill_chats(root, "last_coherence_check", || Value::Null);
}

fn add_history(root: &mut Map<String, Value>) {
    backfill_chats(root, "history", || json!([]));
}

fn add_domain_state(root: &mut Map<String, Value>) {
    backfill_chats(root, "domain_state", || json!({"knowledge": {}, "agent": {}}));
}
