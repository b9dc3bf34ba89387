use mockall::mock;
use persona_affect_matrix::{BlobStore, PersistenceError};
use serde_json::{json, Value};

mock! {
    pub Store {}

    impl BlobStore for Store {
        fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
        fn set(&self, key: &str, blob: &str) -> Result<(), PersistenceError>;
    }
}

impl MockStore {
    /// Reads find nothing and every write fails, like a full browser quota.
    pub fn quota_exceeded() -> Self {
        let mut store = MockStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .returning(|_, _| Err(PersistenceError::Storage("quota exceeded".to_string())));
        store
    }

    pub fn unreadable() -> Self {
        let mut store = MockStore::new();
        store
            .expect_get()
            .returning(|_| Err(PersistenceError::Storage("corrupted storage".to_string())));
        store.expect_set().returning(|_, _| Ok(()));
        store
    }
}

pub struct TestShiftData;

impl TestShiftData {
    pub fn malformed_payloads() -> Vec<Value> {
        vec![
            json!(null),
            json!(true),
            json!(42),
            json!(-1.5),
            json!("happiness"),
            json!({"emotion": "happiness", "value": 50}),
            json!({"happiness": 50}),
            json!([]),
            json!([null, 1, "x", [], {}]),
            json!([{"emotion": null, "value": 10}]),
            json!([{"emotion": "joy", "value": null}]),
            json!([{"emotion": "joy", "value": "NaN"}]),
            json!([{"emotion": "joy", "value": "inf"}]),
            json!([{"emotion": "joy", "value": 1e300}]),
            json!([{"emotion": "joy", "value": -1e300}]),
            json!([{"emotion": "joy", "value": {"nested": 1}}]),
            json!([{"emotion": "joy", "value": 33.49}, {"emotion": "joy", "value": 66.5}]),
            json!([{"emotion": ["joy"], "value": 10}]),
        ]
    }

    pub fn ai_reply(shifts: Value) -> Value {
        json!({
            "status": "success",
            "thought": "They seem happy today.",
            "response": "That's wonderful to hear!",
            "shifts": shifts,
            "mind_state": {"emotions": [{"emotion": "joy", "value": 70}], "intent": "sharing news", "engagement": 85}
        })
    }
}

pub struct TestStateData;

impl TestStateData {
    /// A blob written before schema versions existed: memory at the top level and
    /// conversations missing every later field.
    pub fn legacy_blob() -> Value {
        json!({
            "custom_instruction": "Speak softly.",
            "memory": "We once talked about the sea.",
            "active_chat_id": "gone",
            "chats": {
                "late": {
                    "id": "late",
                    "name": "Later chat",
                    "created_at": "2024-05-02T08:00:00Z",
                    "emotional_state": {"joy": "65", "forgotten_feeling": 30}
                },
                "early": {
                    "id": "early",
                    "name": "Earlier chat",
                    "created_at": "2024-05-01T08:00:00Z",
                    "messages": [{"role": "user", "content": "hello", "timestamp": "2024-05-01T08:00:01Z"}],
                    "emotional_state": {"sadness": 20},
                    "frozen": true
                }
            }
        })
    }

    /// A current-schema blob where only some conversations are damaged.
    pub fn partly_damaged_blob(schema_version: u64) -> Value {
        json!({
            "schema_version": schema_version,
            "custom_instruction": "Keep it short.",
            "active_chat_id": "good",
            "identity": {"narrative": "Started in spring.", "total_messages": 4, "total_conversations": 3},
            "chats": {
                "good": {
                    "id": "good",
                    "name": "Good chat",
                    "created_at": "2024-06-01T09:00:00Z",
                    "messages": [{"role": "user", "content": "still here?", "timestamp": "2024-06-01T09:00:02Z"}],
                    "emotional_state": {"joy": 55},
                    "frozen": false
                },
                "nulls": {
                    "id": "nulls",
                    "name": "Nulls",
                    "created_at": "2024-06-02T09:00:00Z",
                    "emotional_state": {"fear": 35},
                    "frozen": null,
                    "mind_state": null,
                    "core_values": null
                },
                "bare": {
                    "emotional_state": {"awe": 12},
                    "frozen": "yes"
                },
                "moved": {
                    "id": "old-id",
                    "name": "Moved",
                    "created_at": "2024-06-03T09:00:00Z"
                },
                "junk": "not a conversation"
            }
        })
    }
}
