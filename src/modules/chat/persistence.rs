use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

use super::conversation::UserAppState;
use super::migration::{migrate, CURRENT_SCHEMA_VERSION, SCHEMA_VERSION_KEY};
use super::store::BlobStore;
use super::PersistenceError;

#[derive(Serialize)]
struct Envelope<'a> {
    schema_version: u64,
    #[serde(flatten)]
    state: &'a UserAppState,
}

pub fn encode(state: &UserAppState) -> Result<String, PersistenceError> {
    encode_as(state, CURRENT_SCHEMA_VERSION)
}

fn encode_as(state: &UserAppState, schema_version: u64) -> Result<String, PersistenceError> {
    let envelope = Envelope { schema_version, state };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parses, migrates and deserializes a stored or imported document.
pub fn decode(json: &str) -> Result<UserAppState, PersistenceError> {
    decode_versioned(json).map(|(state, _)| state)
}

fn decode_versioned(json: &str) -> Result<(UserAppState, u64), PersistenceError> {
    let blob: Value = serde_json::from_str(json)?;
    let mut migrated = migrate(blob)?;

    let version = migrated
        .as_object_mut()
        .and_then(|root| root.remove(SCHEMA_VERSION_KEY))
        .and_then(|version| version.as_u64())
        .unwrap_or(CURRENT_SCHEMA_VERSION);

    let mut state: UserAppState = serde_json::from_value(migrated)?;
    state.repair_active();
    Ok((state, version))
}

/// Fields a newer schema added are carried in the `extra` maps, and the newest schema
/// version seen is written back, so an older build does not downgrade a blob.
pub struct Persistence<S: BlobStore> {
    store: S,
    key: String,
    schema_version: AtomicU64,
}

impl<S: BlobStore> Persistence<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            schema_version: AtomicU64::new(CURRENT_SCHEMA_VERSION),
        }
    }

    fn note_version(&self, version: u64) {
        self.schema_version.fetch_max(version, Ordering::Relaxed);
    }

    fn encode(&self, state: &UserAppState) -> Result<String, PersistenceError> {
        encode_as(state, self.schema_version.load(Ordering::Relaxed))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Never fails: a missing, unreadable or invalid blob yields a fresh state.
    pub fn load(&self) -> UserAppState {
        let blob = match self.store.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                log::info!("No stored state under '{}'; starting fresh", self.key);
                return UserAppState::new();
            }
            Err(e) => {
                log::error!("Failed to read stored state: {}", e);
                return UserAppState::new();
            }
        };

        match decode_versioned(&blob) {
            Ok((state, version)) => {
                self.note_version(version);
                log::debug!("Loaded {} conversation(s) from '{}'", state.chats.len(), self.key);
                state
            }
            Err(e) => {
                log::error!("Stored state is unusable ({}); starting fresh", e);
                UserAppState::new()
            }
        }
    }

    /// Best-effort overwrite of the stored blob. Failures are logged, not returned.
    pub fn save(&self, state: &UserAppState) {
        let result = self.encode(state).and_then(|blob| self.store.set(&self.key, &blob));
        if let Err(e) = result {
            log::error!("Failed to save state under '{}': {}", self.key, e);
        }
    }

    pub fn export(&self, state: &UserAppState) -> Result<String, PersistenceError> {
        self.encode(state)
    }

    /// Same migration path as `load`, but errors are returned so a bad document never
    /// replaces existing data.
    pub fn import(&self, json: &str) -> Result<UserAppState, PersistenceError> {
        let (state, version) = decode_versioned(json)?;
        self.note_version(version);
        Ok(state)
    }
}
