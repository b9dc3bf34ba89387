use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::state::intensity_from_json;
use super::{Emotion, Intensity, Shift};

pub const DEFAULT_INTENT: &str = "unknown";
pub const DEFAULT_ENGAGEMENT: Intensity = 50;
const MAX_INTENT_CHARS: usize = 80;

/// What the persona believes the other party is feeling and after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMindState {
    #[serde(default)]
    pub emotions: Shift,
    #[serde(default = "default_intent")]
    pub intent: String,
    #[serde(default = "default_engagement")]
    pub engagement: Intensity,
}

fn default_intent() -> String {
    DEFAULT_INTENT.to_string()
}

fn default_engagement() -> Intensity {
    DEFAULT_ENGAGEMENT
}

impl Default for UserMindState {
    fn default() -> Self {
        Self {
            emotions: Shift::new(),
            intent: default_intent(),
            engagement: default_engagement(),
        }
    }
}

/// Turns an untrusted `[{"emotion": .., "value": ..}, ..]` payload into a valid shift.
/// Malformed entries are dropped; this never fails.
pub fn sanitize_shift(raw: &Value) -> Shift {
    let Some(entries) = raw.as_array() else {
        if !raw.is_null() {
            log::debug!("Ignoring non-list emotion shift payload");
        }
        return Shift::new();
    };

    let mut shift = Shift::new();
    for entry in entries {
        match sanitize_entry(entry) {
            Some((emotion, value)) => shift.insert(emotion, value),
            None => log::debug!("Dropping malformed shift entry: {}", entry),
        }
    }
    shift
}

fn sanitize_entry(entry: &Value) -> Option<(Emotion, Intensity)> {
    let object = entry.as_object()?;
    let emotion = Emotion::from_loose_name(object.get("emotion")?.as_str()?)?;
    let value = intensity_from_json(object.get("value")?)?;
    Some((emotion, value))
}

fn sanitize_emotion_map(raw: &Value) -> Shift {
    match raw {
        Value::Array(_) => sanitize_shift(raw),
        Value::Object(map) => map
            .iter()
            .filter_map(|(name, value)| Some((Emotion::from_loose_name(name)?, intensity_from_json(value)?)))
            .collect(),
        _ => Shift::new(),
    }
}

/// Field-by-field leniency: each missing or invalid field falls back to its default.
pub fn sanitize_mind_state(raw: &Value) -> UserMindState {
    let Some(object) = raw.as_object() else {
        return UserMindState::default();
    };

    let emotions = object.get("emotions").map(sanitize_emotion_map).unwrap_or_default();

    let intent = object
        .get("intent")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|intent| !intent.is_empty())
        .map(|intent| intent.chars().take(MAX_INTENT_CHARS).collect())
        .unwrap_or_else(default_intent);

    let engagement = object
        .get("engagement")
        .and_then(intensity_from_json)
        .unwrap_or(DEFAULT_ENGAGEMENT);

    UserMindState {
        emotions,
        intent,
        engagement,
    }
}
