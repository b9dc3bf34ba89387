use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::{Emotion, EmotionError, EmotionGroup, CATALOG};

pub type Intensity = u8;

pub const MAX_INTENSITY: Intensity = 100;

/// Baseline personality applied on top of an all-zero state.
pub const DEFAULT_PERSONALITY: &[(&str, Intensity)] = &[
    ("happiness", 60),
    ("honesty", 90),
    ("curiosity", 70),
    ("interest", 65),
    ("empathy", 75),
    ("kindness", 70),
    ("trust", 50),
    ("calm", 55),
    ("hope", 55),
    ("contentment", 50),
    ("integrity", 85),
    ("self_awareness", 40),
];

pub(crate) fn intensity_from_f64(value: f64) -> Intensity {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, MAX_INTENSITY as f64) as Intensity
}

/// Accepts JSON numbers and numeric strings; anything else is rejected.
pub(crate) fn intensity_from_json(value: &Value) -> Option<Intensity> {
    let raw = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if raw.is_finite() {
        Some(intensity_from_f64(raw))
    } else {
        None
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EmotionalState {
    values: Vec<Intensity>,
}

impl EmotionalState {
    pub fn zeroed() -> Self {
        Self {
            values: vec![0; CATALOG.len()],
        }
    }

    pub fn create_default() -> Self {
        let mut state = Self::zeroed();
        for (name, value) in DEFAULT_PERSONALITY {
            if let Some(emotion) = Emotion::from_name(name) {
                state.values[emotion.index()] = *value;
            }
        }
        state
    }

    pub fn get(&self, emotion: Emotion) -> Intensity {
        self.values[emotion.index()]
    }

    pub fn get_by_name(&self, name: &str) -> Result<Intensity, EmotionError> {
        let emotion: Emotion = name.parse()?;
        Ok(self.get(emotion))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, Intensity)> + '_ {
        Emotion::all().map(move |emotion| (emotion, self.get(emotion)))
    }

    #[must_use]
    pub fn set(&self, emotion: Emotion, value: f64) -> Self {
        let mut next = self.clone();
        next.values[emotion.index()] = intensity_from_f64(value);
        next
    }

    pub fn set_by_name(&self, name: &str, value: f64) -> Result<Self, EmotionError> {
        let emotion: Emotion = name.parse()?;
        Ok(self.set(emotion, value))
    }

    #[must_use]
    pub fn set_many(&self, shift: &Shift) -> Self {
        let mut next = self.clone();
        for (emotion, value) in shift.iter() {
            next.values[emotion.index()] = value.min(MAX_INTENSITY);
        }
        next
    }

    #[must_use]
    pub fn adjust_group(&self, group: EmotionGroup, delta: i32) -> Self {
        let mut next = self.clone();
        for emotion in group.members() {
            let current = next.values[emotion.index()] as i32;
            next.values[emotion.index()] = current.saturating_add(delta).clamp(0, MAX_INTENSITY as i32) as Intensity;
        }
        next
    }

    #[must_use]
    pub fn max_group(&self, group: EmotionGroup) -> Self {
        let mut next = self.clone();
        for emotion in group.members() {
            next.values[emotion.index()] = MAX_INTENSITY;
        }
        next
    }

    #[must_use]
    pub fn clear_all(&self) -> Self {
        Self::zeroed()
    }

    /// Nonzero emotions, strongest first; equal intensities keep catalog order.
    pub fn ranked(&self) -> Vec<(Emotion, Intensity)> {
        let mut ranked: Vec<(Emotion, Intensity)> = self.iter().filter(|(_, value)| *value > 0).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    pub(crate) fn from_lenient_map(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut state = Self::zeroed();
        for (name, value) in entries {
            match Emotion::from_name(&name) {
                Some(emotion) => state.values[emotion.index()] = intensity_from_json(&value).unwrap_or(0),
                None => log::debug!("Dropping unknown emotion '{}' from stored state", name),
            }
        }
        state
    }
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self::create_default()
    }
}

impl fmt::Debug for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().filter(|(_, value)| *value > 0).map(|(e, v)| (e.name(), v)))
            .finish()
    }
}

impl Serialize for EmotionalState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (emotion, value) in self.iter() {
            map.serialize_entry(emotion.name(), &value)?;
        }
        map.end()
    }
}

struct LenientMapVisitor;

impl<'de> Visitor<'de> for LenientMapVisitor {
    type Value = Vec<(String, Value)>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of emotion names to intensities")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::new();
        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            entries.push((name, value));
        }
        Ok(entries)
    }
}

impl<'de> Deserialize<'de> for EmotionalState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = deserializer.deserialize_map(LenientMapVisitor)?;
        Ok(Self::from_lenient_map(entries))
    }
}

/// Target intensities keyed by emotion. Only ever holds catalog emotions and values in 0..=100.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shift(BTreeMap<Emotion, Intensity>);

impl Shift {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, emotion: Emotion, value: Intensity) {
        self.0.insert(emotion, value.min(MAX_INTENSITY));
    }

    pub fn get(&self, emotion: Emotion) -> Option<Intensity> {
        self.0.get(&emotion).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, Intensity)> + '_ {
        self.0.iter().map(|(emotion, value)| (*emotion, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Emotion, Intensity)> for Shift {
    fn from_iter<I: IntoIterator<Item = (Emotion, Intensity)>>(iter: I) -> Self {
        let mut shift = Shift::new();
        for (emotion, value) in iter {
            shift.insert(emotion, value);
        }
        shift
    }
}

impl Serialize for Shift {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (emotion, value) in self.iter() {
            map.serialize_entry(emotion.name(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Shift {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = deserializer.deserialize_map(LenientMapVisitor)?;
        Ok(entries
            .into_iter()
            .filter_map(|(name, value)| Some((Emotion::from_name(&name)?, intensity_from_json(&value)?)))
            .collect())
    }
}
