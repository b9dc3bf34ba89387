use lazy_static::lazy_static;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use super::EmotionError;

pub const NEUTRAL_COLOR: &str = "#808080";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionSpec {
    pub name: &'static str,
    pub color: &'static str,
}

const fn spec(name: &'static str, color: &'static str) -> EmotionSpec {
    EmotionSpec { name, color }
}

pub static CATALOG: &[EmotionSpec] = &[
    // positive core
    spec("happiness", "#ffd700"),
    spec("joy", "#ffc107"),
    spec("contentment", "#9ccc65"),
    spec("excitement", "#ff9800"),
    spec("gratitude", "#f4b400"),
    spec("hope", "#81d4fa"),
    spec("pride", "#ab47bc"),
    spec("amusement", "#ffeb3b"),
    spec("serenity", "#80deea"),
    spec("enthusiasm", "#ffa726"),
    spec("optimism", "#ffe082"),
    spec("relief", "#a5d6a7"),
    spec("satisfaction", "#aed581"),
    spec("delight", "#fff176"),
    spec("elation", "#ffca28"),
    spec("euphoria", "#ff80ab"),
    spec("cheerfulness", "#ffee58"),
    spec("bliss", "#f8bbd0"),
    // love and connection
    spec("love", "#e91e63"),
    spec("affection", "#f06292"),
    spec("tenderness", "#f48fb1"),
    spec("compassion", "#ec407a"),
    spec("empathy", "#ba68c8"),
    spec("trust", "#4caf50"),
    spec("warmth", "#ff8a65"),
    spec("belonging", "#66bb6a"),
    spec("fondness", "#f8a5c2"),
    spec("adoration", "#d81b60"),
    spec("longing", "#7e57c2"),
    spec("intimacy", "#c2185b"),
    spec("kindness", "#81c784"),
    spec("devotion", "#ad1457"),
    spec("admiration", "#ce93d8"),
    spec("sympathy", "#b39ddb"),
    // sadness
    spec("sadness", "#3f51b5"),
    spec("grief", "#283593"),
    spec("despair", "#1a237e"),
    spec("melancholy", "#5c6bc0"),
    spec("loneliness", "#455a64"),
    spec("sorrow", "#303f9f"),
    spec("disappointment", "#7986cb"),
    spec("regret", "#5e35b1"),
    spec("hopelessness", "#263238"),
    spec("heartbreak", "#880e4f"),
    spec("nostalgia", "#9575cd"),
    spec("gloom", "#37474f"),
    spec("misery", "#311b92"),
    spec("yearning", "#8e7cc3"),
    spec("emptiness", "#546e7a"),
    spec("hurt", "#6a1b9a"),
    // fear
    spec("fear", "#6a0dad"),
    spec("anxiety", "#8e24aa"),
    spec("dread", "#4a148c"),
    spec("panic", "#d500f9"),
    spec("terror", "#38006b"),
    spec("nervousness", "#9c27b0"),
    spec("worry", "#7b1fa2"),
    spec("insecurity", "#9e9ac8"),
    spec("apprehension", "#8c6bb1"),
    spec("unease", "#807dba"),
    spec("paranoia", "#54278f"),
    spec("vulnerability", "#bcbddc"),
    spec("helplessness", "#6a51a3"),
    spec("existential_dread", "#2d004b"),
    // anger
    spec("anger", "#f44336"),
    spec("rage", "#b71c1c"),
    spec("frustration", "#e53935"),
    spec("irritation", "#ef5350"),
    spec("resentment", "#c62828"),
    spec("annoyance", "#ff7043"),
    spec("hostility", "#d32f2f"),
    spec("bitterness", "#8d6e63"),
    spec("contempt", "#795548"),
    spec("indignation", "#e64a19"),
    spec("jealousy", "#689f38"),
    spec("envy", "#558b2f"),
    spec("spite", "#a52714"),
    spec("disgust", "#827717"),
    spec("betrayal", "#7f0000"),
    spec("defiance", "#ff5722"),
    // self-conscious
    spec("shame", "#795c34"),
    spec("guilt", "#6d4c41"),
    spec("embarrassment", "#ff8a80"),
    spec("humiliation", "#a1887f"),
    spec("self_doubt", "#90a4ae"),
    spec("remorse", "#5d4037"),
    spec("shyness", "#ffab91"),
    spec("self_pity", "#8c7b75"),
    spec("modesty", "#bcaaa4"),
    spec("rejection", "#616161"),
    spec("abandonment", "#424242"),
    // cognitive
    spec("curiosity", "#00bcd4"),
    spec("confusion", "#ff9f43"),
    spec("interest", "#26c6da"),
    spec("fascination", "#00acc1"),
    spec("wonder", "#4dd0e1"),
    spec("awe", "#3949ab"),
    spec("surprise", "#ffeb3b"),
    spec("skepticism", "#78909c"),
    spec("certainty", "#1e88e5"),
    spec("doubt", "#b0bec5"),
    spec("contemplation", "#5c6bc0"),
    spec("focus", "#0288d1"),
    spec("realization", "#29b6f6"),
    spec("bewilderment", "#ffb74d"),
    spec("inspiration", "#00e5ff"),
    spec("creativity", "#18ffff"),
    spec("ambivalence", "#9e9e9e"),
    spec("suspicion", "#607d8b"),
    // energy and arousal
    spec("boredom", "#bdbdbd"),
    spec("apathy", "#9e9e9e"),
    spec("fatigue", "#757575"),
    spec("restlessness", "#ffb300"),
    spec("alertness", "#fdd835"),
    spec("calm", "#4fc3f7"),
    spec("tranquility", "#b2ebf2"),
    spec("vigor", "#ff6f00"),
    spec("lethargy", "#8d8d8d"),
    spec("agitation", "#ff3d00"),
    spec("anticipation", "#ff9100"),
    spec("impatience", "#ff6d00"),
    spec("eagerness", "#ffab40"),
    spec("overwhelm", "#c51162"),
    spec("numbness", "#cfd8dc"),
    // moral and values
    spec("honesty", "#2196f3"),
    spec("integrity", "#1565c0"),
    spec("justice", "#0d47a1"),
    spec("loyalty", "#1976d2"),
    spec("humility", "#a1c4fd"),
    spec("responsibility", "#0277bd"),
    spec("courage", "#ff5252"),
    spec("determination", "#d84315"),
    spec("resilience", "#2e7d32"),
    spec("patience", "#80cbc4"),
    spec("forgiveness", "#c5e1a5"),
    spec("sincerity", "#64b5f6"),
    spec("protectiveness", "#00897b"),
    spec("acceptance", "#a5d6a7"),
    // self and identity
    spec("self_understanding", "#009688"),
    spec("self_acceptance", "#26a69a"),
    spec("self_worth", "#00796b"),
    spec("self_awareness", "#4db6ac"),
    spec("confidence", "#ff4081"),
    spec("authenticity", "#00695c"),
    spec("purpose", "#3d5afe"),
    spec("independence", "#536dfe"),
    spec("identity_confusion", "#9fa8da"),
    spec("introspection", "#7e57c2"),
    // playful and miscellaneous
    spec("playfulness", "#ffd54f"),
    spec("mischief", "#ff7043"),
    spec("sarcasm", "#a1887f"),
    spec("whimsy", "#f48fb1"),
    spec("passion", "#d50000"),
    spec("desire", "#e040fb"),
    spec("obsession", "#4a0072"),
    spec("smugness", "#c0ca33"),
    spec("arrogance", "#9e9d24"),
    spec("triumph", "#ffab00"),
    spec("vindication", "#fbc02d"),
    spec("schadenfreude", "#827717"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Emotion(u16);

lazy_static! {
    static ref NAME_INDEX: HashMap<&'static str, Emotion> = CATALOG
        .iter()
        .enumerate()
        .map(|(index, spec)| (spec.name, Emotion(index as u16)))
        .collect();
}

impl Emotion {
    pub fn from_name(name: &str) -> Option<Emotion> {
        NAME_INDEX.get(name).copied()
    }

    /// Lenient lookup for names coming from outside the process: trims, lowercases and
    /// maps spaces and hyphens to underscores before the catalog lookup.
    pub fn from_loose_name(name: &str) -> Option<Emotion> {
        Self::from_name(&normalize_name(name))
    }

    pub fn all() -> impl Iterator<Item = Emotion> {
        (0..CATALOG.len()).map(|index| Emotion(index as u16))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn name(self) -> &'static str {
        CATALOG[self.index()].name
    }

    pub fn base_color(self) -> &'static str {
        CATALOG[self.index()].color
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Emotion {
    type Err = EmotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::from_loose_name(s).ok_or_else(|| EmotionError::UnknownEmotion(s.trim().to_string()))
    }
}

impl Serialize for Emotion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Emotion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Emotion::from_name(&name).ok_or_else(|| serde::de::Error::custom(format!("unknown emotion '{}'", name)))
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

pub fn color_for_name(name: &str) -> &'static str {
    Emotion::from_name(name).map(Emotion::base_color).unwrap_or(NEUTRAL_COLOR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmotionGroup {
    PositiveCore,
    LoveAndConnection,
    NegativeSadness,
    NegativeFear,
    NegativeAnger,
    SelfConscious,
    Cognitive,
    EnergyAndArousal,
    MoralAndValues,
    SelfAndIdentity,
}

impl EmotionGroup {
    pub const ALL: [EmotionGroup; 10] = [
        EmotionGroup::PositiveCore,
        EmotionGroup::LoveAndConnection,
        EmotionGroup::NegativeSadness,
        EmotionGroup::NegativeFear,
        EmotionGroup::NegativeAnger,
        EmotionGroup::SelfConscious,
        EmotionGroup::Cognitive,
        EmotionGroup::EnergyAndArousal,
        EmotionGroup::MoralAndValues,
        EmotionGroup::SelfAndIdentity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EmotionGroup::PositiveCore => "Positive Core",
            EmotionGroup::LoveAndConnection => "Love & Connection",
            EmotionGroup::NegativeSadness => "Negative - Sadness",
            EmotionGroup::NegativeFear => "Negative - Fear",
            EmotionGroup::NegativeAnger => "Negative - Anger",
            EmotionGroup::SelfConscious => "Self-Conscious",
            EmotionGroup::Cognitive => "Cognitive",
            EmotionGroup::EnergyAndArousal => "Energy & Arousal",
            EmotionGroup::MoralAndValues => "Moral & Values",
            EmotionGroup::SelfAndIdentity => "Self & Identity",
        }
    }

    pub fn from_name(name: &str) -> Option<EmotionGroup> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|group| group.name().eq_ignore_ascii_case(wanted))
    }

    pub fn member_names(self) -> &'static [&'static str] {
        match self {
            EmotionGroup::PositiveCore => &[
                "happiness", "joy", "contentment", "excitement", "gratitude", "hope", "pride",
                "amusement", "serenity", "enthusiasm", "optimism", "relief", "satisfaction",
            ],
            EmotionGroup::LoveAndConnection => &[
                "love", "affection", "tenderness", "compassion", "empathy", "trust", "warmth",
                "belonging", "longing", "kindness", "admiration",
            ],
            EmotionGroup::NegativeSadness => &[
                "sadness", "grief", "despair", "melancholy", "loneliness", "sorrow",
                "disappointment", "regret", "hopelessness", "heartbreak", "emptiness",
            ],
            EmotionGroup::NegativeFear => &[
                "fear", "anxiety", "dread", "panic", "terror", "nervousness", "worry",
                "insecurity", "apprehension", "unease", "paranoia", "helplessness",
            ],
            EmotionGroup::NegativeAnger => &[
                "anger", "rage", "frustration", "irritation", "resentment", "annoyance",
                "hostility", "bitterness", "contempt", "indignation", "jealousy", "envy",
            ],
            EmotionGroup::SelfConscious => &[
                "shame", "guilt", "embarrassment", "humiliation", "self_doubt", "remorse",
                "shyness", "self_pity",
            ],
            EmotionGroup::Cognitive => &[
                "curiosity", "confusion", "interest", "fascination", "wonder", "awe",
                "surprise", "skepticism", "certainty", "doubt", "contemplation", "focus",
            ],
            EmotionGroup::EnergyAndArousal => &[
                "boredom", "apathy", "fatigue", "restlessness", "alertness", "calm",
                "tranquility", "vigor", "lethargy", "agitation", "anticipation",
            ],
            EmotionGroup::MoralAndValues => &[
                "honesty", "integrity", "justice", "loyalty", "humility", "responsibility",
                "courage", "empathy", "patience", "forgiveness", "sincerity",
            ],
            EmotionGroup::SelfAndIdentity => &[
                "self_understanding", "self_acceptance", "self_worth", "self_awareness",
                "confidence", "authenticity", "purpose", "independence", "identity_confusion",
                "existential_dread",
            ],
        }
    }

    pub fn members(self) -> &'static [Emotion] {
        GROUP_MEMBERS
            .get(&self)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl fmt::Display for EmotionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EmotionGroup {
    type Err = EmotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmotionGroup::from_name(s).ok_or_else(|| EmotionError::UnknownGroup(s.trim().to_string()))
    }
}

lazy_static! {
    static ref GROUP_MEMBERS: HashMap<EmotionGroup, Vec<Emotion>> = EmotionGroup::ALL
        .into_iter()
        .map(|group| {
            let members = group
                .member_names()
                .iter()
                .filter_map(|name| Emotion::from_name(name))
                .collect();
            (group, members)
        })
        .collect();
}
