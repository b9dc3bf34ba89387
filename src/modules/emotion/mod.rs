pub mod registry;
pub mod state;
pub mod inertia;
pub mod sanitizer;
pub mod gradient;
pub mod crazy;

use thiserror::Error;

pub use registry::{color_for_name, Emotion, EmotionGroup, EmotionSpec, CATALOG, NEUTRAL_COLOR};
pub use state::{EmotionalState, Intensity, Shift, DEFAULT_PERSONALITY, MAX_INTENSITY};
pub use inertia::{apply_inertia, is_heavy, InertiaEngine, HEAVY_EMOTIONS};
pub use sanitizer::{sanitize_mind_state, sanitize_shift, UserMindState};
pub use gradient::{derive_background, derive_color, Background, GradientDeriver, DARK_NEUTRAL};
pub use crazy::{random_shift, CrazyMode};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmotionError {
    #[error("Unknown emotion: {0}")]
    UnknownEmotion(String),

    #[error("Unknown emotion group: {0}")]
    UnknownGroup(String),

    #[error("Invalid intensity for '{emotion}': {value} (must be between 0 and 100)")]
    InvalidIntensity { emotion: String, value: String },
}
