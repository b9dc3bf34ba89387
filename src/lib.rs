pub mod config;
pub mod modules;
pub mod api;

#[cfg(test)]
pub mod _test_mock;

pub use config::{ConfigError, EngineConfig, GradientConfig, InertiaConfig};
pub use modules::chat::{
    AiReply, BlobStore, ChatSession, Conversation, FileBlobStore, MemoryBlobStore, Persistence, PersistenceError,
    SessionError, UserAppState,
};
pub use modules::emotion::{
    apply_inertia, derive_background, derive_color, sanitize_mind_state, sanitize_shift, Background, Emotion,
    EmotionError, EmotionGroup, EmotionalState, InertiaEngine, Shift, UserMindState,
};
pub use modules::terminal::{Console, LogEntry, LogLevel};
