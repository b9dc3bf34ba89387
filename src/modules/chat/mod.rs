pub mod conversation;
pub mod migration;
pub mod store;
pub mod persistence;
pub mod session;

use thiserror::Error;

use crate::modules::emotion::EmotionError;

pub use conversation::{
    AiIdentity, Conversation, ConversationId, DomainState, Message, Role, StateSnapshot, UserAppState,
};
pub use migration::CURRENT_SCHEMA_VERSION;
pub use persistence::Persistence;
pub use session::{AiReply, ChatSession, PromptContext, TurnReport};
pub use store::{BlobStore, FileBlobStore, MemoryBlobStore};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Conversation '{0}' not found")]
    ConversationNotFound(String),

    #[error("No active conversation")]
    NoActiveConversation,

    #[error(transparent)]
    Emotion(#[from] EmotionError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
