pub mod emotion;
pub mod chat;
pub mod terminal;
