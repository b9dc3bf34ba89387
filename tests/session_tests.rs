pub mod mock;

use mock::TestShiftData;
use persona_affect_matrix::modules::chat::session::FALLBACK_RESPONSE;
use persona_affect_matrix::modules::chat::Role;
use persona_affect_matrix::{
    derive_color, AiReply, Background, ChatSession, Console, Emotion, EngineConfig, FileBlobStore, LogLevel,
    MemoryBlobStore, SessionError,
};
use serde_json::json;
use std::time::Duration;

fn session() -> ChatSession<MemoryBlobStore> {
    ChatSession::open(EngineConfig::default(), MemoryBlobStore::new())
}

fn reply(shifts: serde_json::Value) -> AiReply {
    serde_json::from_value(TestShiftData::ai_reply(shifts)).unwrap()
}

#[test]
fn test_full_turn_updates_state_and_transcript() {
    let mut session = session();
    session.record_user_message("I got the job!").unwrap();

    let report = session
        .apply_ai_reply(reply(json!([
            {"emotion": "happiness", "value": 80},
            {"emotion": "made_up", "value": 90},
            {"emotion": "Sadness", "value": "100"}
        ])))
        .unwrap();

    assert_eq!(report.applied.len(), 2);
    assert!(!report.skipped_frozen);

    let conversation = session.active_conversation().unwrap();
    let roles: Vec<Role> = conversation.messages.iter().map(|message| message.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Thought, Role::Assistant]);

    // happiness 60 -> 80 at 0.5, sadness 0 -> 100 at 0.25
    assert_eq!(session.emotion("happiness").unwrap(), 70);
    assert_eq!(session.emotion("sadness").unwrap(), 25);
    assert_eq!(conversation.history.len(), 1);
    assert_eq!(conversation.mind_state.intent, "sharing news");
    assert_eq!(session.state().identity.total_messages, 2);
}

#[test]
fn test_failed_call_falls_back_to_confusion() {
    let mut session = session();
    let report = session
        .apply_ai_reply(AiReply::Failed { error: "timeout".to_string() })
        .unwrap();

    assert_eq!(report.provider_error.as_deref(), Some("timeout"));
    assert_eq!(session.emotion("confusion").unwrap(), 15);

    let last = session.active_conversation().unwrap().messages.last().unwrap().clone();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.content, FALLBACK_RESPONSE);
}

#[test]
fn test_missing_shift_leaves_state_untouched() {
    let mut session = session();
    let before = session.active_conversation().unwrap().emotional_state.clone();

    let report = session.apply_ai_reply(reply(json!(null))).unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(session.active_conversation().unwrap().emotional_state, before);
    assert!(session.active_conversation().unwrap().history.is_empty());
}

#[test]
fn test_frozen_conversation_ignores_shifts() {
    let mut session = session();
    session.set_frozen(true).unwrap();

    let report = session
        .apply_ai_reply(reply(json!([{"emotion": "anger", "value": 100}])))
        .unwrap();
    assert!(report.skipped_frozen);
    assert_eq!(session.emotion("anger").unwrap(), 0);

    // manual edits still apply
    session.set_emotion("anger", 30).unwrap();
    assert_eq!(session.emotion("anger").unwrap(), 30);
}

#[test]
fn test_conversations_are_isolated() {
    let mut session = session();
    let first = session.state().active_chat_id.clone().unwrap();
    session.set_emotion("joy", 90).unwrap();

    let second = session.new_conversation(Some("  "));
    assert_eq!(session.active_conversation().unwrap().name, "New Chat");
    assert_ne!(session.emotion("joy").unwrap(), 90);

    session.switch_conversation(&first).unwrap();
    assert_eq!(session.emotion("joy").unwrap(), 90);

    session.switch_conversation(&second).unwrap();
    assert!(matches!(
        session.switch_conversation("nope"),
        Err(SessionError::ConversationNotFound(_))
    ));
    assert_eq!(session.state().active_chat_id.as_deref(), Some(second.as_str()));
}

#[test]
fn test_session_reopens_from_saved_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = || FileBlobStore::new(dir.path());

    let mut session = ChatSession::open(EngineConfig::default(), store());
    session.set_custom_instruction("Be brief.");
    session.set_emotion("gratitude", 77).unwrap();
    session.mark_coherence_check().unwrap();
    let exported = session.export().unwrap();
    drop(session);

    let reopened = ChatSession::open(EngineConfig::default(), store());
    assert_eq!(reopened.emotion("gratitude").unwrap(), 77);
    assert_eq!(reopened.prompt_context().unwrap().custom_instruction, "Be brief.");
    assert!(reopened.active_conversation().unwrap().last_coherence_check.is_some());

    let mut fresh = session_with_import(&exported);
    assert_eq!(fresh.emotion("gratitude").unwrap(), 77);
    assert!(fresh.import("{\"broken\": true}").is_err());
    assert_eq!(fresh.emotion("gratitude").unwrap(), 77);
}

fn session_with_import(json: &str) -> ChatSession<MemoryBlobStore> {
    let mut session = session();
    session.import(json).unwrap();
    session
}

#[test]
fn test_background_follows_state() {
    let mut session = session();
    session.clear_all().unwrap();
    assert!(matches!(session.background().unwrap(), Background::Linear { .. }));

    session.set_emotion("love", 90).unwrap();
    assert!(matches!(session.background().unwrap(), Background::Radial { .. }));
    assert!(session.color("anything_else").is_err());
    assert_eq!(session.color("love").unwrap(), derive_color(Emotion::from_name("love").unwrap(), 90));
}

#[test]
fn test_terminal_commands_drive_session() {
    let mut session = session();
    let mut console = Console::new();

    console.execute("zero", &mut session);
    console.execute("max Negative - Fear", &mut session);
    assert_eq!(session.emotion("terror").unwrap(), 100);

    console.execute("adjust -40 negative - fear", &mut session);
    assert_eq!(session.emotion("terror").unwrap(), 60);

    console.execute("reset", &mut session);
    assert_eq!(session.emotion("honesty").unwrap(), 90);

    let entries = console.execute("freeze on", &mut session);
    assert_eq!(entries[1].level, LogLevel::Info);
    assert!(session.active_conversation().unwrap().frozen);

    let entries = console.execute("groups", &mut session);
    assert_eq!(entries.len(), 11);

    let entries = console.execute("help set", &mut session);
    assert!(entries[1].text.starts_with("set <emotion> <0-100>"));
}

#[tokio::test(start_paused = true)]
async fn test_crazy_mode_randomizes_until_stopped() {
    let mut config = EngineConfig::default();
    config.crazy_mode.interval_ms = 100;
    let mut session = ChatSession::open(config, MemoryBlobStore::new());

    assert!(session.start_crazy_mode());
    assert!(!session.start_crazy_mode());
    assert!(session.crazy_mode_running());

    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(session.pump_crazy_mode().unwrap(), 3);

    assert!(session.stop_crazy_mode());
    assert!(!session.crazy_mode_running());
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(session.pump_crazy_mode().unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_crazy_mode_skips_frozen_conversation() {
    let mut config = EngineConfig::default();
    config.crazy_mode.interval_ms = 50;
    let mut session = ChatSession::open(config, MemoryBlobStore::new());
    session.set_frozen(true).unwrap();
    let before = session.active_conversation().unwrap().emotional_state.clone();

    let mut console = Console::new();
    let entries = console.execute("crazy on", &mut session);
    assert_eq!(entries[1].level, LogLevel::Info);

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(session.pump_crazy_mode().unwrap(), 0);
    assert_eq!(session.active_conversation().unwrap().emotional_state, before);

    console.execute("crazy off", &mut session);
    assert!(!session.crazy_mode_running());
}

#[tokio::test(start_paused = true)]
async fn test_crazy_mode_updates_stay_with_their_conversation() {
    let mut config = EngineConfig::default();
    config.crazy_mode.interval_ms = 100;
    let mut session = ChatSession::open(config, MemoryBlobStore::new());
    let first = session.state().active_chat_id.clone().unwrap();
    let second = session.new_conversation(Some("Calm"));
    let untouched = session.active_conversation().unwrap().emotional_state.clone();

    session.switch_conversation(&first).unwrap();
    assert!(session.start_crazy_mode());
    tokio::time::sleep(Duration::from_millis(250)).await;

    session.switch_conversation(&second).unwrap();
    assert_eq!(session.pump_crazy_mode().unwrap(), 0);
    assert_eq!(session.active_conversation().unwrap().emotional_state, untouched);

    assert!(session.stop_crazy_mode());
}
