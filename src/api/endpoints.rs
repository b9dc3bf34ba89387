use std::os::raw::c_char;

use crate::api::{
    services::{
        session_service::{open_host_session, with_host_session},
        validation_service::*,
    },
    types::ApiResult,
};
use crate::modules::chat::AiReply;
use crate::modules::terminal::{LogEntry, LogLevel};

#[no_mangle]
pub extern "C" fn initialize_session(config_toml: *const c_char, storage_dir: *const c_char) -> *mut ApiResult {
    let storage_dir = match parse_c_string(storage_dir, "Storage directory") {
        Ok(s) => s,
        Err(result) => return result,
    };
    let config_toml = parse_optional_c_string(config_toml);

    match open_host_session(config_toml.as_deref(), &storage_dir) {
        Ok(()) => ApiResult::success("Session initialized successfully".to_string()).into_raw(),
        Err(result) => result,
    }
}

#[no_mangle]
pub extern "C" fn create_conversation(name: *const c_char) -> *mut ApiResult {
    let name = parse_optional_c_string(name);

    with_host_session(|session| {
        let id = session.chat.new_conversation(name.as_deref());
        ApiResult::json(&serde_json::json!({ "conversation_id": id }))
    })
}

#[no_mangle]
pub extern "C" fn switch_conversation(conversation_id: *const c_char) -> *mut ApiResult {
    let id = match parse_c_string(conversation_id, "Conversation ID string") {
        Ok(s) => s,
        Err(result) => return result,
    };

    with_host_session(|session| ApiResult::from_result(session.chat.switch_conversation(&id)))
}

#[no_mangle]
pub extern "C" fn record_user_message(text: *const c_char) -> *mut ApiResult {
    let text = match parse_c_string(text, "Message text") {
        Ok(s) => s,
        Err(result) => return result,
    };

    with_host_session(|session| ApiResult::from_result(session.chat.record_user_message(&text)))
}

#[no_mangle]
pub extern "C" fn get_prompt_context() -> *mut ApiResult {
    with_host_session(|session| ApiResult::from_result(session.chat.prompt_context()))
}

#[no_mangle]
pub extern "C" fn submit_ai_reply(reply_json: *const c_char) -> *mut ApiResult {
    let reply: AiReply = match parse_json_arg(reply_json, "AI reply") {
        Ok(reply) => reply,
        Err(result) => return result,
    };

    with_host_session(|session| {
        let result = session.chat.apply_ai_reply(reply);
        if let Ok(report) = &result {
            if let Some(error) = &report.provider_error {
                session
                    .console
                    .push(LogEntry::new(LogLevel::Error, format!("AI provider error: {}", error)));
            }
        }
        ApiResult::from_result(result)
    })
}

#[no_mangle]
pub extern "C" fn run_terminal_command(line: *const c_char) -> *mut ApiResult {
    let line = match parse_c_string(line, "Command line") {
        Ok(s) => s,
        Err(result) => return result,
    };

    with_host_session(|session| {
        let entries = session.console.execute(&line, &mut session.chat);
        ApiResult::json(&entries)
    })
}

#[no_mangle]
pub extern "C" fn get_emotional_state() -> *mut ApiResult {
    with_host_session(|session| {
        ApiResult::from_result(
            session
                .chat
                .active_conversation()
                .map(|conversation| &conversation.emotional_state),
        )
    })
}

#[no_mangle]
pub extern "C" fn get_background() -> *mut ApiResult {
    with_host_session(|session| {
        ApiResult::from_result(session.chat.background().map(|background| {
            serde_json::json!({
                "background": background,
                "css": background.to_css(),
            })
        }))
    })
}

#[no_mangle]
pub extern "C" fn export_state() -> *mut ApiResult {
    with_host_session(|session| match session.chat.export() {
        Ok(json) => ApiResult::success(json),
        Err(e) => ApiResult::error(format!("Failed to export state: {}", e)),
    })
}

#[no_mangle]
pub extern "C" fn import_state(state_json: *const c_char) -> *mut ApiResult {
    let json = match parse_c_string(state_json, "State JSON") {
        Ok(s) => s,
        Err(result) => return result,
    };

    with_host_session(|session| match session.chat.import(&json) {
        Ok(()) => ApiResult::success("State imported successfully".to_string()),
        Err(e) => ApiResult::error(format!("Failed to import state: {}", e)),
    })
}

#[no_mangle]
pub extern "C" fn free_api_result(result: *mut ApiResult) {
    if result.is_null() {
        return;
    }

    unsafe {
        let result = Box::from_raw(result);
        if !result.data.is_null() {
            let _ = std::ffi::CString::from_raw(result.data);
        }
        if !result.error.is_null() {
            let _ = std::ffi::CString::from_raw(result.error);
        }
    }
}
