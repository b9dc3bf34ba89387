use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::api::types::ApiResult;
use crate::config::EngineConfig;
use crate::modules::chat::{ChatSession, FileBlobStore};
use crate::modules::terminal::Console;

/// The single host-facing session: one persisted app state plus its terminal.
pub struct HostSession {
    pub chat: ChatSession<FileBlobStore>,
    pub console: Console,
}

pub static HOST_SESSION: OnceLock<Mutex<Option<HostSession>>> = OnceLock::new();

fn session_slot() -> Result<MutexGuard<'static, Option<HostSession>>, *mut ApiResult> {
    HOST_SESSION
        .get_or_init(|| Mutex::new(None))
        .lock()
        .map_err(|_| ApiResult::error("Failed to acquire session lock - mutex poisoned".to_string()).into_raw())
}

pub fn open_host_session(config_toml: Option<&str>, storage_dir: &str) -> Result<(), *mut ApiResult> {
    let config = match config_toml.filter(|source| !source.trim().is_empty()) {
        Some(source) => EngineConfig::from_toml_str(source)
            .map_err(|e| ApiResult::error(format!("Failed to load config: {}", e)).into_raw())?,
        None => EngineConfig::default(),
    };

    let chat = ChatSession::open(config, FileBlobStore::new(storage_dir));
    let mut slot = session_slot()?;
    *slot = Some(HostSession {
        chat,
        console: Console::new(),
    });

    log::info!("Host session opened on {}", storage_dir);
    Ok(())
}

pub fn with_host_session<F>(f: F) -> *mut ApiResult
where
    F: FnOnce(&mut HostSession) -> ApiResult,
{
    let mut slot = match session_slot() {
        Ok(slot) => slot,
        Err(result) => return result,
    };

    match slot.as_mut() {
        Some(session) => f(session).into_raw(),
        None => ApiResult::error("Session not initialized. Call initialize_session first.".to_string()).into_raw(),
    }
}
