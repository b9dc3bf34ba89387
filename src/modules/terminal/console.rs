use serde::Serialize;

use super::command::{Command, ConfigFlag, HELP_TOPICS};
use crate::modules::chat::{BlobStore, ChatSession, SessionError};
use crate::modules::emotion::{EmotionGroup, CATALOG};

pub const MAP_LIMIT: usize = 10;
pub const MAP_BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Input,
    Output,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub text: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalFlags {
    pub log_thinking: bool,
    pub interactive_thought: bool,
    pub force_fidelity: bool,
}

impl Default for TerminalFlags {
    fn default() -> Self {
        Self {
            log_thinking: true,
            interactive_thought: false,
            force_fidelity: false,
        }
    }
}

impl TerminalFlags {
    fn set(&mut self, flag: ConfigFlag, enabled: bool) {
        match flag {
            ConfigFlag::LogThinking => self.log_thinking = enabled,
            ConfigFlag::InteractiveThought => self.interactive_thought = enabled,
            ConfigFlag::ForceFidelity => self.force_fidelity = enabled,
        }
    }
}

/// The terminal command surface. Every failure ends up as an `Error` log entry.
#[derive(Debug, Default)]
pub struct Console {
    log: Vec<LogEntry>,
    flags: TerminalFlags,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn flags(&self) -> &TerminalFlags {
        &self.flags
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }

    /// Runs one command line and returns the entries it produced.
    pub fn execute<S: BlobStore>(&mut self, line: &str, session: &mut ChatSession<S>) -> Vec<LogEntry> {
        let mut entries = vec![LogEntry::new(LogLevel::Input, format!("> {}", line.trim()))];

        match Command::parse(line) {
            Ok(Command::Clear) => {
                self.log.clear();
                return Vec::new();
            }
            Ok(command) => match self.run(command, session) {
                Ok(output) => entries.extend(output),
                Err(e) => entries.push(LogEntry::new(LogLevel::Error, e.to_string())),
            },
            Err(e) => {
                log::debug!("Rejected terminal input '{}': {}", line, e);
                entries.push(LogEntry::new(LogLevel::Error, e.to_string()));
            }
        }

        self.log.extend(entries.iter().cloned());
        entries
    }

    fn run<S: BlobStore>(&mut self, command: Command, session: &mut ChatSession<S>) -> Result<Vec<LogEntry>, SessionError> {
        let output = |text: String| vec![LogEntry::new(LogLevel::Output, text)];
        let info = |text: String| vec![LogEntry::new(LogLevel::Info, text)];

        Ok(match command {
            Command::Set { emotion, value } => {
                let value = session.set_emotion(&emotion, value)?;
                info(format!("{} set to {}", emotion.to_lowercase(), value))
            }
            Command::Get { emotion } => {
                let value = session.emotion(&emotion)?;
                output(format!("{}: {}", emotion.to_lowercase(), value))
            }
            Command::ListEmotions => {
                let names: Vec<&str> = CATALOG.iter().map(|spec| spec.name).collect();
                output(format!("{} emotions: {}", names.len(), names.join(", ")))
            }
            Command::MapEmotions => render_map(session)?,
            Command::Groups => EmotionGroup::ALL
                .into_iter()
                .map(|group| LogEntry::new(LogLevel::Output, format!("{}: {}", group, group.member_names().join(", "))))
                .collect(),
            Command::Config { flag, enabled } => {
                self.flags.set(flag, enabled);
                info(format!("{} = {}", flag.name(), if enabled { "on" } else { "off" }))
            }
            Command::Adjust { delta, group } => {
                session.adjust_group(&group, delta)?;
                info(format!("Adjusted {} by {:+}", group, delta))
            }
            Command::Max { group } => {
                session.max_group(&group)?;
                info(format!("Maxed {}", group))
            }
            Command::Reset => {
                session.reset_to_default()?;
                info("Restored default personality".to_string())
            }
            Command::Zero => {
                session.clear_all()?;
                info("All emotions set to 0".to_string())
            }
            Command::Freeze(frozen) => {
                session.set_frozen(frozen)?;
                let text = if frozen { "Emotional state frozen" } else { "Emotional state unfrozen" };
                info(text.to_string())
            }
            Command::Crazy(true) => {
                if tokio::runtime::Handle::try_current().is_err() {
                    vec![LogEntry::new(LogLevel::Error, "Crazy mode needs a running async runtime")]
                } else if session.start_crazy_mode() {
                    info("Crazy mode on".to_string())
                } else {
                    info("Crazy mode is already running".to_string())
                }
            }
            Command::Crazy(false) => {
                if session.stop_crazy_mode() {
                    info("Crazy mode off".to_string())
                } else {
                    info("Crazy mode was not running".to_string())
                }
            }
            Command::Clear => Vec::new(),
            Command::Help { topic: None } => HELP_TOPICS
                .iter()
                .map(|topic| LogEntry::new(LogLevel::Output, format!("{:<70} {}", topic.usage, topic.summary)))
                .collect(),
            Command::Help { topic: Some(topic) } => match HELP_TOPICS.iter().find(|entry| entry.name == topic) {
                Some(entry) => output(format!("{}\n  {}", entry.usage, entry.summary)),
                None => vec![LogEntry::new(LogLevel::Error, format!("No help for '{}'", topic))],
            },
        })
    }
}

fn render_map<S: BlobStore>(session: &ChatSession<S>) -> Result<Vec<LogEntry>, SessionError> {
    let ranked = session.active_conversation()?.emotional_state.ranked();
    if ranked.is_empty() {
        return Ok(vec![LogEntry::new(LogLevel::Output, "All emotions are at 0")]);
    }

    Ok(ranked
        .into_iter()
        .take(MAP_LIMIT)
        .map(|(emotion, value)| {
            let filled = ((value as f64 / 100.0) * MAP_BAR_WIDTH as f64).round() as usize;
            let bar = format!("{}{}", "█".repeat(filled), "░".repeat(MAP_BAR_WIDTH - filled));
            LogEntry::new(LogLevel::Output, format!("{:<20} {} {:>3}", emotion.name(), bar, value))
        })
        .collect())
}
