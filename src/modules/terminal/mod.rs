pub mod command;
pub mod console;

pub use command::{Command, CommandError, ConfigFlag, HELP_TOPICS};
pub use console::{Console, LogEntry, LogLevel, TerminalFlags};
