use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a whole number")]
    InvalidNumber(String),

    #[error("Unknown config flag '{0}' (expected log_thinking, interactive_thought or force_fidelity)")]
    UnknownFlag(String),

    #[error("Expected 'on' or 'off', got '{0}'")]
    InvalidToggle(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFlag {
    LogThinking,
    InteractiveThought,
    ForceFidelity,
}

impl ConfigFlag {
    pub fn name(self) -> &'static str {
        match self {
            ConfigFlag::LogThinking => "log_thinking",
            ConfigFlag::InteractiveThought => "interactive_thought",
            ConfigFlag::ForceFidelity => "force_fidelity",
        }
    }

    fn parse(raw: &str) -> Result<Self, CommandError> {
        match raw.to_lowercase().as_str() {
            "log_thinking" => Ok(ConfigFlag::LogThinking),
            "interactive_thought" => Ok(ConfigFlag::InteractiveThought),
            "force_fidelity" => Ok(ConfigFlag::ForceFidelity),
            _ => Err(CommandError::UnknownFlag(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { emotion: String, value: i64 },
    Get { emotion: String },
    ListEmotions,
    MapEmotions,
    Groups,
    Config { flag: ConfigFlag, enabled: bool },
    Adjust { delta: i32, group: String },
    Max { group: String },
    Reset,
    Zero,
    Freeze(bool),
    Crazy(bool),
    Clear,
    Help { topic: Option<String> },
}

pub struct HelpTopic {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub const HELP_TOPICS: &[HelpTopic] = &[
    HelpTopic { name: "set", usage: "set <emotion> <0-100>", summary: "Set one emotion to an exact intensity" },
    HelpTopic { name: "get", usage: "get <emotion>", summary: "Show the intensity of one emotion" },
    HelpTopic { name: "list", usage: "list emotions", summary: "List every known emotion" },
    HelpTopic { name: "map", usage: "map emotions", summary: "Bar chart of the ten strongest emotions" },
    HelpTopic { name: "groups", usage: "groups", summary: "List emotion groups" },
    HelpTopic {
        name: "config",
        usage: "config <log_thinking|interactive_thought|force_fidelity> <on|off>",
        summary: "Toggle a session setting",
    },
    HelpTopic { name: "adjust", usage: "adjust <delta> <group name>", summary: "Add delta to every emotion in a group" },
    HelpTopic { name: "max", usage: "max <group name>", summary: "Set every emotion in a group to 100" },
    HelpTopic { name: "reset", usage: "reset", summary: "Restore the default personality" },
    HelpTopic { name: "zero", usage: "zero", summary: "Set every emotion to 0" },
    HelpTopic { name: "freeze", usage: "freeze <on|off>", summary: "Stop or resume automatic emotional updates" },
    HelpTopic { name: "crazy", usage: "crazy <on|off>", summary: "Randomize all emotions on an interval" },
    HelpTopic { name: "clear", usage: "clear", summary: "Clear the terminal" },
    HelpTopic { name: "help", usage: "help [topic]", summary: "Show help" },
];

fn usage(name: &str) -> &'static str {
    HELP_TOPICS
        .iter()
        .find(|topic| topic.name == name)
        .map(|topic| topic.usage)
        .unwrap_or("help")
}

fn parse_toggle(raw: &str) -> Result<bool, CommandError> {
    match raw.to_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(CommandError::InvalidToggle(raw.to_string())),
    }
}

fn parse_whole<T: std::str::FromStr>(raw: &str) -> Result<T, CommandError> {
    raw.trim_start_matches('+')
        .parse()
        .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((head, args)) = words.split_first() else {
            return Err(CommandError::Empty);
        };

        let name = head.to_lowercase();
        match (name.as_str(), args) {
            ("set", [emotion, value]) => Ok(Command::Set {
                emotion: emotion.to_string(),
                value: parse_whole(value)?,
            }),
            ("get", [emotion]) => Ok(Command::Get { emotion: emotion.to_string() }),
            ("list", [target]) if target.eq_ignore_ascii_case("emotions") => Ok(Command::ListEmotions),
            ("map", [target]) if target.eq_ignore_ascii_case("emotions") => Ok(Command::MapEmotions),
            ("groups", []) => Ok(Command::Groups),
            ("config", [flag, toggle]) => Ok(Command::Config {
                flag: ConfigFlag::parse(flag)?,
                enabled: parse_toggle(toggle)?,
            }),
            ("adjust", [delta, group @ ..]) if !group.is_empty() => Ok(Command::Adjust {
                delta: parse_whole(delta)?,
                group: group.join(" "),
            }),
            ("max", group) if !group.is_empty() => Ok(Command::Max { group: group.join(" ") }),
            ("reset", []) => Ok(Command::Reset),
            ("zero", []) => Ok(Command::Zero),
            ("freeze", [toggle]) => Ok(Command::Freeze(parse_toggle(toggle)?)),
            ("crazy", [toggle]) => Ok(Command::Crazy(parse_toggle(toggle)?)),
            ("clear", []) => Ok(Command::Clear),
            ("help", []) => Ok(Command::Help { topic: None }),
            ("help", [topic]) => Ok(Command::Help { topic: Some(topic.to_lowercase()) }),
            (known, _) if HELP_TOPICS.iter().any(|topic| topic.name == known) => Err(CommandError::Usage(usage(known))),
            _ => Err(CommandError::Unknown(head.to_string())),
        }
    }
}
