#![forbid(unsafe_code)]

use std::path::PathBuf;

use tracing::Level;

const DEFAULT_EDITOR: &str = "vi";
const DEFAULT_LOG_PATH: &str = "/tmp/ferrofm.log";

/// Runtime settings, read from the environment once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub editor: EditorCommand,
    /// File logging; `None` leaves logging off.
    pub log: Option<LogConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub path: PathBuf,
    pub level: Level,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let editor = var("EDITOR")
            .and_then(|value| EditorCommand::parse(&value))
            .unwrap_or_else(|| EditorCommand {
                program: DEFAULT_EDITOR.to_string(),
                args: Vec::new(),
            });
        let log = var("FERROFM_LOG").map(|value| {
            let path = if value.trim().is_empty() {
                PathBuf::from(DEFAULT_LOG_PATH)
            } else {
                PathBuf::from(value)
            };
            let level = var("FERROFM_LOG_LEVEL")
                .and_then(|level| level.trim().parse().ok())
                .unwrap_or(Level::DEBUG);
            LogConfig { path, level }
        });
        Self { editor, log }
    }
}

impl EditorCommand {
    /// Splits `EDITOR` on whitespace, so `code --wait` works.
    fn parse(value: &str) -> Option<Self> {
        let mut words = value.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }
}
