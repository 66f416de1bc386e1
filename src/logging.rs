#![forbid(unsafe_code)]

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use crate::config::LogConfig;

/// Installs a file-backed tracing subscriber. The terminal belongs to the
/// UI, so without a log file nothing is installed and events are dropped.
pub fn init(config: Option<&LogConfig>) -> io::Result<()> {
    let Some(config) = config else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_max_level(config.level)
        .try_init()
        .map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing::Level;

    #[test]
    fn disabled_logging_is_a_no_op() {
        assert!(init(None).is_ok());
    }

    #[test]
    fn unwritable_log_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        let config = LogConfig {
            path: temp.path().join("missing/dir/fm.log"),
            level: Level::INFO,
        };
        assert!(init(Some(&config)).is_err());
    }
}
