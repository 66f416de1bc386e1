#![forbid(unsafe_code)]

//! Errors raised by filesystem mutations and external device commands.
//!
//! None of these ever end the process: the navigator turns each one into a
//! status line message.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A filesystem call failed.
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The destination of a create or rename is already taken.
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
    /// A copy would overwrite its own source.
    #[error("{} is already here", .0.display())]
    SamePath(PathBuf),
    /// A directory would be copied or moved below itself.
    #[error("cannot put {} inside itself", .0.display())]
    IntoItself(PathBuf),
    /// An external program could not be started.
    #[error("cannot run {program}: {source}")]
    Command {
        program: String,
        #[source]
        source: io::Error,
    },
    /// An external program ran but reported failure.
    #[error("{program} exited with {status}")]
    CommandStatus { program: String, status: ExitStatus },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_message_names_operation_and_path() {
        let err = Error::io(
            "delete",
            Path::new("/tmp/gone"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        let message = err.to_string();
        assert!(message.starts_with("delete /tmp/gone: "), "{message}");
    }

    #[test]
    fn already_exists_message() {
        let err = Error::AlreadyExists(PathBuf::from("/tmp/a.txt"));
        assert_eq!(err.to_string(), "/tmp/a.txt already exists");
    }
}
