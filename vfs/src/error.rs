use std::io;

use thiserror::Error;

/// Failure to reach or change a project file.
#[derive(Debug, Error)]
pub enum VfsError {
    #[error("no such file: {0}")]
    NotFound(String),

    #[error("I/O failure: {0}")]
    Io(#[source] io::Error),

    #[error("bad path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// First path segment names no mount and there is no default mount.
    #[error("nothing mounted as '{0}'")]
    NoSuchSource(String),

    #[error("mount is read-only")]
    ReadOnly,
}

impl From<io::Error> for VfsError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => VfsError::NotFound(err.to_string()),
            _ => VfsError::Io(err),
        }
    }
}
