use std::path::PathBuf;

use thiserror::Error;

/// Fatal adapter failures. Everything recoverable is a
/// [`ParseWarning`](crate::ParseWarning) instead.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while reading line {line}: {source}")]
    ReadLine {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

impl AdapterError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn read_line(line: usize, source: std::io::Error) -> Self {
        Self::ReadLine { line, source }
    }
}
