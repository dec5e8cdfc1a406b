//! Error types for zipdist
//!
//! Provides error handling for coordinate loading and distance persistence.

use std::fmt;

/// Main error type for zipdist operations
#[derive(Debug)]
pub enum Error {
    /// An input row could not be parsed into a location record
    MalformedRecord(String),

    /// Store failure unrelated to key uniqueness (connection loss,
    /// schema trouble, non-finite values)
    StorageError(String),

    /// File I/O error
    IoError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedRecord(msg) => {
                write!(f, "Malformed record: {msg}")
            }
            Error::StorageError(msg) => {
                write!(f, "Storage error: {msg}")
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {err}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        let msg = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io_err) => Error::IoError(io_err),
            _ => Error::MalformedRecord(msg),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::StorageError(err.to_string())
    }
}

/// Convenience result type for zipdist operations
pub type Result<T> = std::result::Result<T, Error>;
