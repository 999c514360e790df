//! Error types for editor sessions.

use thiserror::Error;

/// Errors raised by the key-value store backing persisted overrides.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but does not hold a string map.
    #[error("Corrupt override store: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors that can occur while driving a file session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A session needs at least one file to show.
    #[error("Cannot start an editor session without files")]
    EmptyFileList,

    /// No file record carries the requested name.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The file list has no entry element for a file.
    #[error("File list entry not found: {0}")]
    ListEntryNotFound(String),

    /// The active buffer does not accept edits.
    #[error("File is read-only: {0}")]
    ReadOnly(String),

    /// Reading an override failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
