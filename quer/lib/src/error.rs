//! Error types for the quer library.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::RunMode;

/// Errors that abort a queue session.
///
/// The first four variants are precondition failures: they are raised before
/// any input is read and leave nothing behind.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Record and playback sessions need a script to write to or read from.
    #[error("{mode} mode needs a quer script name")]
    MissingScript {
        /// The mode that was requested.
        mode: RunMode,
    },

    /// The script to record already exists.
    #[error("quer script '{name}' already exists")]
    AlreadyExists {
        /// The requested script name.
        name: String,
    },

    /// The script to play does not exist.
    #[error("quer script '{name}' does not exist")]
    DoesNotExist {
        /// The requested script name.
        name: String,
    },

    /// The script exists but could not be opened for playback.
    #[error("could not read quer script '{name}': {source}")]
    CouldNotRead {
        /// The requested script name.
        name: String,
        /// The underlying store failure.
        source: StoreError,
    },

    /// Reading the next input line failed mid-session.
    #[error("failed to read input: {0}")]
    Read(std::io::Error),

    /// The recorded queue could not be written to its script.
    #[error("failed to write quer script '{name}': {source}")]
    Write {
        /// The script being recorded.
        name: String,
        /// The underlying store failure.
        source: StoreError,
    },

    /// Writing the session transcript failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Reasons an `undo` directive leaves the queue untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndoError {
    /// There is nothing queued yet.
    #[error("the queue is empty")]
    Empty,

    /// The requested position is outside `1..=len`.
    #[error("position {position} is outside 1..={len}")]
    OutOfRange {
        /// The 1-based position that was requested.
        position: i64,
        /// The queue length at the time of the request.
        len: usize,
    },

    /// The argument is neither a number nor `all`.
    #[error("'{0}' is not a position or 'all'")]
    InvalidArgument(String),
}

/// Errors that can occur when working with script storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// No script exists at the resolved path.
    #[error("no script at {}", path.display())]
    NotFound {
        /// The resolved script path.
        path: PathBuf,
    },

    /// The resolved path exists but is not a regular file.
    #[error("{} is not a file", path.display())]
    NotAFile {
        /// The resolved script path.
        path: PathBuf,
    },

    /// An in-memory store lock was poisoned.
    #[error("failed to acquire store lock")]
    Lock,
}

/// Errors raised while handing a command to the shell.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The shell process could not be started.
    #[error("failed to start shell for '{command}': {source}")]
    Spawn {
        /// The command that was being run.
        command: String,
        /// The spawn failure.
        source: std::io::Error,
    },
}
