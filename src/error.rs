//! Error types for source resolution and engine invocation.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while resolving a source or running the engine.
#[derive(Debug, Error)]
pub enum YomuError {
    /// The input is not something a document can be read from.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// The input looks like a path but no readable file exists there.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The engine executable could not be started.
    #[error("Failed to launch {}: {source}", program.display())]
    EngineLaunch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The engine started but exited unsuccessfully.
    #[error("{} failed (exit code {code:?}): {stderr}", program.display())]
    EngineExecution {
        program: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// The engine did not finish within the configured limit.
    #[error("{} timed out after {after:?}", program.display())]
    Timeout { program: PathBuf, after: Duration },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl YomuError {
    /// True for the "no such file" condition, including a missing engine executable.
    pub fn is_not_found(&self) -> bool {
        match self {
            YomuError::FileNotFound { .. } => true,
            YomuError::EngineLaunch { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, YomuError>;
