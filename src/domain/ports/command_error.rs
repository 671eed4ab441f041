//! Errors from the external tools the pipeline drives (build backend,
//! unprivileged runtime, git). Each one fails a single item, never a batch.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("failed to start '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("'{program}' timed out after {}s", .after.as_secs())]
    TimedOut { program: String, after: Duration },

    #[error("'{program}' exited with {code}: {stderr}")]
    Failed {
        program: String,
        code: String,
        stderr: String,
    },

    #[error("'{program}' left an empty file at {}", .path.display())]
    EmptyOutput { program: String, path: PathBuf },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("interrupted")]
    Cancelled,
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        CommandError::Io(e.to_string())
    }
}
