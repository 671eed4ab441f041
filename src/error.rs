//! Error types for Sifter
//!
//! Uses `thiserror` for library errors. Every fatal error maps onto one of
//! the documented process exit codes; item failures never surface here, they
//! are collected in the stage results instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::ports::{ManifestError, RegistryError};
use crate::domain::services::PlanError;
use crate::domain::value_objects::VersionError;

/// Process exit codes.
pub mod exit_code {
    /// Every item succeeded or was skipped.
    pub const SUCCESS: i32 = 0;
    /// Bad arguments, input or environment. Nothing was changed.
    pub const USAGE: i32 = 1;
    /// At least one item failed; the others were applied.
    pub const PARTIAL_FAILURE: i32 = 2;
    /// A persisted document is unreadable or changed underneath us. Nothing was written.
    pub const INTEGRITY: i32 = 3;
}

/// Result type alias for Sifter operations
pub type SifterResult<T> = Result<T, SifterError>;

/// Main error type for Sifter operations
#[derive(Error, Debug)]
pub enum SifterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Version(#[from] VersionError),

    /// Input file or directory the command needs is absent
    #[error("{what} not found: {}", .path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    /// External tool needed for the remaining work is not installed
    #[error("'{program}' is not available; install it or set {setting}")]
    ToolUnavailable {
        program: String,
        setting: &'static str,
    },

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SifterError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SifterError::Registry(_) | SifterError::Manifest(_) => exit_code::INTEGRITY,
            SifterError::Config(_)
            | SifterError::Plan(_)
            | SifterError::Version(_)
            | SifterError::MissingInput { .. }
            | SifterError::ToolUnavailable { .. }
            | SifterError::Usage(_)
            | SifterError::Io(_) => exit_code::USAGE,
        }
    }
}
