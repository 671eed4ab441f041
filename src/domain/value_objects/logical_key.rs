//! Logical Image Key Value Object
//!
//! The stable name a workflow template uses to refer to a container image.
//! Keys produced by the pipeline are the original image reference string;
//! hand-written documents may use any other non-empty name (e.g. `gatk_docker`).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ImageReference;

/// Top-level field of a registry document that carries the workflow name
/// rather than an image mapping.
pub const RESERVED_NAME_FIELD: &str = "name";

const NAME_SUFFIXES: [&str; 3] = ["_docker", "_virtual_env", "_env"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogicalImageKey(String);

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("logical image key must not be empty")]
    Empty,

    #[error("'{0}' is reserved for the workflow name and cannot be an image key")]
    Reserved(String),
}

impl LogicalImageKey {
    pub fn new(raw: impl Into<String>) -> Result<Self, KeyError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(KeyError::Empty);
        }
        if raw == RESERVED_NAME_FIELD {
            return Err(KeyError::Reserved(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name used to match a key against catalog targets: one well-known
    /// suffix is dropped and underscores become dashes
    /// (`bwa_mem_docker` → `bwa-mem`).
    pub fn normalized_name(&self) -> String {
        let mut name = self.0.as_str();
        for suffix in NAME_SUFFIXES {
            if let Some(stripped) = name.strip_suffix(suffix) {
                name = stripped;
                break;
            }
        }
        name.replace('_', "-")
    }
}

impl From<&ImageReference> for LogicalImageKey {
    fn from(reference: &ImageReference) -> Self {
        // A parsed reference is never empty and always contains ':'.
        Self(reference.to_string())
    }
}

impl TryFrom<String> for LogicalImageKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LogicalImageKey> for String {
    fn from(key: LogicalImageKey) -> Self {
        key.0
    }
}

impl fmt::Display for LogicalImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
