//! RegistryRepository port
//!
//! Persists the registry document that maps logical image keys to locators.

use std::path::{Path, PathBuf};

use crate::domain::entities::{EntrySet, MergeReport, RegistryDocument};

pub trait RegistryRepository: Send + Sync {
    /// Load the whole document. A missing document is an empty one.
    fn load(&self) -> Result<RegistryDocument, RegistryError>;

    /// Merge `batch` into the stored document and rewrite it atomically,
    /// holding an exclusive lock for the whole read-modify-write.
    ///
    /// `base` is the snapshot the batch was computed from. If any key of the
    /// batch changed in storage since then, nothing is written.
    fn merge(&self, base: &RegistryDocument, batch: &EntrySet)
        -> Result<MergeReport, RegistryError>;

    fn location(&self) -> &Path;
}

impl<T: RegistryRepository + ?Sized> RegistryRepository for &T {
    fn load(&self) -> Result<RegistryDocument, RegistryError> {
        (**self).load()
    }

    fn merge(
        &self,
        base: &RegistryDocument,
        batch: &EntrySet,
    ) -> Result<MergeReport, RegistryError> {
        (**self).merge(base, batch)
    }

    fn location(&self) -> &Path {
        (**self).location()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Failed to access registry: {message}")]
    AccessError { message: String },

    #[error("Failed to serialize registry: {message}")]
    SerializationError { message: String },

    #[error(
        "registry file corrupted: {path}\n  → Fix: restore it from version control or repair the JSON by hand\n  → Details: {message}"
    )]
    Corrupted { path: PathBuf, message: String },

    #[error(
        "registry {path} was modified concurrently for keys: {}\n  → Nothing was written; re-run the command",
        .keys.join(", ")
    )]
    ConcurrentModification { path: PathBuf, keys: Vec<String> },
}
