//! ManifestRepository port
//!
//! Persists the archive manifest next to the archives it describes.

use std::path::{Path, PathBuf};

use crate::domain::entities::ArchiveManifest;

/// File name of the manifest inside an export directory.
pub const MANIFEST_FILE: &str = "manifest.json";

pub trait ManifestRepository: Send + Sync {
    /// Load the manifest of `dir`. A missing manifest is an empty one.
    fn load(&self, dir: &Path) -> Result<ArchiveManifest, ManifestError>;

    /// Atomically replace the manifest of `dir`.
    fn save(&self, dir: &Path, manifest: &ArchiveManifest) -> Result<(), ManifestError>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("Failed to access archive manifest: {message}")]
    AccessError { message: String },

    #[error("archive manifest corrupted: {path}: {message}")]
    Corrupted { path: PathBuf, message: String },

    #[error("unsupported archive manifest version {found} in {path}")]
    UnsupportedVersion { path: PathBuf, found: u32 },
}
