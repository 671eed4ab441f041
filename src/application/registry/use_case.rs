//! Registry Use Case
//!
//! Application-layer orchestration for working with the registry document
//! outside the pipeline stages.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::{MergeReport, RegistryDocument};
use crate::domain::ports::{RegistryError, RegistryRepository};
use crate::domain::value_objects::{LogicalImageKey, SIF_EXTENSION};
use crate::error::{exit_code, SifterError, SifterResult};
use crate::infrastructure::fs::non_empty_len;
use crate::infrastructure::repositories::parse_document;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A path locator that does not name a non-empty file.
    MissingImage { key: LogicalImageKey, locator: String },
    /// A required key absent from the document.
    MissingKey(LogicalImageKey),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingImage { key, locator } => {
                write!(f, "{}: image not found at {}", key.as_str(), locator)
            }
            Violation::MissingKey(key) => write!(f, "{}: required key is missing", key.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Entries whose locator was checked against the file system
    pub checked: usize,
    pub violations: Vec<Violation>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_ok() {
            exit_code::SUCCESS
        } else {
            exit_code::PARTIAL_FAILURE
        }
    }
}

pub struct RegistryUseCase {
    repository: Arc<dyn RegistryRepository>,
}

impl RegistryUseCase {
    pub fn new(repository: Arc<dyn RegistryRepository>) -> Self {
        Self { repository }
    }

    pub fn location(&self) -> &Path {
        self.repository.location()
    }

    pub fn list(&self) -> Result<RegistryDocument, RegistryError> {
        self.repository.load()
    }

    /// Merge a document produced elsewhere (an external puller, another
    /// host) into the registry. Its `name` is ignored.
    pub fn merge_file(&self, path: &Path) -> SifterResult<MergeReport> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SifterError::MissingInput {
                    what: "registry batch",
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let incoming = parse_document(&content, path)
            .map_err(|e| SifterError::Usage(format!("cannot merge {}: {e}", path.display())))?;

        let base = self.repository.load()?;
        let report = self.repository.merge(&base, incoming.entries())?;
        tracing::info!(
            registry = %self.repository.location().display(),
            added = report.added.len(),
            updated = report.updated.len(),
            "merged registry batch"
        );
        Ok(report)
    }

    /// Check that path locators resolve to images and that every key in
    /// `required` is present.
    pub fn verify(&self, required: &[LogicalImageKey]) -> Result<VerifyReport, RegistryError> {
        let document = self.repository.load()?;
        let mut report = VerifyReport::default();

        for (key, entry) in document.entries() {
            if !is_path_locator(&entry.locator) {
                continue;
            }
            report.checked += 1;
            if non_empty_len(Path::new(&entry.locator)).is_none() {
                report.violations.push(Violation::MissingImage {
                    key: key.clone(),
                    locator: entry.locator.clone(),
                });
            }
        }

        for key in required {
            if document.get(key).is_none() {
                report.violations.push(Violation::MissingKey(key.clone()));
            }
        }

        Ok(report)
    }
}

/// Absolute paths and `.sif` files are checked; stems and image references
/// are resolved elsewhere.
fn is_path_locator(locator: &str) -> bool {
    let path = PathBuf::from(locator);
    path.is_absolute() || path.extension().is_some_and(|ext| ext == SIF_EXTENSION)
}
