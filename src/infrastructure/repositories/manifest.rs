//! JSON Manifest Repository
//!
//! `manifest.json` in an export directory:
//!
//! ```json
//! {
//!   "version": 1,
//!   "archives": {
//!     "repo/a:2024-v1-abcd1234": {
//!       "archive": "repo_a_2024-v1-abcd1234",
//!       "size": 1048576,
//!       "sha256": "sha256:…",
//!       "exported_at": "2024-05-01T12:00:00Z"
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ArchiveManifest, ArchiveRecord, MANIFEST_VERSION};
use crate::domain::ports::{ManifestError, ManifestRepository, MANIFEST_FILE};
use crate::domain::value_objects::{ArchiveName, ContentHash, ImageReference};
use crate::infrastructure::fs::write_atomic;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonArchiveRecord {
    archive: String,
    size: u64,
    sha256: String,
    exported_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonManifest {
    version: u32,
    #[serde(default)]
    archives: BTreeMap<String, JsonArchiveRecord>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonManifestRepository;

impl JsonManifestRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn manifest_path(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }
}

impl ManifestRepository for JsonManifestRepository {
    fn load(&self, dir: &Path) -> Result<ArchiveManifest, ManifestError> {
        let path = Self::manifest_path(dir);
        if !path.exists() {
            return Ok(ArchiveManifest::new());
        }

        let content = fs::read_to_string(&path).map_err(|e| ManifestError::AccessError {
            message: e.to_string(),
        })?;
        let json: JsonManifest =
            serde_json::from_str(&content).map_err(|e| ManifestError::Corrupted {
                path: path.clone(),
                message: e.to_string(),
            })?;

        from_json(json, &path)
    }

    fn save(&self, dir: &Path, manifest: &ArchiveManifest) -> Result<(), ManifestError> {
        let path = Self::manifest_path(dir);
        let mut content = serde_json::to_string_pretty(&to_json(manifest)).map_err(|e| {
            ManifestError::AccessError {
                message: e.to_string(),
            }
        })?;
        content.push('\n');

        write_atomic(&path, content.as_bytes()).map_err(|e| ManifestError::AccessError {
            message: e.to_string(),
        })
    }
}

fn from_json(json: JsonManifest, path: &Path) -> Result<ArchiveManifest, ManifestError> {
    if json.version != MANIFEST_VERSION {
        return Err(ManifestError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: json.version,
        });
    }

    let corrupted = |message: String| ManifestError::Corrupted {
        path: path.to_path_buf(),
        message,
    };

    let mut manifest = ArchiveManifest::new();
    for (raw_reference, record) in json.archives {
        let reference = ImageReference::parse(&raw_reference)
            .map_err(|e| corrupted(format!("'{raw_reference}': {e}")))?;
        let archive = ArchiveName::from_stored(&record.archive)
            .ok_or_else(|| corrupted(format!("invalid archive name '{}'", record.archive)))?;

        if let Some(other) = manifest.claimant(&archive) {
            return Err(corrupted(format!(
                "archive '{archive}' is claimed by both '{other}' and '{reference}'"
            )));
        }

        manifest.record(
            reference,
            ArchiveRecord {
                archive,
                size: record.size,
                sha256: ContentHash::new(&record.sha256),
                exported_at: record.exported_at,
            },
        );
    }
    Ok(manifest)
}

fn to_json(manifest: &ArchiveManifest) -> JsonManifest {
    JsonManifest {
        version: manifest.version,
        archives: manifest
            .records()
            .map(|(reference, record)| {
                (
                    reference.to_string(),
                    JsonArchiveRecord {
                        archive: record.archive.as_str().to_string(),
                        size: record.size,
                        sha256: record.sha256.as_str().to_string(),
                        exported_at: record.exported_at,
                    },
                )
            })
            .collect(),
    }
}
