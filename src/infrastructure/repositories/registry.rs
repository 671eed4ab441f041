//! JSON Registry Repository
//!
//! Persists the registry document (`dockers.json`) that workflow submission
//! reads to resolve image keys.
//!
//! ```json
//! {
//!   "gatk_docker": { "locator": "/images/lab_gatk_2024-v1-abcd1234.sif", "kind": "local" },
//!   "name": "wgs"
//! }
//! ```
//!
//! Older documents map keys straight to a locator string; those entries are
//! read as `local` and written back in the full form.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::{EntryKind, EntrySet, MergeReport, RegistryDocument, RegistryEntry};
use crate::domain::ports::{RegistryError, RegistryRepository};
use crate::domain::value_objects::{LogicalImageKey, RESERVED_NAME_FIELD};
use crate::infrastructure::fs::write_atomic;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum JsonEntryKind {
    Local,
    Pulled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonEntry {
    locator: String,
    #[serde(default = "default_kind")]
    kind: JsonEntryKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Full(JsonEntry),
    Legacy(String),
}

fn default_kind() -> JsonEntryKind {
    JsonEntryKind::Local
}

pub struct JsonRegistryRepository {
    path: PathBuf,
}

impl JsonRegistryRepository {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".lock");
        PathBuf::from(name)
    }

    fn lock(&self) -> Result<fs::File, RegistryError> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(access_error)?;
        }

        let lock_file = fs::File::create(&lock_path).map_err(access_error)?;
        lock_file.lock_exclusive().map_err(access_error)?;
        Ok(lock_file)
    }

    fn load_from_disk(&self) -> Result<RegistryDocument, RegistryError> {
        if !self.path.exists() {
            return Ok(RegistryDocument::new());
        }

        let content = fs::read_to_string(&self.path).map_err(access_error)?;
        parse_document(&content, &self.path)
    }

    fn save_to_disk(&self, document: &RegistryDocument) -> Result<(), RegistryError> {
        let content = render_document(document)?;
        write_atomic(&self.path, content.as_bytes()).map_err(access_error)
    }
}

impl RegistryRepository for JsonRegistryRepository {
    fn load(&self) -> Result<RegistryDocument, RegistryError> {
        self.load_from_disk()
    }

    fn merge(
        &self,
        base: &RegistryDocument,
        batch: &EntrySet,
    ) -> Result<MergeReport, RegistryError> {
        let lock_file = self.lock()?;

        let result = self.load_from_disk().and_then(|mut current| {
            let diverged = base.diverged_keys(&current, batch.keys());
            if !diverged.is_empty() {
                return Err(RegistryError::ConcurrentModification {
                    path: self.path.clone(),
                    keys: diverged.into_iter().map(String::from).collect(),
                });
            }

            let report = current.apply(batch);
            if report.has_changes() {
                self.save_to_disk(&current)?;
            }
            Ok(report)
        });

        let _ = lock_file.unlock();
        result
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Parse a registry document. `origin` is only used in error messages.
pub fn parse_document(content: &str, origin: &Path) -> Result<RegistryDocument, RegistryError> {
    let corrupted = |message: String| RegistryError::Corrupted {
        path: origin.to_path_buf(),
        message,
    };

    let raw: BTreeMap<String, Value> =
        serde_json::from_str(content).map_err(|e| corrupted(e.to_string()))?;

    let mut name = None;
    let mut entries = EntrySet::new();

    for (key, value) in raw {
        if key == RESERVED_NAME_FIELD {
            match value {
                Value::String(s) => name = Some(s),
                Value::Null => {}
                other => {
                    return Err(corrupted(format!(
                        "'{RESERVED_NAME_FIELD}' must be a string, found {other}"
                    )))
                }
            }
            continue;
        }

        let logical = LogicalImageKey::new(key.as_str())
            .map_err(|e| corrupted(format!("key '{key}': {e}")))?;
        let stored: StoredEntry = serde_json::from_value(value).map_err(|_| {
            corrupted(format!(
                "entry '{key}' must be a locator string or {{\"locator\", \"kind\"}}"
            ))
        })?;
        entries.insert(logical, from_json(stored));
    }

    Ok(RegistryDocument::from_entries(name, entries))
}

/// Render a registry document: two-space indent, sorted keys, trailing newline.
pub fn render_document(document: &RegistryDocument) -> Result<String, RegistryError> {
    let mut out: BTreeMap<&str, Value> = BTreeMap::new();

    for (key, entry) in document.entries() {
        let value = serde_json::to_value(to_json(entry)).map_err(serialization_error)?;
        out.insert(key.as_str(), value);
    }
    if let Some(name) = &document.name {
        out.insert(RESERVED_NAME_FIELD, Value::String(name.clone()));
    }

    let mut content = serde_json::to_string_pretty(&out).map_err(serialization_error)?;
    content.push('\n');
    Ok(content)
}

fn from_json(stored: StoredEntry) -> RegistryEntry {
    match stored {
        StoredEntry::Legacy(locator) => RegistryEntry::local(locator),
        StoredEntry::Full(entry) => RegistryEntry {
            locator: entry.locator,
            kind: match entry.kind {
                JsonEntryKind::Local => EntryKind::Local,
                JsonEntryKind::Pulled => EntryKind::Pulled,
            },
        },
    }
}

fn to_json(entry: &RegistryEntry) -> JsonEntry {
    JsonEntry {
        locator: entry.locator.clone(),
        kind: match entry.kind {
            EntryKind::Local => JsonEntryKind::Local,
            EntryKind::Pulled => JsonEntryKind::Pulled,
        },
    }
}

fn access_error(e: std::io::Error) -> RegistryError {
    RegistryError::AccessError {
        message: e.to_string(),
    }
}

fn serialization_error(e: serde_json::Error) -> RegistryError {
    RegistryError::SerializationError {
        message: e.to_string(),
    }
}
