//! Registry entity
//!
//! The authoritative mapping from logical image key to the locator the
//! workflow engine should use on the target host. Every producer stage
//! loads one document, merges a batch of entries into it, and the
//! repository persists the result once.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::value_objects::LogicalImageKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    /// Built from this project's own images (local build or conversion).
    Local,
    /// Fetched from an upstream registry.
    Pulled,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Local => "local",
            EntryKind::Pulled => "pulled",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryEntry {
    pub locator: String,
    pub kind: EntryKind,
}

impl RegistryEntry {
    pub fn local(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            kind: EntryKind::Local,
        }
    }

    pub fn pulled(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            kind: EntryKind::Pulled,
        }
    }
}

/// A batch of entries produced by one stage.
pub type EntrySet = BTreeMap<LogicalImageKey, RegistryEntry>;

/// What a merge did to each key of the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: Vec<LogicalImageKey>,
    pub updated: Vec<LogicalImageKey>,
    pub unchanged: Vec<LogicalImageKey>,
}

impl MergeReport {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.updated.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryDocument {
    /// Workflow name carried alongside the image mapping.
    pub name: Option<String>,
    entries: BTreeMap<LogicalImageKey, RegistryEntry>,
}

impl RegistryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(name: Option<String>, entries: EntrySet) -> Self {
        Self { name, entries }
    }

    pub fn get(&self, key: &LogicalImageKey) -> Option<&RegistryEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> &EntrySet {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last-writer-wins per key; keys absent from `batch` are left alone.
    pub fn apply(&mut self, batch: &EntrySet) -> MergeReport {
        let mut report = MergeReport::default();
        for (key, entry) in batch {
            match self.entries.get(key) {
                None => report.added.push(key.clone()),
                Some(existing) if existing == entry => {
                    report.unchanged.push(key.clone());
                    continue;
                }
                Some(_) => report.updated.push(key.clone()),
            }
            self.entries.insert(key.clone(), entry.clone());
        }
        report
    }

    /// Keys whose current locator is `locator`.
    pub fn keys_with_locator(&self, locator: &str) -> Vec<LogicalImageKey> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.locator == locator)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Keys among `keys` whose entry differs between `self` and `other`.
    pub fn diverged_keys<'a>(
        &self,
        other: &RegistryDocument,
        keys: impl IntoIterator<Item = &'a LogicalImageKey>,
    ) -> Vec<LogicalImageKey> {
        keys.into_iter()
            .filter(|key| self.get(key) != other.get(key))
            .cloned()
            .collect()
    }
}

/// Pure merge: `existing` with `batch` applied on top.
pub fn merge(existing: &RegistryDocument, batch: &EntrySet) -> RegistryDocument {
    let mut merged = existing.clone();
    merged.apply(batch);
    merged
}
