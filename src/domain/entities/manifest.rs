//! Archive manifest entity
//!
//! Explicit table from image reference to the archive written for it. The
//! exporter claims names through it (rejecting collisions the character
//! substitution would otherwise hide) and the converter reads it to recover
//! the original reference of an archive.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{ArchiveName, ContentHash, ImageReference};

pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    pub archive: ArchiveName,
    pub size: u64,
    pub sha256: ContentHash,
    pub exported_at: DateTime<Utc>,
}

impl ArchiveRecord {
    /// Same archive name and same content fingerprint.
    pub fn same_fingerprint(&self, size: u64, sha256: &ContentHash) -> bool {
        self.size == size && &self.sha256 == sha256
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveManifest {
    pub version: u32,
    records: BTreeMap<ImageReference, ArchiveRecord>,
    /// Archive name to the reference that owns it
    claims: BTreeMap<ArchiveName, ImageReference>,
}

impl Default for ArchiveManifest {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveManifest {
    pub fn new() -> Self {
        Self {
            version: MANIFEST_VERSION,
            records: BTreeMap::new(),
            claims: BTreeMap::new(),
        }
    }

    pub fn get(&self, reference: &ImageReference) -> Option<&ArchiveRecord> {
        self.records.get(reference)
    }

    pub fn records(&self) -> impl Iterator<Item = (&ImageReference, &ArchiveRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The reference that owns `name`, if any.
    pub fn claimant(&self, name: &ArchiveName) -> Option<&ImageReference> {
        self.claims.get(name)
    }

    pub fn reference_for_archive_file(&self, file_name: &str) -> Option<&ImageReference> {
        ArchiveName::from_archive_file(file_name).and_then(|name| self.claimant(&name))
    }

    /// Stores `record` for `reference`. A name already owned by another
    /// reference stays with the lowest reference that carries it.
    pub fn record(&mut self, reference: ImageReference, record: ArchiveRecord) {
        let name = record.archive.clone();
        if let Some(previous) = self.records.insert(reference.clone(), record) {
            if previous.archive != name && self.claims.get(&previous.archive) == Some(&reference) {
                self.release(&previous.archive);
            }
        }
        let taken = self.claims.get(&name).is_some_and(|owner| *owner <= reference);
        if !taken {
            self.claims.insert(name, reference);
        }
    }

    /// Hands `name` to the next reference still carrying it, or drops it.
    fn release(&mut self, name: &ArchiveName) {
        let next = self
            .records
            .iter()
            .find(|(_, record)| &record.archive == name)
            .map(|(reference, _)| reference.clone());
        match next {
            Some(reference) => {
                self.claims.insert(name.clone(), reference);
            }
            None => {
                self.claims.remove(name);
            }
        }
    }
}
