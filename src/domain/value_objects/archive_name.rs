//! Archive Name Value Object
//!
//! File-system-safe base name derived from an [`ImageReference`] by replacing
//! `/` and `:` with `_`. The substitution is not injective (`a/b:c` and
//! `a_b:c` share a name), so callers that need the reverse direction must go
//! through the archive manifest instead of undoing the substitution.

use std::fmt;

use super::ImageReference;

pub const ARCHIVE_EXTENSION: &str = "tar";
pub const SIF_EXTENSION: &str = "sif";

const FILLER: char = '_';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchiveName(String);

impl ArchiveName {
    pub fn for_reference(reference: &ImageReference) -> Self {
        Self(sanitize(&reference.to_string()))
    }

    /// Recover the base name from an archive file name (`x.tar` → `x`).
    pub fn from_archive_file(file_name: &str) -> Option<Self> {
        file_name
            .strip_suffix(".tar")
            .filter(|stem| !stem.is_empty())
            .map(|stem| Self(stem.to_string()))
    }

    /// Wrap an already-sanitized base name as stored in the manifest.
    pub fn from_stored(base: &str) -> Option<Self> {
        let valid = !base.is_empty()
            && !base.contains(|c: char| c == '/' || c == ':')
            && base != "."
            && base != "..";
        valid.then(|| Self(base.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn archive_file(&self) -> String {
        format!("{}.{}", self.0, ARCHIVE_EXTENSION)
    }

    pub fn sif_file(&self) -> String {
        format!("{}.{}", self.0, SIF_EXTENSION)
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c == '/' || c == ':' { FILLER } else { c })
        .collect()
}
