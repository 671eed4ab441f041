//! Export Result

use std::path::PathBuf;

use crate::application::outcome::{stage_exit_code, ItemFailure};
use crate::domain::value_objects::ImageReference;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArchive {
    pub reference: ImageReference,
    pub path: PathBuf,
    pub size: u64,
}

/// Result of an export run
#[derive(Debug, Clone, Default)]
pub struct ExportResult {
    /// Archives written in this run (or that would be, on a dry run)
    pub exported: Vec<ExportedArchive>,
    /// Up-to-date archives and repeated tags-file lines
    pub skipped: Vec<ImageReference>,
    pub failed: Vec<ItemFailure>,
    pub manifest: Option<PathBuf>,
    pub dry_run: bool,
}

impl ExportResult {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        stage_exit_code(&self.failed)
    }
}
