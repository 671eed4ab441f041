//! Convert Result

use std::path::PathBuf;

use crate::application::outcome::{stage_exit_code, ItemFailure};
use crate::domain::entities::MergeReport;
use crate::domain::value_objects::{ImageReference, LogicalImageKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedImage {
    pub reference: ImageReference,
    pub image: PathBuf,
    pub locator: String,
    /// Other registry keys re-pointed at this image
    pub rebound: Vec<LogicalImageKey>,
}

/// Result of a convert run
#[derive(Debug, Clone, Default)]
pub struct ConvertResult {
    /// Images built in this run (or that would be, on a dry run)
    pub converted: Vec<ConvertedImage>,
    /// Images already up to date; their entries are re-emitted
    pub skipped: Vec<ConvertedImage>,
    pub failed: Vec<ItemFailure>,
    /// Registry changes (predicted on a dry run)
    pub registry: MergeReport,
    pub dry_run: bool,
}

impl ConvertResult {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        stage_exit_code(&self.failed)
    }
}
