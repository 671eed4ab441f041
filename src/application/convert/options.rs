//! Convert Options

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConvertConfig;
use crate::domain::value_objects::LocatorStyle;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory holding the archives and their `manifest.json`
    pub archive_dir: PathBuf,
    /// Where images are written; the archive directory when unset
    pub image_dir: Option<PathBuf>,
    pub locator: LocatorStyle,
    pub jobs: usize,
    /// Per-archive limit for the runtime's build
    pub timeout: Duration,
    /// Report what would be built and which keys would change
    pub dry_run: bool,
}

impl ConvertOptions {
    pub fn new(archive_dir: impl Into<PathBuf>) -> Self {
        Self::from_config(archive_dir, &ConvertConfig::default())
    }

    pub fn from_config(archive_dir: impl Into<PathBuf>, config: &ConvertConfig) -> Self {
        Self {
            archive_dir: archive_dir.into(),
            image_dir: config.image_dir.clone(),
            locator: config.locator,
            jobs: config.jobs,
            timeout: config.timeout(),
            dry_run: false,
        }
    }
}
