//! Export Options

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ExportConfig;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Tags file listing one image reference per line
    pub tags_file: PathBuf,
    /// Directory that receives the archives and `manifest.json`
    pub out_dir: PathBuf,
    pub jobs: usize,
    /// Per-image limit for the backend's save
    pub timeout: Duration,
    /// Report the plan without saving anything
    pub dry_run: bool,
}

impl ExportOptions {
    pub fn new(tags_file: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self::from_config(tags_file, out_dir, &ExportConfig::default())
    }

    pub fn from_config(
        tags_file: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
        config: &ExportConfig,
    ) -> Self {
        Self {
            tags_file: tags_file.into(),
            out_dir: out_dir.into(),
            jobs: config.jobs,
            timeout: config.timeout(),
            dry_run: false,
        }
    }
}
