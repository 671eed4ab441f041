//! Locator Style
//!
//! How a converted or pulled image is written into the registry.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorStyle {
    /// Absolute path of the `.sif` file.
    #[default]
    Path,
    /// File stem only; the workflow engine resolves it against its image directory.
    Stem,
}

impl LocatorStyle {
    pub fn locator_for(&self, sif: &Path) -> String {
        match self {
            LocatorStyle::Path => sif.display().to_string(),
            LocatorStyle::Stem => sif
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| sif.display().to_string()),
        }
    }
}

impl std::str::FromStr for LocatorStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "path" => Ok(Self::Path),
            "stem" => Ok(Self::Stem),
            other => Err(format!("unknown locator style '{}' (expected path or stem)", other)),
        }
    }
}
