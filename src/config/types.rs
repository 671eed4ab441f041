//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Catalog, CatalogError, CatalogTarget};
use crate::domain::value_objects::LocatorStyle;
use crate::infrastructure::tools::{DEFAULT_BACKEND, DEFAULT_RUNTIME};

use super::loader::{self, ConfigWarning};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// One buildable image target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Upstream images this target is built from; keys naming them are not
    /// pulled separately.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Repository prefix (`lab` → `lab/<target>`)
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_backend")]
    pub backend: String,

    #[serde(default = "default_export_jobs")]
    pub jobs: usize,

    #[serde(default = "default_export_timeout")]
    pub timeout_secs: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            jobs: default_export_jobs(),
            timeout_secs: default_export_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    #[serde(default = "default_runtime")]
    pub runtime: String,

    #[serde(default = "default_convert_jobs")]
    pub jobs: usize,

    #[serde(default = "default_convert_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub locator: LocatorStyle,

    /// Where `.sif` images go; next to the archives when unset.
    #[serde(default)]
    pub image_dir: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            jobs: default_convert_jobs(),
            timeout_secs: default_convert_timeout(),
            locator: LocatorStyle::default(),
            image_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullConfig {
    #[serde(default = "default_pull_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_pull_jobs")]
    pub jobs: usize,

    #[serde(default = "default_pull_timeout")]
    pub timeout_secs: u64,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            out_dir: default_pull_dir(),
            jobs: default_pull_jobs(),
            timeout_secs: default_pull_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

fn default_backend() -> String {
    DEFAULT_BACKEND.to_string()
}

fn default_runtime() -> String {
    DEFAULT_RUNTIME.to_string()
}

fn default_export_jobs() -> usize {
    4
}

fn default_convert_jobs() -> usize {
    2
}

fn default_pull_jobs() -> usize {
    2
}

fn default_export_timeout() -> u64 {
    1800
}

fn default_convert_timeout() -> u64 {
    3600
}

fn default_pull_timeout() -> u64 {
    1800
}

fn default_pull_dir() -> PathBuf {
    PathBuf::from("docker_images")
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("inputs/values/dockers.json")
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub convert: ConvertConfig,

    #[serde(default)]
    pub pull: PullConfig,

    #[serde(default)]
    pub registry: RegistryConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        let targets = self
            .catalog
            .targets
            .iter()
            .map(|(name, target)| {
                (
                    name.clone(),
                    CatalogTarget {
                        dependencies: target.dependencies.clone(),
                    },
                )
            })
            .collect();
        Catalog::new(self.catalog.namespace.clone(), targets)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (section, jobs) in [
            ("export", self.export.jobs),
            ("convert", self.convert.jobs),
            ("pull", self.pull.jobs),
        ] {
            if jobs == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{section}.jobs must be at least 1"
                )));
            }
        }
        for (section, secs) in [
            ("export", self.export.timeout_secs),
            ("convert", self.convert.timeout_secs),
            ("pull", self.pull.timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{section}.timeout_secs must be at least 1"
                )));
            }
        }
        if self.export.backend.trim().is_empty() {
            return Err(ConfigError::Invalid("export.backend is empty".into()));
        }
        if self.convert.runtime.trim().is_empty() {
            return Err(ConfigError::Invalid("convert.runtime is empty".into()));
        }
        self.catalog()?;
        Ok(())
    }
}

impl ExportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ConvertConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PullConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
