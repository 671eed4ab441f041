//! Configuration module for Sifter
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SIFTER_*)
//! 3. `--config <file>`, else `./sifter.toml`, else `<config_dir>/sifter/config.toml`
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{apply_overrides, resolve, LoadedConfig, PROJECT_CONFIG_FILE};
pub use types::{
    CatalogConfig, Config, ConfigError, ConvertConfig, ExportConfig, PullConfig, RegistryConfig,
    TargetConfig,
};
