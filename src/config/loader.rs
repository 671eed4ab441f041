//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use super::types::{Config, ConfigError};

pub use crate::domain::value_objects::ConfigWarning;

/// Config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "sifter.toml";

const USER_CONFIG_PATH: &str = "sifter/config.toml";

/// A resolved configuration and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when built-in defaults were used
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.split('.').next_back().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                file: path.to_path_buf(),
                line: find_line_number(&content, &leaf),
                suggestion: suggest_key(&leaf),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Find and load the configuration, then apply `SIFTER_*` overrides.
///
/// An explicit path must exist. Without one, `./sifter.toml` and then the
/// user config are tried; if neither exists the defaults are used.
pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<LoadedConfig, ConfigError> {
    let candidate = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Some(path.to_path_buf())
        }
        None => [
            Some(cwd.join(PROJECT_CONFIG_FILE)),
            dirs::config_dir().map(|dir| dir.join(USER_CONFIG_PATH)),
        ]
        .into_iter()
        .flatten()
        .find(|path| path.is_file()),
    };

    let (config, warnings) = match &candidate {
        Some(path) => load_with_warnings(path)?,
        None => (Config::default(), Vec::new()),
    };

    let config = apply_overrides(config, |name| std::env::var(name).ok())?;
    config.validate()?;

    Ok(LoadedConfig {
        config,
        source: candidate,
        warnings,
    })
}

/// Apply `SIFTER_*` overrides read through `lookup`.
pub fn apply_overrides(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    // SIFTER_REGISTRY
    if let Some(path) = set("SIFTER_REGISTRY") {
        config.registry.path = PathBuf::from(path);
    }

    // SIFTER_BACKEND
    if let Some(backend) = set("SIFTER_BACKEND") {
        config.export.backend = backend;
    }

    // SIFTER_RUNTIME
    if let Some(runtime) = set("SIFTER_RUNTIME") {
        config.convert.runtime = runtime;
    }

    // SIFTER_JOBS (every stage)
    if let Some(jobs) = set("SIFTER_JOBS") {
        let jobs: usize = jobs.trim().parse().map_err(|_| {
            ConfigError::Invalid(format!("SIFTER_JOBS must be a positive integer, got '{jobs}'"))
        })?;
        config.export.jobs = jobs;
        config.convert.jobs = jobs;
        config.pull.jobs = jobs;
    }

    Ok(config)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "catalog",
        "namespace",
        "targets",
        "dependencies",
        "export",
        "backend",
        "jobs",
        "timeout_secs",
        "convert",
        "runtime",
        "locator",
        "image_dir",
        "pull",
        "out_dir",
        "registry",
        "path",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist > 0 && dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
