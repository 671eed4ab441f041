//! Build catalog entity
//!
//! The set of image targets this project knows how to build, as declared
//! under `[catalog]` in `sifter.toml`.

use std::collections::{BTreeMap, BTreeSet};

/// Target selector that expands to the whole catalog.
pub const ALL_TARGETS: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogTarget {
    /// Upstream images the build of this target also produces or vendors.
    /// They count as buildable when deciding what to pull.
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    namespace: Option<String>,
    targets: BTreeMap<String, CatalogTarget>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid catalog target name '{0}': use lowercase letters, digits, '.', '_' or '-'")]
    InvalidTarget(String),

    #[error("'all' is reserved and cannot be a catalog target")]
    ReservedTarget,

    #[error("invalid catalog namespace '{0}'")]
    InvalidNamespace(String),
}

impl Catalog {
    pub fn new(
        namespace: Option<String>,
        targets: BTreeMap<String, CatalogTarget>,
    ) -> Result<Self, CatalogError> {
        let namespace = namespace
            .map(|ns| ns.trim().to_string())
            .filter(|ns| !ns.is_empty());
        if let Some(ns) = &namespace {
            let bad = ns.starts_with('/')
                || ns.ends_with('/')
                || ns.contains("//")
                || ns.chars().any(char::is_whitespace);
            if bad {
                return Err(CatalogError::InvalidNamespace(ns.clone()));
            }
        }

        for name in targets.keys() {
            if name == ALL_TARGETS {
                return Err(CatalogError::ReservedTarget);
            }
            if !is_valid_target_name(name) {
                return Err(CatalogError::InvalidTarget(name.clone()));
            }
        }

        Ok(Self { namespace, targets })
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn contains(&self, target: &str) -> bool {
        self.targets.contains_key(target)
    }

    /// Target names in lexicographic order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn repository_for(&self, target: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}/{}", ns, target),
            None => target.to_string(),
        }
    }

    /// Targets plus everything they declare as dependencies.
    pub fn buildable_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for (name, target) in &self.targets {
            names.insert(name.clone());
            names.extend(target.dependencies.iter().cloned());
        }
        names
    }
}

fn is_valid_target_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
}
