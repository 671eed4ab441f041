//! Pull selection service
//!
//! Works out which registry keys no catalog target builds, so the puller can
//! fetch them from their upstream registry instead.
//!
//! A key counts as buildable when
//! - its normalized name is a catalog target or a declared dependency, or
//! - the key or its locator is a reference into a catalog repository, or
//! - it shares its locator with a key that is buildable by the rules above.

use std::collections::BTreeSet;

use crate::domain::entities::{Catalog, RegistryDocument};
use crate::domain::value_objects::{ImageReference, LogicalImageKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullCandidate {
    pub key: LogicalImageKey,
    pub reference: ImageReference,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullSelection {
    pub candidates: Vec<PullCandidate>,
    /// Unbuilt keys whose locator is neither a local artifact nor an image
    /// reference; nothing can be done for them automatically.
    pub unresolvable: Vec<LogicalImageKey>,
}

/// Unbuilt keys in key order.
pub fn unbuilt_keys(catalog: &Catalog, document: &RegistryDocument) -> Vec<LogicalImageKey> {
    let names = catalog.buildable_names();
    let owned: BTreeSet<String> = catalog
        .target_names()
        .map(|t| catalog.repository_for(t))
        .collect();
    let in_catalog_repo = |raw: &str| {
        ImageReference::parse(raw)
            .map(|r| owned.contains(r.repository()))
            .unwrap_or(false)
    };

    let direct: BTreeSet<&LogicalImageKey> = document
        .entries()
        .iter()
        .filter(|(key, entry)| {
            names.contains(&key.normalized_name())
                || in_catalog_repo(key.as_str())
                || in_catalog_repo(&entry.locator)
        })
        .map(|(key, _)| key)
        .collect();

    let shared_locators: BTreeSet<&str> = direct
        .iter()
        .filter_map(|key| document.get(key))
        .map(|entry| entry.locator.as_str())
        .collect();

    document
        .entries()
        .iter()
        .filter(|(key, entry)| {
            !direct.contains(key) && !shared_locators.contains(entry.locator.as_str())
        })
        .map(|(key, _)| key.clone())
        .collect()
}

/// Candidates for pulling. `is_local_artifact` reports whether a locator
/// already names an image on this host; such keys were pulled or converted
/// before and are left alone.
pub fn select_pulls(
    catalog: &Catalog,
    document: &RegistryDocument,
    is_local_artifact: impl Fn(&str) -> bool,
) -> PullSelection {
    let mut selection = PullSelection::default();

    for key in unbuilt_keys(catalog, document) {
        let Some(entry) = document.get(&key) else {
            continue;
        };
        if is_local_artifact(&entry.locator) {
            continue;
        }
        match ImageReference::parse(&entry.locator) {
            Ok(reference) => selection.candidates.push(PullCandidate { key, reference }),
            Err(_) => selection.unresolvable.push(key),
        }
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CatalogTarget, EntrySet, RegistryEntry};
    use std::collections::BTreeMap;

    fn catalog() -> Catalog {
        let mut targets = BTreeMap::new();
        targets.insert(
            "gatk".to_string(),
            CatalogTarget {
                dependencies: vec!["samtools".into()],
            },
        );
        targets.insert("bwa-mem".to_string(), CatalogTarget::default());
        Catalog::new(Some("lab".into()), targets).unwrap()
    }

    fn doc(items: &[(&str, &str)]) -> RegistryDocument {
        let entries: EntrySet = items
            .iter()
            .map(|(k, l)| (LogicalImageKey::new(*k).unwrap(), RegistryEntry::local(*l)))
            .collect();
        RegistryDocument::from_entries(Some("wgs".into()), entries)
    }

    fn keys(v: Vec<LogicalImageKey>) -> Vec<String> {
        v.into_iter().map(String::from).collect()
    }

    #[test]
    fn normalized_names_and_dependencies_are_buildable() {
        let d = doc(&[
            ("gatk_docker", "broadinstitute/gatk:4.5"),
            ("bwa_mem_docker", "lab/bwa-mem:1"),
            ("samtools_env", "biocontainers/samtools:1.19"),
            ("ubuntu_docker", "ubuntu:22.04"),
        ]);
        assert_eq!(keys(unbuilt_keys(&catalog(), &d)), vec!["ubuntu_docker"]);
    }

    #[test]
    fn catalog_references_are_buildable() {
        let d = doc(&[
            ("lab/gatk:2024-v1-abcd1234", "lab/gatk:2024-v1-abcd1234"),
            ("qc_tool", "lab/bwa-mem:2024-v1-abcd1234"),
        ]);
        assert!(unbuilt_keys(&catalog(), &d).is_empty());
    }

    #[test]
    fn shared_locator_makes_key_buildable() {
        let d = doc(&[
            ("gatk_docker", "broadinstitute/gatk:4.5"),
            ("variant_caller", "broadinstitute/gatk:4.5"),
            ("python_env", "python:3.12"),
        ]);
        assert_eq!(keys(unbuilt_keys(&catalog(), &d)), vec!["python_env"]);
    }

    #[test]
    fn selection_skips_local_artifacts_and_flags_junk() {
        let d = doc(&[
            ("ubuntu_docker", "ubuntu:22.04"),
            ("done_docker", "/images/done.sif"),
            ("odd_docker", "not a reference"),
        ]);
        let selection = select_pulls(&catalog(), &d, |l| l.ends_with(".sif"));

        assert_eq!(selection.candidates.len(), 1);
        assert_eq!(selection.candidates[0].key.as_str(), "ubuntu_docker");
        assert_eq!(selection.candidates[0].reference.to_string(), "ubuntu:22.04");
        assert_eq!(keys(selection.unresolvable), vec!["odd_docker"]);
    }
}
