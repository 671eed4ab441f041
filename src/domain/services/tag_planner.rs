//! Tag planning service
//!
//! Turns a target selection and a release version into the ordered list of
//! image references for one build. Output order is lexicographic by target
//! name so two runs with the same inputs produce byte-identical tags files.

use std::collections::BTreeSet;

use crate::domain::entities::{Catalog, ALL_TARGETS};
use crate::domain::value_objects::{ImageReference, ReferenceError, ReleaseVersion};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("unknown image target '{target}' (known targets: {known})")]
    InvalidTarget { target: String, known: String },

    #[error("no image targets requested")]
    NoTargets,

    #[error("the catalog is empty; declare targets under [catalog.targets] in sifter.toml")]
    EmptyCatalog,

    #[error("target '{target}' does not form a valid image reference: {source}")]
    Reference {
        target: String,
        #[source]
        source: ReferenceError,
    },
}

/// Expand `all`, drop repeats, and check every name against the catalog.
pub fn resolve_targets<'a>(
    catalog: &'a Catalog,
    requested: &[String],
) -> Result<BTreeSet<&'a str>, PlanError> {
    if catalog.is_empty() {
        return Err(PlanError::EmptyCatalog);
    }

    let mut selected = BTreeSet::new();
    let mut any = false;

    for raw in requested {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        any = true;

        if name == ALL_TARGETS {
            selected.extend(catalog.target_names());
            continue;
        }

        match catalog.target_names().find(|t| *t == name) {
            Some(target) => {
                selected.insert(target);
            }
            None => {
                return Err(PlanError::InvalidTarget {
                    target: name.to_string(),
                    known: catalog.target_names().collect::<Vec<_>>().join(", "),
                })
            }
        }
    }

    if !any {
        return Err(PlanError::NoTargets);
    }
    Ok(selected)
}

pub fn plan(
    catalog: &Catalog,
    requested: &[String],
    version: &ReleaseVersion,
) -> Result<Vec<ImageReference>, PlanError> {
    let tag = version.tag();
    resolve_targets(catalog, requested)?
        .into_iter()
        .map(|target| {
            ImageReference::from_parts(&catalog.repository_for(target), &tag).map_err(|source| {
                PlanError::Reference {
                    target: target.to_string(),
                    source,
                }
            })
        })
        .collect()
}
