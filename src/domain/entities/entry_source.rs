//! Registry entry producers
//!
//! Every stage that contributes to the registry describes what it produced as
//! an [`EntrySource`]; turning that into a key/entry pair happens here and
//! nowhere else.

use crate::domain::value_objects::{ImageReference, LogicalImageKey};

use super::registry::{EntrySet, RegistryEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// A freshly planned local build, resolvable by the build backend on the
    /// development host under its own reference.
    LocalBuild { reference: ImageReference },
    /// An archive rebuilt by the unprivileged runtime.
    Conversion {
        key: LogicalImageKey,
        locator: String,
    },
    /// An upstream image fetched directly by the unprivileged runtime.
    Pull {
        key: LogicalImageKey,
        locator: String,
    },
}

impl EntrySource {
    pub fn into_entry(self) -> (LogicalImageKey, RegistryEntry) {
        match self {
            EntrySource::LocalBuild { reference } => (
                LogicalImageKey::from(&reference),
                RegistryEntry::local(reference.to_string()),
            ),
            EntrySource::Conversion { key, locator } => (key, RegistryEntry::local(locator)),
            EntrySource::Pull { key, locator } => (key, RegistryEntry::pulled(locator)),
        }
    }
}

/// Collect a stage's output into a batch; a later source for the same key wins.
pub fn collect_entries(sources: impl IntoIterator<Item = EntrySource>) -> EntrySet {
    sources.into_iter().map(EntrySource::into_entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EntryKind;

    #[test]
    fn local_build_keys_by_reference() {
        let reference = ImageReference::parse("repo/a:2024-v1-abcd1234").unwrap();
        let (key, entry) = EntrySource::LocalBuild {
            reference: reference.clone(),
        }
        .into_entry();
        assert_eq!(key.as_str(), "repo/a:2024-v1-abcd1234");
        assert_eq!(entry.locator, "repo/a:2024-v1-abcd1234");
        assert_eq!(entry.kind, EntryKind::Local);
    }

    #[test]
    fn pull_entries_are_pulled_kind() {
        let key = LogicalImageKey::new("ubuntu_docker").unwrap();
        let (pulled_key, entry) = EntrySource::Pull {
            key: key.clone(),
            locator: "/img/ubuntu.sif".into(),
        }
        .into_entry();
        assert_eq!(pulled_key, key);
        assert_eq!(entry.kind, EntryKind::Pulled);
    }

    #[test]
    fn later_source_wins_within_a_batch() {
        let key = LogicalImageKey::new("k").unwrap();
        let set = collect_entries([
            EntrySource::Conversion {
                key: key.clone(),
                locator: "/first".into(),
            },
            EntrySource::Conversion {
                key: key.clone(),
                locator: "/second".into(),
            },
        ]);
        assert_eq!(set.len(), 1);
        assert_eq!(set[&key].locator, "/second");
    }
}
