//! Property tests for registry merging and rendering.

use std::path::Path;

use proptest::prelude::*;

use sifter::domain::entities::{merge, EntrySet, RegistryDocument};
use sifter::infrastructure::repositories::{parse_document, render_document};
use sifter::{LogicalImageKey, RegistryEntry};

fn key() -> impl Strategy<Value = LogicalImageKey> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,10}")
        .unwrap()
        .prop_filter("reserved", |k| k != "name")
        .prop_map(|k| LogicalImageKey::new(k).unwrap())
}

fn entry() -> impl Strategy<Value = RegistryEntry> {
    (
        proptest::string::string_regex("/[a-z0-9_/]{1,20}\\.sif").unwrap(),
        any::<bool>(),
    )
        .prop_map(|(locator, pulled)| {
            if pulled {
                RegistryEntry::pulled(locator)
            } else {
                RegistryEntry::local(locator)
            }
        })
}

fn entries() -> impl Strategy<Value = EntrySet> {
    proptest::collection::btree_map(key(), entry(), 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Applying the same batch twice changes nothing the second time.
    #[test]
    fn property_merge_is_idempotent(base in entries(), batch in entries()) {
        let existing = RegistryDocument::from_entries(Some("wgs".into()), base);

        let once = merge(&existing, &batch);
        let mut twice = once.clone();
        let report = twice.apply(&batch);

        prop_assert_eq!(&twice, &once);
        prop_assert!(!report.has_changes());
        prop_assert_eq!(report.unchanged.len(), batch.len());
    }

    /// PROPERTY: Every batch key ends up with the batch entry; other keys survive.
    #[test]
    fn property_merge_is_last_writer_wins(base in entries(), batch in entries()) {
        let existing = RegistryDocument::from_entries(None, base.clone());

        let merged = merge(&existing, &batch);

        for (key, entry) in &batch {
            prop_assert_eq!(merged.get(key), Some(entry));
        }
        for (key, entry) in &base {
            if !batch.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(entry));
            }
        }
    }

    /// PROPERTY: Merging disjoint batches in either order gives the same document.
    #[test]
    fn property_disjoint_batches_commute(first in entries(), second in entries()) {
        let second: EntrySet = second
            .into_iter()
            .filter(|(key, _)| !first.contains_key(key))
            .collect();
        let empty = RegistryDocument::new();

        let a = merge(&merge(&empty, &first), &second);
        let b = merge(&merge(&empty, &second), &first);

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.len(), first.len() + second.len());
    }

    /// PROPERTY: The rendered document parses back to the same document.
    #[test]
    fn property_render_round_trip(entries in entries(), named in any::<bool>()) {
        let name = named.then(|| "wgs".to_string());
        let document = RegistryDocument::from_entries(name, entries);

        let rendered = render_document(&document).unwrap();
        let parsed = parse_document(&rendered, Path::new("dockers.json")).unwrap();

        prop_assert_eq!(&parsed, &document);
        prop_assert_eq!(render_document(&parsed).unwrap(), rendered);
    }
}
