//! Property tests for tag planning.

use std::collections::BTreeMap;

use proptest::prelude::*;

use sifter::domain::entities::{Catalog, CatalogTarget};
use sifter::domain::services::plan;
use sifter::domain::value_objects::ReleaseVersion;

fn target_names() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set(
        proptest::string::string_regex("[a-z][a-z0-9-]{0,8}")
            .unwrap()
            .prop_filter("reserved", |n| n != "all"),
        1..8,
    )
    .prop_map(|names| names.into_iter().collect())
}

fn catalog(names: &[String]) -> Catalog {
    let targets: BTreeMap<_, _> = names
        .iter()
        .map(|n| (n.clone(), CatalogTarget::default()))
        .collect();
    Catalog::new(Some("repo".into()), targets).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Output is sorted, free of repeats and independent of request order.
    #[test]
    fn property_plan_is_deterministic(
        names in target_names(),
        picks in proptest::collection::vec(any::<prop::sample::Index>(), 1..12),
    ) {
        let catalog = catalog(&names);
        let version = ReleaseVersion::new("2024", "v1", "abcd1234").unwrap();
        let requested: Vec<String> = picks.iter().map(|i| names[i.index(names.len())].clone()).collect();
        let mut reversed = requested.clone();
        reversed.reverse();

        let forward = plan(&catalog, &requested, &version).unwrap();
        let backward = plan(&catalog, &reversed, &version).unwrap();

        prop_assert_eq!(&forward, &backward);
        let repositories: Vec<&str> = forward.iter().map(|r| r.repository()).collect();
        let mut sorted = repositories.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(&repositories, &sorted);
        for reference in &forward {
            prop_assert_eq!(reference.tag(), "2024-v1-abcd1234");
        }
    }

    /// PROPERTY: `all` plans exactly one reference per catalog target.
    #[test]
    fn property_all_covers_the_catalog(names in target_names()) {
        let catalog = catalog(&names);
        let version = ReleaseVersion::new("2024", "v1", "abcd1234").unwrap();

        let planned = plan(&catalog, &["all".to_string()], &version).unwrap();

        prop_assert_eq!(planned.len(), names.len());
    }
}
