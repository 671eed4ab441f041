//! Property tests for image reference parsing and archive naming.

use proptest::prelude::*;

use sifter::{ArchiveName, ImageReference};

fn repository() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9]{1,8}(/[a-z0-9._-]{1,8}){0,2}").unwrap()
}

fn tag() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._-]{1,16}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(input in ".{0,64}") {
        let _ = ImageReference::parse(&input);
    }

    /// PROPERTY: A well-formed reference displays as itself and parses back.
    #[test]
    fn property_display_round_trip(repo in repository(), tag in tag()) {
        let raw = format!("{repo}:{tag}");
        let parsed = ImageReference::parse(&raw).unwrap();

        prop_assert_eq!(parsed.to_string(), raw.clone());
        prop_assert_eq!(parsed.repository(), repo.as_str());
        prop_assert_eq!(parsed.tag(), tag.as_str());
        prop_assert_eq!(ImageReference::parse(&format!("docker://{raw}")).unwrap(), parsed);
    }

    /// PROPERTY: Archive names are single path components.
    #[test]
    fn property_archive_name_is_flat(repo in repository(), tag in tag()) {
        let reference = ImageReference::parse(&format!("{repo}:{tag}")).unwrap();
        let name = ArchiveName::for_reference(&reference);

        prop_assert!(!name.as_str().contains('/'));
        prop_assert!(!name.as_str().contains(':'));
        prop_assert_eq!(
            ArchiveName::from_archive_file(&name.archive_file()),
            Some(name.clone())
        );
    }
}
