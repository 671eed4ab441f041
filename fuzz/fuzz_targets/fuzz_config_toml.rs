#![no_main]

use libfuzzer_sys::fuzz_target;
use sifter::domain::services::resolve_targets;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = toml::from_str::<sifter::Config>(content) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }
    // A config that validates always yields a catalog `all` can be planned over.
    if let Ok(catalog) = config.catalog() {
        if !catalog.is_empty() {
            let selected = resolve_targets(&catalog, &["all".to_string()]).unwrap_or_default();
            assert_eq!(selected.len(), catalog.target_names().count());
        }
    }
});
