#![no_main]

use libfuzzer_sys::fuzz_target;
use sifter::{ArchiveName, ImageReference};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(reference) = ImageReference::parse(input) {
            // Display must parse back to the same reference
            let again = ImageReference::parse(&reference.to_string()).unwrap();
            assert_eq!(again, reference);

            let name = ArchiveName::for_reference(&reference);
            assert!(!name.as_str().contains('/'));
            assert!(!name.as_str().contains(':'));
        }
    }
});
