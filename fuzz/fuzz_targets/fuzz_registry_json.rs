#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use sifter::infrastructure::repositories::{parse_document, render_document};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Parsing untrusted registry JSON must never panic, and whatever
        // parses must survive a render/parse cycle unchanged.
        if let Ok(document) = parse_document(content, Path::new("fuzz.json")) {
            let rendered = render_document(&document).unwrap();
            let reparsed = parse_document(&rendered, Path::new("fuzz.json")).unwrap();
            assert_eq!(reparsed, document);
        }
    }
});
