#![no_main]

use libfuzzer_sys::fuzz_target;
use sifter::domain::entities::TagsFile;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let parsed = TagsFile::parse(content);
        let rendered = TagsFile::new(parsed.references.clone()).render();
        assert_eq!(TagsFile::parse(&rendered).references, parsed.references);
    }
});
