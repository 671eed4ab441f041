//! Tags file entity
//!
//! One image reference per line, written once by `plan` and read by `export`.

use std::collections::HashSet;

use crate::domain::value_objects::{ImageReference, ReferenceError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsFile {
    references: Vec<ImageReference>,
}

/// A line that could not be read as an image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-indexed
    pub line: usize,
    pub content: String,
    pub error: ReferenceError,
}

/// Result of reading a tags file leniently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTags {
    /// Well-formed references in file order, first occurrence only.
    pub references: Vec<ImageReference>,
    pub duplicates: Vec<ImageReference>,
    pub malformed: Vec<MalformedLine>,
}

impl TagsFile {
    pub fn new(references: Vec<ImageReference>) -> Self {
        Self { references }
    }

    pub fn references(&self) -> &[ImageReference] {
        &self.references
    }

    /// Newline-terminated, one reference per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for reference in &self.references {
            out.push_str(&reference.to_string());
            out.push('\n');
        }
        out
    }

    /// Blank lines are ignored; malformed lines and repeats are reported
    /// separately instead of failing the whole file.
    pub fn parse(content: &str) -> ParsedTags {
        let mut parsed = ParsedTags::default();
        let mut seen = HashSet::new();

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match ImageReference::parse(line) {
                Ok(reference) => {
                    if seen.insert(reference.clone()) {
                        parsed.references.push(reference);
                    } else {
                        parsed.duplicates.push(reference);
                    }
                }
                Err(error) => parsed.malformed.push(MalformedLine {
                    line: index + 1,
                    content: line.to_string(),
                    error,
                }),
            }
        }
        parsed
    }
}
