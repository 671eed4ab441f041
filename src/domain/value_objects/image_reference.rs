//! Image Reference Value Object
//!
//! `repository:tag` as written to a tags file or found in a registry document.
//! Parsing splits on the last `:` that follows the last `/`, so registry
//! hosts with ports (`host:5000/team/tool:1.0`) keep their port in the
//! repository part.

use std::fmt;
use std::str::FromStr;

/// Scheme prefix accepted on input and used when pulling from a registry.
pub const DOCKER_SCHEME: &str = "docker://";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageReference {
    repository: String,
    tag: String,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("empty image reference")]
    Empty,

    #[error("image reference '{0}' contains whitespace")]
    Whitespace(String),

    #[error("image reference '{0}' has no tag (expected repository:tag)")]
    MissingTag(String),

    #[error("image reference '{0}' has an empty repository")]
    EmptyRepository(String),
}

impl ImageReference {
    /// Parse a reference, tolerating surrounding whitespace and a `docker://` prefix.
    pub fn parse(input: &str) -> Result<Self, ReferenceError> {
        let trimmed = input.trim();
        let raw = trimmed.strip_prefix(DOCKER_SCHEME).unwrap_or(trimmed);

        if raw.is_empty() {
            return Err(ReferenceError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(ReferenceError::Whitespace(raw.to_string()));
        }

        let name_start = raw.rfind('/').map(|i| i + 1).unwrap_or(0);
        let colon = raw[name_start..]
            .rfind(':')
            .map(|i| name_start + i)
            .ok_or_else(|| ReferenceError::MissingTag(raw.to_string()))?;

        let repository = &raw[..colon];
        let tag = &raw[colon + 1..];

        if tag.is_empty() {
            return Err(ReferenceError::MissingTag(raw.to_string()));
        }
        if repository.is_empty()
            || repository.starts_with('/')
            || repository.ends_with('/')
            || repository.contains("//")
        {
            return Err(ReferenceError::EmptyRepository(raw.to_string()));
        }

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Build a reference from parts, validating the combined form.
    pub fn from_parts(repository: &str, tag: &str) -> Result<Self, ReferenceError> {
        Self::parse(&format!("{}:{}", repository, tag))
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Lower-cased copy. The unprivileged runtime rejects upper case
    /// references that docker tolerates in tags.
    pub fn to_lowercase(&self) -> Self {
        Self {
            repository: self.repository.to_lowercase(),
            tag: self.tag.to_lowercase(),
        }
    }

    /// `docker://repository:tag`
    pub fn docker_uri(&self) -> String {
        format!("{}{}", DOCKER_SCHEME, self)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

impl FromStr for ImageReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
