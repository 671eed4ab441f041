//! Release Version Value Object
//!
//! The `<date>-<release>-<shortsha>` tag stamped onto every locally built image.

use std::fmt;

/// Length of the commit hash component of a tag.
pub const SHORT_SHA_LEN: usize = 8;

const RESERVED: [char; 2] = [':', '/'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    date: String,
    release: String,
    short_sha: String,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("version '{0}' must look like <date>-<release> (e.g. 2024-v1)")]
    Malformed(String),

    #[error("{field} '{value}' must not be empty or contain ':', '/' or whitespace")]
    InvalidComponent { field: &'static str, value: String },

    #[error("short sha '{0}' must be exactly 8 hex characters")]
    InvalidSha(String),
}

impl ReleaseVersion {
    pub fn new(date: &str, release: &str, short_sha: &str) -> Result<Self, VersionError> {
        validate_component("date tag", date)?;
        validate_component("release tag", release)?;

        let sha = short_sha.trim().to_ascii_lowercase();
        if sha.len() != SHORT_SHA_LEN || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(VersionError::InvalidSha(short_sha.to_string()));
        }

        Ok(Self {
            date: date.to_string(),
            release: release.to_string(),
            short_sha: sha,
        })
    }

    /// Split a `<date>-<release>` string at its first dash.
    pub fn from_version_string(version: &str, short_sha: &str) -> Result<Self, VersionError> {
        let (date, release) = version
            .split_once('-')
            .ok_or_else(|| VersionError::Malformed(version.to_string()))?;
        Self::new(date, release, short_sha)
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn short_sha(&self) -> &str {
        &self.short_sha
    }

    /// Full image tag.
    pub fn tag(&self) -> String {
        format!("{}-{}-{}", self.date, self.release, self.short_sha)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

fn validate_component(field: &'static str, value: &str) -> Result<(), VersionError> {
    let bad = value.is_empty()
        || value.chars().any(|c| RESERVED.contains(&c) || c.is_whitespace());
    if bad {
        return Err(VersionError::InvalidComponent {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
