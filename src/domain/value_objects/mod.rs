//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod archive_name;
mod config_warning;
mod hash;
mod image_reference;
mod locator;
mod logical_key;
mod version;

pub use archive_name::{ArchiveName, ARCHIVE_EXTENSION, SIF_EXTENSION};
pub use config_warning::ConfigWarning;
pub use hash::ContentHash;
pub use image_reference::{ImageReference, ReferenceError, DOCKER_SCHEME};
pub use locator::LocatorStyle;
pub use logical_key::{KeyError, LogicalImageKey, RESERVED_NAME_FIELD};
pub use version::{ReleaseVersion, VersionError, SHORT_SHA_LEN};
