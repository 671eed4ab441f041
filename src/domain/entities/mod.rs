//! Domain Entities
//!
//! - `Catalog` - buildable image targets
//! - `TagsFile` - planned image references
//! - `ArchiveManifest` - reference → archive table written at export time
//! - `RegistryDocument` - logical image key → locator mapping
//! - `EntrySource` - the producers that feed the registry

mod catalog;
mod entry_source;
mod manifest;
mod registry;
mod tags_file;

pub use catalog::{Catalog, CatalogError, CatalogTarget, ALL_TARGETS};
pub use entry_source::{collect_entries, EntrySource};
pub use manifest::{ArchiveManifest, ArchiveRecord, MANIFEST_VERSION};
pub use registry::{merge, EntryKind, EntrySet, MergeReport, RegistryDocument, RegistryEntry};
pub use tags_file::{MalformedLine, ParsedTags, TagsFile};
