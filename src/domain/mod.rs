//! Domain Layer
//!
//! Image references, archive naming, the manifest and the registry document,
//! plus the pure rules that plan tags, exports, pulls and rebinding.
//!
//! ## Structure
//!
//! - `entities/` - Catalog, TagsFile, ArchiveManifest, RegistryDocument
//! - `value_objects/` - ImageReference, ArchiveName, LogicalImageKey, ContentHash
//! - `services/` - TagPlanner, ExportPlanner, pull selection, rebinding
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or runs processes
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
