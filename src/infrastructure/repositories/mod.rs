//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod manifest;
mod registry;

pub use manifest::JsonManifestRepository;
pub use registry::{parse_document, render_document, JsonRegistryRepository};
