//! Sifter - container images for offline HPC clusters
//!
//! Sifter plans deterministic image tags for a build, saves the built images
//! into portable archives, rebuilds those archives under an unprivileged
//! runtime on the cluster, and keeps the registry document that maps the
//! logical image names used by workflows to the images on disk.
//!
//! ## Layers
//!
//! - `domain` - references, archive naming, manifest, registry rules
//! - `application` - the plan, export, convert, pull and registry use cases
//! - `infrastructure` - JSON repositories, atomic files, external tools
//! - `presentation` - CLI definition, use case factory, renderers

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

// Re-exports for convenience
pub use config::Config;
pub use domain::entities::{RegistryDocument, RegistryEntry};
pub use domain::value_objects::{ArchiveName, ImageReference, LogicalImageKey};
pub use error::{SifterError, SifterResult};
