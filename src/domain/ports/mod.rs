//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod command_error;
pub mod container_runtime;
pub mod image_backend;
pub mod manifest_repository;
pub mod registry_repository;

pub use command_error::CommandError;
pub use container_runtime::ContainerRuntime;
pub use image_backend::ImageBackend;
pub use manifest_repository::{ManifestError, ManifestRepository, MANIFEST_FILE};
pub use registry_repository::{RegistryError, RegistryRepository};
