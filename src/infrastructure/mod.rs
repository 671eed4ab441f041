//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Atomic writes and artifact staging
//! - `repositories/` - Registry document and archive manifest (JSON)
//! - `tools/` - Build backend, unprivileged runtime, git

pub mod fs;
pub mod repositories;
pub mod tools;

// Re-export for convenience
pub use repositories::{JsonManifestRepository, JsonRegistryRepository};
pub use tools::{ApptainerCli, DockerCli};
