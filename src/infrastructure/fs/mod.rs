//! File System Helpers
//!
//! Atomic replacement of documents and staging of large artifacts. Every
//! file this tool publishes (tags files, manifests, registry documents,
//! archives, `.sif` images) becomes visible only once it is complete.

mod artifact;
mod atomic;

pub use artifact::{absolute, fingerprint, is_fresh, non_empty_len, StagedFile};
pub use atomic::write_atomic;
