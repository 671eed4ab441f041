//! Export Use Case Module
//!
//! Serializes built images into portable archives plus `manifest.json`.

mod options;
mod result;
mod use_case;

pub use options::ExportOptions;
pub use result::{ExportResult, ExportedArchive};
pub use use_case::ExportUseCase;
