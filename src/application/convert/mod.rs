//! Convert Use Case Module
//!
//! Rebuilds exported archives into `.sif` images with the unprivileged
//! runtime and records where they landed in the registry.

mod options;
mod result;
mod use_case;

pub use options::ConvertOptions;
pub use result::{ConvertResult, ConvertedImage};
pub use use_case::ConvertUseCase;
