//! Command handlers
//!
//! Each handler builds its use case through the factory, runs it, prints
//! the rendered result to stdout and returns the process exit code.

use std::path::{Path, PathBuf};

use sifter::application::CancelToken;
use sifter::config::Config;
use sifter::presentation::Renderer;

pub mod convert;
pub mod export;
pub mod plan;
pub mod pull;
pub mod registry;

/// Everything a handler needs besides its own arguments.
pub struct Context {
    pub config: Config,
    /// `--registry`, when given
    pub registry: Option<PathBuf>,
    pub renderer: Box<dyn Renderer>,
    pub cancel: CancelToken,
    pub cwd: PathBuf,
}

impl Context {
    pub fn registry_flag(&self) -> Option<&Path> {
        self.registry.as_deref()
    }

    pub fn emit(&self, rendered: String) {
        print!("{rendered}");
    }
}
