//! Docker-compatible build backend
//!
//! Any CLI that understands `<program> save -o <file> <image>` works here
//! (`docker`, `podman`, `nerdctl`).

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use super::process::{run_with_timeout, tool_available};
use crate::domain::ports::{CommandError, ImageBackend};
use crate::domain::value_objects::ImageReference;

pub const DEFAULT_BACKEND: &str = "docker";

#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn save_command(&self, reference: &ImageReference, dest: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("save").arg("-o").arg(dest).arg(reference.to_string());
        cmd
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND)
    }
}

impl ImageBackend for DockerCli {
    fn program(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        tool_available(&self.program)
    }

    fn save(
        &self,
        reference: &ImageReference,
        dest: &Path,
        timeout: Duration,
    ) -> Result<(), CommandError> {
        run_with_timeout(self.save_command(reference, dest), timeout)
    }
}
