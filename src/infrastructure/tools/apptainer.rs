//! Apptainer-compatible unprivileged runtime
//!
//! Works with `apptainer` and the older `singularity` binary, which share
//! the `build` and `pull` sub-commands.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use super::process::{run_with_timeout, tool_available};
use crate::domain::ports::{CommandError, ContainerRuntime};
use crate::domain::value_objects::ImageReference;

pub const DEFAULT_RUNTIME: &str = "apptainer";

const DOCKER_ARCHIVE_SOURCE: &str = "docker-archive:";

#[derive(Debug, Clone)]
pub struct ApptainerCli {
    program: String,
}

impl ApptainerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn build_command(&self, archive: &Path, dest: &Path) -> Command {
        let mut source = std::ffi::OsString::from(DOCKER_ARCHIVE_SOURCE);
        source.push(archive.as_os_str());

        let mut cmd = Command::new(&self.program);
        // --force: the destination is a pre-created staging file
        cmd.arg("build").arg("--force").arg(dest).arg(source);
        cmd
    }

    fn pull_command(&self, reference: &ImageReference, dest: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("pull")
            .arg("--force")
            .arg(dest)
            .arg(reference.to_lowercase().docker_uri());
        cmd
    }
}

impl Default for ApptainerCli {
    fn default() -> Self {
        Self::new(DEFAULT_RUNTIME)
    }
}

impl ContainerRuntime for ApptainerCli {
    fn program(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        tool_available(&self.program)
    }

    fn build_from_archive(
        &self,
        archive: &Path,
        dest: &Path,
        timeout: Duration,
    ) -> Result<(), CommandError> {
        run_with_timeout(self.build_command(archive, dest), timeout)
    }

    fn pull(
        &self,
        reference: &ImageReference,
        dest: &Path,
        timeout: Duration,
    ) -> Result<(), CommandError> {
        run_with_timeout(self.pull_command(reference, dest), timeout)
    }
}
