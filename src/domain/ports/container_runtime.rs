//! Container Runtime Port
//!
//! The unprivileged runtime on the target host. It rebuilds archives into
//! its own image format and fetches upstream images directly.

use std::path::Path;
use std::time::Duration;

use super::CommandError;
use crate::domain::value_objects::ImageReference;

pub trait ContainerRuntime: Send + Sync {
    fn program(&self) -> &str;

    fn is_available(&self) -> bool;

    /// Build a runnable image at `dest` from a saved archive.
    fn build_from_archive(
        &self,
        archive: &Path,
        dest: &Path,
        timeout: Duration,
    ) -> Result<(), CommandError>;

    /// Fetch `reference` from its registry into a runnable image at `dest`.
    fn pull(
        &self,
        reference: &ImageReference,
        dest: &Path,
        timeout: Duration,
    ) -> Result<(), CommandError>;
}

impl<T: ContainerRuntime + ?Sized> ContainerRuntime for &T {
    fn program(&self) -> &str {
        (**self).program()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn build_from_archive(
        &self,
        archive: &Path,
        dest: &Path,
        timeout: Duration,
    ) -> Result<(), CommandError> {
        (**self).build_from_archive(archive, dest, timeout)
    }

    fn pull(
        &self,
        reference: &ImageReference,
        dest: &Path,
        timeout: Duration,
    ) -> Result<(), CommandError> {
        (**self).pull(reference, dest, timeout)
    }
}
