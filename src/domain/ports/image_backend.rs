//! Image Backend Port
//!
//! The container build backend on the development host. Building is outside
//! this tool; all it needs is a way to serialize an already built image into
//! a portable archive.

use std::path::Path;
use std::time::Duration;

use super::CommandError;
use crate::domain::value_objects::ImageReference;

pub trait ImageBackend: Send + Sync {
    /// Program name, for messages
    fn program(&self) -> &str;

    fn is_available(&self) -> bool;

    /// Write `reference` as an archive at `dest`, overwriting it.
    fn save(
        &self,
        reference: &ImageReference,
        dest: &Path,
        timeout: Duration,
    ) -> Result<(), CommandError>;
}

impl<T: ImageBackend + ?Sized> ImageBackend for &T {
    fn program(&self) -> &str {
        (**self).program()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn save(
        &self,
        reference: &ImageReference,
        dest: &Path,
        timeout: Duration,
    ) -> Result<(), CommandError> {
        (**self).save(reference, dest, timeout)
    }
}
