//! External Tools
//!
//! Adapters for the command-line programs the pipeline drives.

mod apptainer;
mod docker;
mod git;
mod process;

pub use apptainer::{ApptainerCli, DEFAULT_RUNTIME};
pub use docker::{DockerCli, DEFAULT_BACKEND};
pub use git::head_short_sha;
pub use process::{run_with_timeout, tool_available};
