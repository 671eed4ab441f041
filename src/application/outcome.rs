//! Shared item bookkeeping for the export, convert and pull stages.

use std::fmt;

use crate::domain::ports::CommandError;
use crate::error::exit_code;

/// One item that did not make it. Recorded in the stage result; never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Reference, archive file or registry key the failure belongs to
    pub subject: String,
    pub message: String,
}

impl ItemFailure {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// An item the pool never started because the run was interrupted.
    pub fn cancelled(subject: impl Into<String>) -> Self {
        Self::new(subject, CommandError::Cancelled.to_string())
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Exit code for a stage that got past its fatal checks.
pub fn stage_exit_code(failures: &[ItemFailure]) -> i32 {
    if failures.is_empty() {
        exit_code::SUCCESS
    } else {
        exit_code::PARTIAL_FAILURE
    }
}
