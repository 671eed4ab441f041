//! Source revision lookup for release tags.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::ports::CommandError;
use crate::domain::value_objects::SHORT_SHA_LEN;

/// Short commit hash of `HEAD` in `repo_dir`.
pub fn head_short_sha(repo_dir: &Path) -> Result<String, CommandError> {
    let program = "git";
    let output = Command::new(program)
        .arg("rev-parse")
        .arg(format!("--short={SHORT_SHA_LEN}"))
        .arg("HEAD")
        .current_dir(repo_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| CommandError::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(CommandError::Failed {
            program: program.to_string(),
            code: output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string()),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
