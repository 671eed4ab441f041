//! Artifact staging
//!
//! Archives and images are produced by external tools that write straight to
//! a path. They are pointed at a hidden staging file next to the final
//! destination, and the staging file is renamed into place only after it has
//! been checked. A staging file that is never committed is removed on drop.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use super::atomic::{keep_destination_mode, temp_builder};
use crate::domain::value_objects::ContentHash;

pub struct StagedFile {
    temp: TempPath,
    dest: PathBuf,
}

impl StagedFile {
    /// Reserve a staging file in the directory of `dest`.
    pub fn for_destination(dest: &Path) -> io::Result<Self> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prefix = format!(".{name}.");
        let temp = temp_builder()
            .prefix(&prefix)
            .suffix(".partial")
            .tempfile_in(dir)?
            .into_temp_path();

        Ok(Self {
            temp,
            dest: dest.to_path_buf(),
        })
    }

    /// Where the producing tool should write.
    pub fn path(&self) -> &Path {
        &self.temp
    }

    pub fn destination(&self) -> &Path {
        &self.dest
    }

    /// Size of the staged content; `None` when the tool left nothing.
    pub fn staged_len(&self) -> Option<u64> {
        non_empty_len(&self.temp)
    }

    /// Rename the staged content over the destination, keeping the
    /// destination's permissions when it already exists.
    pub fn commit(self) -> io::Result<PathBuf> {
        keep_destination_mode(&self.temp, &self.dest)?;
        self.temp.persist(&self.dest).map_err(|e| e.error)?;
        Ok(self.dest)
    }
}

/// Length of a regular, non-empty file.
pub fn non_empty_len(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .ok()
        .filter(|m| m.is_file() && m.len() > 0)
        .map(|m| m.len())
}

/// Size and SHA-256 of a file, streamed.
pub fn fingerprint(path: &Path) -> io::Result<(u64, ContentHash)> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let hash = ContentHash::from_reader(BufReader::new(file))?;
    Ok((size, hash))
}

/// `path` made absolute against the working directory.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// `output` exists, is non-empty, and is not older than `input`.
pub fn is_fresh(output: &Path, input: &Path) -> bool {
    let Some(out_meta) = fs::metadata(output).ok().filter(|m| m.is_file() && m.len() > 0)
    else {
        return false;
    };
    let (Ok(out_time), Ok(in_time)) = (
        out_meta.modified(),
        fs::metadata(input).and_then(|m| m.modified()),
    ) else {
        return false;
    };
    out_time >= in_time
}
