//! Atomic document writes
//!
//! Temp file in the destination directory, then rename over the target, so a
//! reader sees either the previous or the next complete document. The new
//! file takes the permissions of the one it replaces, or the umask default
//! when there is none.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Replace `path` with `content`, creating parent directories as needed.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = temp_builder().tempfile_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    keep_destination_mode(tmp.path(), path)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Temp file builder whose files get the mode `File::create` would give.
pub(super) fn temp_builder<'a, 'b>() -> tempfile::Builder<'a, 'b> {
    #[allow(unused_mut)]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}

/// Copy the permissions of `dest`, when it exists, onto `temp`.
pub(super) fn keep_destination_mode(temp: &Path, dest: &Path) -> io::Result<()> {
    match fs::metadata(dest) {
        Ok(meta) => fs::set_permissions(temp, meta.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
