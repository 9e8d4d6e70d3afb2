//! Writing formatted YAML back to disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Temporary sibling path used while replacing `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".yam.tmp");
    path.with_file_name(name)
}

/// Writes data to a file atomically.
///
/// The data goes to a temporary file next to the target first, which is then
/// renamed over the target. The target is never left partially written.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing the temporary file or the rename fails.
pub fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let temp = temp_path(path);

    fs::write(&temp, data).map_err(|err| Error::io(&temp, err))?;

    if let Err(err) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(Error::io(path, err));
    }

    Ok(())
}
