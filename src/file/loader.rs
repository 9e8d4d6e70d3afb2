//! Reading YAML sources and discovering YAML files.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::is_yaml_path;
use crate::error::{Error, Result};

/// Reads a file's raw bytes.
///
/// # Errors
///
/// Returns [`Error::Io`] naming the path if the file cannot be read.
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|err| Error::io(path, err))
}

/// Reads all of stdin.
pub fn read_stdin() -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .map_err(|err| Error::io("<stdin>", err))?;
    Ok(buffer)
}

/// Expands directories in `paths` to the YAML files directly inside them.
///
/// Only regular `.yaml`/`.yml` files one level down are picked up, in name
/// order. Paths that are not directories are passed through unchanged, so an
/// explicitly named file is kept whatever its extension.
///
/// # Errors
///
/// Returns [`Error::Io`] if a path cannot be inspected or a directory cannot
/// be listed.
pub fn collect_yaml_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut collected = Vec::new();

    for path in paths {
        let metadata = fs::metadata(path).map_err(|err| Error::io(path, err))?;
        if !metadata.is_dir() {
            collected.push(path.clone());
            continue;
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|err| Error::io(path, err))? {
            let entry = entry.map_err(|err| Error::io(path, err))?;
            let file_type = entry.file_type().map_err(|err| Error::io(entry.path(), err))?;
            let entry_path = entry.path();
            if file_type.is_file() && is_yaml_path(&entry_path) {
                entries.push(entry_path);
            }
        }
        entries.sort();
        debug!(dir = %path.display(), files = entries.len(), "expanded directory");
        collected.extend(entries);
    }

    Ok(collected)
}
