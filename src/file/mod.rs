//! File I/O for YAML documents.
//!
//! This module discovers YAML files, reads their contents from disk or
//! stdin, and writes formatted output back with atomic replacement.

pub mod loader;
pub mod saver;

use std::path::Path;

/// Name of the project configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".yam.yaml";

/// Returns true for `.yaml` and `.yml` files.
///
/// # Example
///
/// ```
/// use yam::file::is_yaml_path;
///
/// assert!(is_yaml_path("deploy/app.yaml"));
/// assert!(is_yaml_path("ci.yml"));
/// assert!(!is_yaml_path("notes.txt"));
/// assert!(!is_yaml_path("yaml"));
/// ```
pub fn is_yaml_path<P: AsRef<Path>>(path: P) -> bool {
    matches!(
        path.as_ref().extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}
