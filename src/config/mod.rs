//! Configuration system for yam.
//!
//! Options come from three layers, highest priority first:
//!
//! 1. command-line flags, collected in [`ConfigOverrides`]
//! 2. a config file: `.yam.yaml` in the working directory, or failing that
//!    `~/.config/yam/config.yaml`
//! 3. built-in defaults
//!
//! A config file is used whole; the project and user files are never merged.
//!
//! # Example
//!
//! ```
//! use yam::config::{ConfigOverrides, FormatOptions};
//!
//! let from_file: FormatOptions = serde_yaml::from_str("indent: 4\ngap: [.]\ntrim-lines: false\n").unwrap();
//! assert_eq!(from_file.encode.indent, 4);
//! assert!(from_file.final_newline);
//! assert!(!from_file.trim_lines);
//!
//! let options = ConfigOverrides {
//!     indent: Some(2),
//!     ..ConfigOverrides::default()
//! }
//! .apply(from_file);
//! assert_eq!(options.encode.indent, 2);
//! assert_eq!(options.encode.gap_expressions, vec!["."]);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::encoder::EncodeOptions;
use crate::error::{Error, Result};
use crate::file::CONFIG_FILE_NAME;

/// Options for a formatting run.
///
/// # Fields
///
/// * `encode` - Encoder layout rules, read from the top level of the file
/// * `final_newline` - Ensure the input ends with a line break (default: true)
/// * `trim_lines` - Strip trailing spaces and tabs from input lines (default: true)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    #[serde(flatten)]
    pub encode: EncodeOptions,

    #[serde(default = "default_final_newline", rename = "final-newline")]
    pub final_newline: bool,

    #[serde(default = "default_trim_lines", rename = "trim-lines")]
    pub trim_lines: bool,
}

/// Returns the default for ensuring a final newline.
fn default_final_newline() -> bool {
    true
}

/// Returns the default for trimming trailing whitespace.
fn default_trim_lines() -> bool {
    true
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            encode: EncodeOptions::default(),
            final_newline: default_final_newline(),
            trim_lines: default_trim_lines(),
        }
    }
}

impl FormatOptions {
    /// Returns the path to the user config file.
    ///
    /// Uses `~/.config/yam/config.yaml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("yam");
            path.push("config.yaml");
            path
        })
    }

    /// Reads options from a config file. Returns `Ok(None)` if the file does
    /// not exist; an empty file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or is not a valid
    /// config.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(Error::Config {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(Some(Self::default()));
        }

        let options: Option<Self> = serde_yaml::from_str(&contents).map_err(|err| Error::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(Some(options.unwrap_or_default()))
    }

    /// Looks for `.yam.yaml` in `project_dir`, then `user_config`, falling
    /// back to the defaults.
    pub fn discover(project_dir: &Path, user_config: Option<&Path>) -> Result<Self> {
        if let Some(options) = Self::from_file(project_dir.join(CONFIG_FILE_NAME))? {
            return Ok(options);
        }
        if let Some(path) = user_config {
            if let Some(options) = Self::from_file(path)? {
                return Ok(options);
            }
        }
        Ok(Self::default())
    }

    /// Loads options from `explicit` if given, otherwise by discovery from
    /// the working directory and the user config.
    ///
    /// # Errors
    ///
    /// An explicitly named config file that does not exist is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path)?.ok_or_else(|| Error::Config {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            }),
            None => Self::discover(Path::new("."), Self::config_path().as_deref()),
        }
    }
}

/// Values given on the command line. Each one that is set replaces the
/// corresponding config value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub indent: Option<usize>,
    pub gap: Option<Vec<String>>,
    pub sort: Option<Vec<String>>,
    pub quote: Option<Vec<String>>,
    pub dedup: Option<Vec<String>>,
    pub final_newline: Option<bool>,
    pub trim_lines: Option<bool>,
}

impl ConfigOverrides {
    pub fn apply(self, mut options: FormatOptions) -> FormatOptions {
        if let Some(indent) = self.indent {
            options.encode.indent = indent;
        }
        if let Some(gap) = self.gap {
            options.encode.gap_expressions = gap;
        }
        if let Some(sort) = self.sort {
            options.encode.sort_expressions = sort;
        }
        if let Some(quote) = self.quote {
            options.encode.quote_expressions = quote;
        }
        if let Some(dedup) = self.dedup {
            options.encode.dedup_expressions = dedup;
        }
        if let Some(final_newline) = self.final_newline {
            options.final_newline = final_newline;
        }
        if let Some(trim_lines) = self.trim_lines {
            options.trim_lines = trim_lines;
        }
        options
    }
}
