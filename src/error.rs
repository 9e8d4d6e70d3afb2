//! Error types for yam

use std::path::PathBuf;

use crate::yamlpath::PathError;

/// Result type for yam operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling rules, parsing, or formatting
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to parse expression {expression:?}: {source}")]
    Expression {
        expression: String,
        #[source]
        source: PathError,
    },

    #[error("indent must be a positive number of spaces, got {0}")]
    InvalidIndent(usize),

    #[error("unable to decode YAML{}: {source}", display_origin(.origin))]
    Decode {
        origin: Option<PathBuf>,
        #[source]
        source: yaml_rust2::ScanError,
    },

    #[error("malformed YAML tree at {path}: {message}")]
    MalformedTree { path: String, message: String },

    #[error("input is not valid UTF-8{}", display_origin(.origin))]
    Utf8 {
        origin: Option<PathBuf>,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("unable to read config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("the following was not formatted correctly: {}", display_paths(.paths))]
    LintFailed { paths: Vec<PathBuf> },

    #[error("unable to format: {}", display_paths(.paths))]
    FormatFailed { paths: Vec<PathBuf> },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attaches a file name to a decode or UTF-8 error that has none yet.
    pub fn with_origin(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Decode {
                origin: None,
                source,
            } => Self::Decode {
                origin: Some(path.into()),
                source,
            },
            Self::Utf8 {
                origin: None,
                source,
            } => Self::Utf8 {
                origin: Some(path.into()),
                source,
            },
            other => other,
        }
    }
}

fn display_origin(origin: &Option<PathBuf>) -> String {
    match origin {
        Some(path) => format!(" in {}", path.display()),
        None => String::new(),
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
