//! yam - a deterministic, style-preserving YAML formatter.
//!
//! The formatter parses YAML into a comment- and style-preserving syntax tree
//! ([`document`]) and re-emits it with the [`encoder`], whose layout rules
//! (indentation, blank-line gaps, sorting, quoting, de-duplication) are
//! scoped with path expressions ([`yamlpath`]).

pub mod config;
pub mod document;
pub mod encoder;
pub mod error;
pub mod file;
pub mod format;
pub mod lint;
pub mod logging;
pub mod yamlpath;

pub use error::{Error, Result};
