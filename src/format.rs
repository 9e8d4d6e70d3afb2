//! Formatting of YAML sources and files.
//!
//! [`apply`] is the whole pipeline for one input: optional pre-processing of
//! the raw text, parsing, and encoding under the configured rules.
//! [`format_paths`] runs it over files and writes the results back.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::document::parse_documents;
use crate::encoder::{encode_documents, RuleSet};
use crate::error::{Error, Result};
use crate::file::loader::{collect_yaml_paths, read_source};
use crate::file::saver::write_file_atomic;

pub use crate::config::FormatOptions;

/// Strips trailing spaces and tabs from every line and terminates every line
/// with `\n`. Carriage returns before line breaks are dropped.
///
/// # Example
///
/// ```
/// use yam::format::trim_trailing_whitespace;
///
/// assert_eq!(trim_trailing_whitespace("a: 1  \r\nb: 2\t"), "a: 1\nb: 2\n");
/// assert_eq!(trim_trailing_whitespace(""), "");
/// ```
pub fn trim_trailing_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    for line in text.lines() {
        out.push_str(line.trim_end_matches(|c| c == ' ' || c == '\t'));
        out.push('\n');
    }
    out
}

/// Appends a `\n` unless the text already ends with one. Empty text becomes
/// a single line break.
pub fn ensure_final_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}

/// Options with their rules compiled, reusable across many inputs.
#[derive(Debug, Clone)]
pub struct Formatter {
    options: FormatOptions,
    rules: RuleSet,
}

impl Formatter {
    /// # Errors
    ///
    /// Fails if any path expression is malformed or the indent is zero.
    pub fn new(options: &FormatOptions) -> Result<Self> {
        Ok(Self {
            options: options.clone(),
            rules: RuleSet::compile(&options.encode)?,
        })
    }

    /// Formats one YAML source.
    pub fn format(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut text = String::from_utf8(input.to_vec()).map_err(|source| Error::Utf8 {
            origin: None,
            source,
        })?;
        if self.options.trim_lines {
            text = trim_trailing_whitespace(&text);
        }
        if self.options.final_newline {
            text = ensure_final_newline(&text);
        }

        let documents = parse_documents(&text)?;
        encode_documents(&documents, &self.rules)
    }

    /// Formats the file at `path`, returning the formatted bytes together
    /// with the original contents.
    pub fn format_file(&self, path: &Path) -> Result<(Vec<u8>, Vec<u8>)> {
        let original = read_source(path)?;
        let formatted = self.format(&original).map_err(|err| err.with_origin(path))?;
        Ok((formatted, original))
    }
}

/// Decodes, pre-processes, parses and encodes `input`.
///
/// # Example
///
/// ```
/// use yam::format::{apply, FormatOptions};
///
/// let output = apply(b"b:   1   \na:\n    - x", &FormatOptions::default()).unwrap();
/// assert_eq!(output, b"b: 1\na:\n  - x\n");
/// ```
pub fn apply(input: &[u8], options: &FormatOptions) -> Result<Vec<u8>> {
    Formatter::new(options)?.format(input)
}

fn format_one(formatter: &Formatter, path: &Path) -> Result<bool> {
    let (formatted, original) = formatter.format_file(path)?;
    if formatted == original {
        return Ok(false);
    }
    write_file_atomic(path, &formatted)?;
    Ok(true)
}

/// Formats every file in `paths` in place, expanding directories to the YAML
/// files directly inside them.
///
/// A failing file does not stop the batch. Failures are logged and reported
/// together at the end.
///
/// # Errors
///
/// Returns the rule compilation error if the options are invalid, or
/// [`Error::FormatFailed`] listing every path that could not be formatted.
pub fn format_paths(paths: &[PathBuf], options: &FormatOptions) -> Result<()> {
    let formatter = Formatter::new(options)?;
    let mut failed = Vec::new();

    for path in paths {
        let files = match collect_yaml_paths(std::slice::from_ref(path)) {
            Ok(files) => files,
            Err(err) => {
                error!("{}", err);
                failed.push(path.clone());
                continue;
            }
        };

        for file in files {
            match format_one(&formatter, &file) {
                Ok(true) => info!(path = %file.display(), "formatted"),
                Ok(false) => debug!(path = %file.display(), "already formatted"),
                Err(err) => {
                    error!("{}", err);
                    failed.push(file);
                }
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::FormatFailed { paths: failed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::EncodeOptions;

    #[test]
    fn test_ensure_final_newline() {
        assert_eq!(ensure_final_newline(""), "\n");
        assert_eq!(ensure_final_newline("a"), "a\n");
        assert_eq!(ensure_final_newline("a\n"), "a\n");
    }

    #[test]
    fn test_trim_keeps_blank_lines() {
        assert_eq!(trim_trailing_whitespace("a: 1\n   \nb: 2\n"), "a: 1\n\nb: 2\n");
    }

    #[test]
    fn test_apply_without_preprocessing() {
        let options = FormatOptions {
            final_newline: false,
            trim_lines: false,
            ..FormatOptions::default()
        };
        assert_eq!(apply(b"a:   1\n", &options).unwrap(), b"a: 1\n");
    }

    #[test]
    fn test_apply_rejects_invalid_utf8() {
        let result = apply(&[0x61, 0x3a, 0x20, 0xff], &FormatOptions::default());
        assert!(matches!(result, Err(Error::Utf8 { .. })));
    }

    #[test]
    fn test_apply_rejects_bad_expression() {
        let options = FormatOptions {
            encode: EncodeOptions {
                gap_expressions: vec!["nope".to_string()],
                ..EncodeOptions::default()
            },
            ..FormatOptions::default()
        };
        assert!(matches!(
            apply(b"a: 1\n", &options),
            Err(Error::Expression { .. })
        ));
    }

    #[test]
    fn test_apply_empty_input() {
        assert_eq!(apply(b"", &FormatOptions::default()).unwrap(), b"");
    }
}
