//! Lint mode: report files whose contents differ from their formatted form.

use std::io::Write;
use std::path::PathBuf;

use similar::TextDiff;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::file::is_yaml_path;
use crate::file::loader::collect_yaml_paths;
use crate::format::{FormatOptions, Formatter};

/// Receives the expected and actual contents of a file that failed linting.
pub trait DiffHandler {
    fn handle(&mut self, path: &std::path::Path, want: &[u8], got: &[u8]) -> std::io::Result<()>;
}

/// Writes a unified diff with five lines of context, labelled `want` and
/// `got`, followed by a blank line.
pub struct UnifiedDiff<W: Write> {
    out: W,
}

impl<W: Write> UnifiedDiff<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DiffHandler for UnifiedDiff<W> {
    fn handle(&mut self, _path: &std::path::Path, want: &[u8], got: &[u8]) -> std::io::Result<()> {
        let want = String::from_utf8_lossy(want);
        let got = String::from_utf8_lossy(got);
        let diff = TextDiff::from_lines(want.as_ref(), got.as_ref());

        write!(
            self.out,
            "{}",
            diff.unified_diff().context_radius(5).header("want", "got")
        )?;
        writeln!(self.out)
    }
}

/// Checks that every YAML file in `paths` is already formatted.
///
/// No paths means the current directory. Directories are expanded one level
/// and files without a `.yaml`/`.yml` extension are skipped. Each differing
/// file is logged and passed to `handler`.
///
/// # Errors
///
/// Returns [`Error::LintFailed`] listing the differing files. Read, parse
/// and diff-output errors abort the run immediately.
pub fn lint_paths(paths: &[PathBuf], options: &FormatOptions, handler: &mut dyn DiffHandler) -> Result<()> {
    let formatter = Formatter::new(options)?;
    let paths = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.to_vec()
    };

    let mut failed = Vec::new();
    for file in collect_yaml_paths(&paths)? {
        if !is_yaml_path(&file) {
            debug!(path = %file.display(), "skipping non-YAML file");
            continue;
        }

        let (want, got) = formatter.format_file(&file)?;
        if want != got {
            warn!("{} has a diff from the expected formatting", file.display());
            handler
                .handle(&file, &want, &got)
                .map_err(|err| Error::io(&file, err))?;
            failed.push(file);
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::LintFailed { paths: failed })
    }
}
