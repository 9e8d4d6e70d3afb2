use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use yam::config::{ConfigOverrides, FormatOptions};
use yam::file::loader::read_stdin;
use yam::format::{apply, format_paths};
use yam::lint::{lint_paths, UnifiedDiff};

/// yam - A deterministic, style-preserving YAML formatter
#[derive(Parser)]
#[command(name = "yam")]
#[command(version)]
#[command(about = "Format YAML files", long_about = None)]
struct Cli {
    /// YAML files or directories to format (omit to filter stdin to stdout if piped)
    paths: Vec<PathBuf>,

    /// Number of spaces used to indent a line
    #[arg(long)]
    indent: Option<usize>,

    /// Path expression to a mapping or sequence whose children should be separated by empty lines
    #[arg(long, value_delimiter = ',', value_name = "EXPR")]
    gap: Option<Vec<String>>,

    /// Path expression to a sequence whose items should be sorted
    #[arg(long, value_delimiter = ',', value_name = "EXPR")]
    sort: Option<Vec<String>>,

    /// Path expression to a scalar that should be double-quoted
    #[arg(long, value_delimiter = ',', value_name = "EXPR")]
    quote: Option<Vec<String>>,

    /// Path expression to a sequence whose duplicate items should be removed
    #[arg(long, value_delimiter = ',', value_name = "EXPR")]
    dedup: Option<Vec<String>>,

    /// Ensure file ends with a final newline character
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    final_newline: Option<bool>,

    /// Trim any trailing spaces from each line
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    trim_lines: Option<bool>,

    /// Don't modify files, but exit 1 if files aren't formatted
    #[arg(long)]
    lint: bool,

    /// Read options from this file instead of .yam.yaml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            indent: self.indent,
            gap: self.gap.clone(),
            sort: self.sort.clone(),
            quote: self.quote.clone(),
            dedup: self.dedup.clone(),
            final_newline: self.final_newline,
            trim_lines: self.trim_lines,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = yam::logging::init() {
        eprintln!("warning: unable to initialize logging: {}", err);
    }

    let config = FormatOptions::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let options = cli.overrides().apply(config);

    if cli.lint {
        let mut handler = UnifiedDiff::new(io::stderr());
        lint_paths(&cli.paths, &options, &mut handler)?;
        return Ok(());
    }

    if cli.paths.is_empty() {
        if io::stdin().is_terminal() {
            bail!("no input files: pass paths to format or pipe YAML on stdin");
        }

        let input = read_stdin()?;
        let output = apply(&input, &options).context("Failed to format stdin")?;
        io::stdout()
            .write_all(&output)
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    format_paths(&cli.paths, &options)?;
    Ok(())
}
