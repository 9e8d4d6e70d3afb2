//! Encoder options and the compiled rule set.
//!
//! [`EncodeOptions`] is the raw, serde-friendly form read from configuration
//! files and CLI flags. [`RuleSet`] is what the encoder consults: the same
//! options with every path expression parsed exactly once.
//!
//! # Example
//!
//! ```
//! use yam::encoder::{EncodeOptions, Rule, RuleSet};
//! use yam::yamlpath::Path;
//!
//! let options = EncodeOptions {
//!     sort_expressions: vec![".tags".to_string()],
//!     ..EncodeOptions::default()
//! };
//! let rules = RuleSet::compile(&options).unwrap();
//!
//! assert!(rules.matches(Rule::Sort, &Path::root().append_map_part("tags")));
//! assert!(!rules.matches(Rule::Gap, &Path::root()));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::yamlpath::{Parser, Path};

/// Layout options for the encoder.
///
/// # Fields
///
/// * `indent` - Spaces per nesting level (default: 2)
/// * `gap_expressions` - Containers whose children are separated by a blank line
/// * `sort_expressions` - Sequences sorted by scalar text
/// * `quote_expressions` - Scalars forced into double-quoted style
/// * `dedup_expressions` - Sequences with duplicate items removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    #[serde(default = "default_indent")]
    pub indent: usize,

    #[serde(default, rename = "gap")]
    pub gap_expressions: Vec<String>,

    #[serde(default, rename = "sort")]
    pub sort_expressions: Vec<String>,

    #[serde(default, rename = "quote")]
    pub quote_expressions: Vec<String>,

    #[serde(default, rename = "dedup")]
    pub dedup_expressions: Vec<String>,
}

/// Returns the default indentation width.
fn default_indent() -> usize {
    2
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            gap_expressions: Vec::new(),
            sort_expressions: Vec::new(),
            quote_expressions: Vec::new(),
            dedup_expressions: Vec::new(),
        }
    }
}

/// A layout rule that can be scoped to paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Blank line between the children of a container.
    Gap,
    /// Stable sort of a sequence by scalar text.
    Sort,
    /// Double-quoted style for a scalar.
    Quote,
    /// Removal of duplicate sequence items.
    Dedup,
}

/// Compiled encoder configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    indent: usize,
    gap: Vec<Path>,
    sort: Vec<Path>,
    quote: Vec<Path>,
    dedup: Vec<Path>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            gap: Vec::new(),
            sort: Vec::new(),
            quote: Vec::new(),
            dedup: Vec::new(),
        }
    }
}

fn compile_all(expressions: &[String]) -> Result<Vec<Path>> {
    expressions
        .iter()
        .map(|expression| {
            Parser::parse(expression).map_err(|source| Error::Expression {
                expression: expression.clone(),
                source,
            })
        })
        .collect()
}

impl RuleSet {
    /// Parses every expression in `options`. Fails on the first malformed
    /// expression or a zero indent.
    pub fn compile(options: &EncodeOptions) -> Result<Self> {
        if options.indent == 0 {
            return Err(Error::InvalidIndent(options.indent));
        }

        Ok(Self {
            indent: options.indent,
            gap: compile_all(&options.gap_expressions)?,
            sort: compile_all(&options.sort_expressions)?,
            quote: compile_all(&options.quote_expressions)?,
            dedup: compile_all(&options.dedup_expressions)?,
        })
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    fn patterns(&self, rule: Rule) -> &[Path] {
        match rule {
            Rule::Gap => &self.gap,
            Rule::Sort => &self.sort,
            Rule::Quote => &self.quote,
            Rule::Dedup => &self.dedup,
        }
    }

    /// Whether any pattern of `rule` matches `path`.
    pub fn matches(&self, rule: Rule, path: &Path) -> bool {
        self.patterns(rule).iter().any(|pattern| pattern.matches(path))
    }
}
