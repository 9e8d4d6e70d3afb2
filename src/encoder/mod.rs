//! Recursive, rule-driven YAML encoder.
//!
//! The encoder walks a [`Node`] tree depth first, carrying the [`Path`] of the
//! node being rendered. At each container it consults the [`RuleSet`]:
//!
//! - **sort**: a matched sequence is stably sorted by scalar text
//! - **dedup**: a matched sequence drops items that render identically to an
//!   earlier item
//! - **gap**: a matched container separates its children with a blank line
//! - **quote**: a matched scalar is written double-quoted
//!
//! The tree is only borrowed. Sorting and de-duplication reorder a local list
//! of child references, and quoting is decided at render time.
//!
//! # Example
//!
//! ```
//! use yam::document::parse_documents;
//! use yam::encoder::{encode_documents, EncodeOptions, RuleSet};
//!
//! let documents = parse_documents("b: 1\nlist: [c, a]\nnested:\n  - x\n  - y\n").unwrap();
//! let rules = RuleSet::compile(&EncodeOptions {
//!     indent: 4,
//!     gap_expressions: vec![".".to_string()],
//!     ..EncodeOptions::default()
//! })
//! .unwrap();
//!
//! let output = encode_documents(&documents, &rules).unwrap();
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "b: 1\n\nlist: [c, a]\n\nnested:\n    - x\n    - y\n"
//! );
//! ```

mod flow;
pub mod options;
mod scalar;

pub use options::{EncodeOptions, Rule, RuleSet};

use tracing::{debug, warn};

use crate::document::{Node, NodeKind, ScalarStyle};
use crate::error::{Error, Result};
use crate::yamlpath::Path;

/// Encodes a single node, typically a document.
pub fn encode(node: &Node, rules: &RuleSet) -> Result<Vec<u8>> {
    let encoder = Encoder::new(rules);
    let text = match node.kind {
        NodeKind::Document => encoder.document(node, false)?,
        _ => encoder.block(node, &Path::root())?,
    };
    Ok(text.into_bytes())
}

/// Encodes a stream of documents. Every document after the first is
/// introduced by `---`.
pub fn encode_documents(documents: &[Node], rules: &RuleSet) -> Result<Vec<u8>> {
    let encoder = Encoder::new(rules);
    let mut out = String::new();
    for (i, document) in documents.iter().enumerate() {
        out.push_str(&encoder.document(document, i > 0)?);
    }
    Ok(out.into_bytes())
}

/// Stateless renderer over a compiled rule set.
pub struct Encoder<'a> {
    rules: &'a RuleSet,
}

/// Writes each line of a multi-line comment on its own line.
fn comment_lines(comment: &str) -> String {
    comment.lines().map(|line| format!("{}\n", line)).collect()
}

/// Prefixes every non-empty line of `text` with `width` spaces.
fn indent_lines(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::with_capacity(text.len() + width * 4);
    for line in text.split_inclusive('\n') {
        if line != "\n" {
            out.push_str(&pad);
        }
        out.push_str(line);
    }
    out
}

/// Like [`indent_lines`], but leaves the first line alone.
fn indent_tail(text: &str, width: usize) -> String {
    match text.split_once('\n') {
        Some((first, rest)) => format!("{}\n{}", first, indent_lines(rest, width)),
        None => text.to_string(),
    }
}

impl<'a> Encoder<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    fn nested_document(&self, path: &Path) -> Error {
        Error::MalformedTree {
            path: path.to_string(),
            message: "document nested inside another node".to_string(),
        }
    }

    /// Renders a document: head comment, optional `---`, root, foot comment.
    fn document(&self, node: &Node, force_start: bool) -> Result<String> {
        let mut out = String::new();
        if let Some(head) = &node.comments.head {
            out.push_str(&comment_lines(head));
        }
        if node.explicit_start || force_start {
            out.push_str("---\n");
        }

        let root = Path::root();
        for child in &node.children {
            if let Some(head) = &child.comments.head {
                out.push_str(&comment_lines(head));
            }
            if let (true, Some(props)) = (self.is_block(child), child.properties()) {
                out.push_str(&props);
                out.push('\n');
            }
            out.push_str(&self.block(child, &root)?);
        }

        if let Some(foot) = &node.comments.foot {
            out.push_str(&comment_lines(foot));
        }
        Ok(out)
    }

    /// Whether `node` renders as an indented block rather than inline.
    fn is_block(&self, node: &Node) -> bool {
        node.is_collection() && !node.is_flow() && !node.children.is_empty()
    }

    /// Renders `node` as lines starting at column zero, each ending in `\n`.
    /// Anchors and tags of block collections are left to the parent line;
    /// head comments are left to the parent.
    fn block(&self, node: &Node, path: &Path) -> Result<String> {
        match node.kind {
            NodeKind::Document => Err(self.nested_document(path)),
            NodeKind::Mapping if self.is_block(node) => self.block_mapping(node, path),
            NodeKind::Sequence if self.is_block(node) => self.block_sequence(node, path),
            _ => {
                let text = self.inline(node, path)?;
                if text.is_empty() {
                    Ok(String::new())
                } else {
                    Ok(format!("{}\n", text))
                }
            }
        }
    }

    /// Style a scalar at `path` is written in.
    fn scalar_style(&self, node: &Node, path: &Path) -> ScalarStyle {
        if self.rules.matches(Rule::Quote, path) {
            debug!(path = %path, "quoting scalar");
            ScalarStyle::DoubleQuoted
        } else {
            node.scalar_style
        }
    }

    /// Renders a scalar, alias, flow or empty collection with its anchor,
    /// tag and line comment. Null scalars contribute only their properties.
    fn inline(&self, node: &Node, path: &Path) -> Result<String> {
        let comment = node.comments.line.as_deref();
        let text = match node.kind {
            NodeKind::Scalar if node.is_null() => String::new(),
            NodeKind::Scalar => {
                let text = scalar::render(
                    &node.value,
                    self.scalar_style(node, path),
                    self.rules.indent(),
                    comment,
                );
                return Ok(match node.properties() {
                    Some(props) if text.is_empty() => props,
                    Some(props) => format!("{} {}", props, text),
                    None => text,
                });
            }
            _ => return Ok(with_comment(self.flow(node, path)?, comment)),
        };

        let text = match node.properties() {
            Some(props) => props,
            None => text,
        };
        Ok(with_comment(text, comment))
    }

    /// Renders a mapping key. Keys keep their own style; quote rules address
    /// values only.
    fn key(&self, node: &Node) -> Result<String> {
        let text = match node.kind {
            NodeKind::Scalar if node.is_null() && node.value.is_empty() => "null".to_string(),
            NodeKind::Scalar => {
                let style = match node.scalar_style {
                    ScalarStyle::Literal | ScalarStyle::Folded => ScalarStyle::DoubleQuoted,
                    style => style,
                };
                scalar::render(&node.value, style, self.rules.indent(), None)
            }
            NodeKind::Alias => format!("*{}", node.value),
            _ => return self.flow(node, &Path::root()),
        };

        Ok(match node.properties() {
            Some(props) => format!("{} {}", props, text),
            None => text,
        })
    }

    /// Children of a sequence in output order.
    fn arrange<'n>(&self, node: &'n Node, path: &Path) -> Vec<&'n Node> {
        let mut items: Vec<&Node> = node.children.iter().collect();
        if self.rules.matches(Rule::Sort, path) {
            debug!(path = %path, items = items.len(), "sorting sequence");
            items.sort_by(|a, b| sort_key(a).cmp(sort_key(b)));
        }
        items
    }

    fn block_mapping(&self, node: &Node, path: &Path) -> Result<String> {
        let gap = self.rules.matches(Rule::Gap, path);
        let pairs: Vec<&[Node]> = node.children.chunks(2).collect();
        let mut out = String::new();

        for (i, pair) in pairs.iter().enumerate() {
            let key = &pair[0];
            if let Some(head) = &key.comments.head {
                out.push_str(&comment_lines(head));
            }
            let key_text = self.key(key)?;
            let key_comment = key.comments.line.as_deref();

            match pair.get(1) {
                None => {
                    warn!(path = %path, key = %key.value, "mapping key without a value");
                    out.push_str(&with_comment(format!("{}:", key_text), key_comment));
                    out.push('\n');
                }
                Some(value) => {
                    let value_path = path.append_map_part(&key.value);
                    out.push_str(&self.pair(&key_text, key_comment, value, &value_path)?);
                }
            }

            if gap && i + 1 < pairs.len() {
                out.push('\n');
            }
        }

        Ok(out)
    }

    /// Renders `key: value`, inline or with the value as an indented block.
    fn pair(&self, key_text: &str, key_comment: Option<&str>, value: &Node, path: &Path) -> Result<String> {
        if !self.is_block(value) {
            let value_text = self.inline(value, path)?;
            let line = if value_text.is_empty() {
                format!("{}:", key_text)
            } else {
                format!("{}: {}", key_text, value_text)
            };
            let line = match value.comments.line {
                Some(_) => line,
                None => with_comment(line, key_comment),
            };
            return Ok(format!("{}\n", line));
        }

        let mut line = format!("{}:", key_text);
        if let Some(props) = value.properties() {
            line.push(' ');
            line.push_str(&props);
        }
        let line = with_comment(line, key_comment.or(value.comments.line.as_deref()));

        let body = self.block(value, path)?;
        Ok(format!("{}\n{}", line, indent_lines(&body, self.rules.indent())))
    }

    fn block_sequence(&self, node: &Node, path: &Path) -> Result<String> {
        let dedup = self.rules.matches(Rule::Dedup, path);
        let gap = self.rules.matches(Rule::Gap, path);
        let mut rendered: Vec<String> = Vec::with_capacity(node.children.len());
        let mut heads: Vec<Option<&str>> = Vec::with_capacity(node.children.len());

        for item in self.arrange(node, path) {
            let text = self.sequence_item(item, &path.append_seq_part(rendered.len()))?;
            if dedup && rendered.contains(&text) {
                debug!(path = %path, item = %text.trim_end(), "dropping duplicate item");
                continue;
            }
            rendered.push(text);
            heads.push(item.comments.head.as_deref());
        }

        let mut out = String::new();
        for (i, (text, head)) in rendered.iter().zip(heads).enumerate() {
            if gap && i > 0 {
                out.push('\n');
            }
            if let Some(head) = head {
                out.push_str(&comment_lines(head));
            }
            out.push_str(text);
        }
        Ok(out)
    }

    /// Renders one `- item` entry without its head comment.
    fn sequence_item(&self, item: &Node, path: &Path) -> Result<String> {
        if !self.is_block(item) {
            let text = self.inline(item, path)?;
            return Ok(if text.is_empty() {
                "-\n".to_string()
            } else {
                format!("- {}\n", text)
            });
        }

        let body = self.block(item, path)?;
        Ok(match item.properties() {
            Some(props) => format!("- {}\n{}", props, indent_lines(&body, 2)),
            None => format!("- {}", indent_tail(&body, 2)),
        })
    }
}

/// Scalars sort by their text and aliases by their anchor name.
fn sort_key(node: &Node) -> &str {
    match node.kind {
        NodeKind::Scalar | NodeKind::Alias => &node.value,
        _ => "",
    }
}

fn with_comment(text: String, comment: Option<&str>) -> String {
    match comment {
        Some(comment) if text.is_empty() => comment.to_string(),
        Some(comment) => format!("{} {}", text, comment),
        None => text,
    }
}
