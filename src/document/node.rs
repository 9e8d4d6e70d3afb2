//! YAML syntax tree representation.
//!
//! This module provides the tree the encoder walks. Unlike a plain value
//! model, a [`Node`] keeps everything needed to re-emit the source faithfully:
//! the presentation style of collections and scalars, anchors and explicit
//! tags, and the comments attached around the node.
//!
//! Mapping nodes store their entries as alternating key/value children, in
//! source order.
//!
//! # Example
//!
//! ```
//! use yam::document::node::{Node, NodeKind, Style};
//!
//! let tree = Node::document(Node::mapping(vec![
//!     Node::scalar("name"),
//!     Node::scalar("yam"),
//!     Node::scalar("tags"),
//!     Node::sequence(vec![Node::scalar("a"), Node::scalar("b")]).with_style(Style::Flow),
//! ]));
//!
//! assert_eq!(tree.kind, NodeKind::Document);
//! assert_eq!(tree.children[0].children.len(), 4);
//! ```

/// The structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Mapping,
    Sequence,
    Scalar,
    /// A reference to an anchored node; `value` holds the anchor name.
    Alias,
}

/// Presentation style of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Indented, one entry per line.
    #[default]
    Block,
    /// Inline `[...]` / `{...}`.
    Flow,
}

/// Presentation style of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    /// `|` block scalar
    Literal,
    /// `>` block scalar
    Folded,
}

/// Resolved semantic tag of a scalar under the YAML 1.2 core schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tag {
    Null,
    Bool,
    Int,
    Float,
    #[default]
    Str,
}

/// Comments attached to a node.
///
/// Each comment keeps its leading `#`. Multi-line head and foot comments are
/// joined with `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comments {
    /// Full-line comments placed before the node.
    pub head: Option<String>,
    /// A trailing comment on the node's last line.
    pub line: Option<String>,
    /// Full-line comments placed after the node.
    pub foot: Option<String>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.head.is_none() && self.line.is_none() && self.foot.is_none()
    }
}

/// A node of a YAML syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Collection style. Ignored for scalars, aliases and documents.
    pub style: Style,
    /// Scalar style. Ignored for everything but scalars.
    pub scalar_style: ScalarStyle,
    /// Scalar text, or the anchor name for aliases. Empty for collections.
    pub value: String,
    /// Resolved tag of a scalar.
    pub tag: Tag,
    /// Explicit tag as written in the source, e.g. `!!str` or `!Ref`.
    pub explicit_tag: Option<String>,
    /// Anchor name without the leading `&`.
    pub anchor: Option<String>,
    pub children: Vec<Node>,
    pub comments: Comments,
    /// Whether a document was introduced by an explicit `---` marker.
    pub explicit_start: bool,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            style: Style::Block,
            scalar_style: ScalarStyle::Plain,
            value: String::new(),
            tag: Tag::Str,
            explicit_tag: None,
            anchor: None,
            children: Vec::new(),
            comments: Comments::default(),
            explicit_start: false,
        }
    }

    /// Creates a document node wrapping `root`.
    pub fn document(root: Node) -> Self {
        let mut node = Self::new(NodeKind::Document);
        node.children.push(root);
        node
    }

    /// Creates a block mapping from alternating key/value nodes.
    pub fn mapping(entries: Vec<Node>) -> Self {
        let mut node = Self::new(NodeKind::Mapping);
        node.children = entries;
        node
    }

    /// Creates a block sequence.
    pub fn sequence(items: Vec<Node>) -> Self {
        let mut node = Self::new(NodeKind::Sequence);
        node.children = items;
        node
    }

    /// Creates a plain scalar whose tag is resolved from its text.
    pub fn scalar(value: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Scalar);
        node.value = value.into();
        node.tag = super::schema::resolve_plain(&node.value);
        node
    }

    /// Creates a scalar with an explicit style. Non-plain scalars are strings.
    pub fn styled_scalar(value: impl Into<String>, style: ScalarStyle) -> Self {
        let mut node = Self::scalar(value);
        if style != ScalarStyle::Plain {
            node.tag = Tag::Str;
        }
        node.scalar_style = style;
        node
    }

    /// Creates an empty null scalar.
    pub fn null() -> Self {
        let mut node = Self::new(NodeKind::Scalar);
        node.tag = Tag::Null;
        node
    }

    /// Creates an alias to the anchor `name`.
    pub fn alias(name: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Alias);
        node.value = name.into();
        node
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn with_head_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.head = Some(comment.into());
        self
    }

    pub fn with_line_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.line = Some(comment.into());
        self
    }

    pub fn with_foot_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.foot = Some(comment.into());
        self
    }

    pub fn is_scalar(&self) -> bool {
        self.kind == NodeKind::Scalar
    }

    pub fn is_null(&self) -> bool {
        self.kind == NodeKind::Scalar && self.tag == Tag::Null
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping | NodeKind::Sequence)
    }

    pub fn is_flow(&self) -> bool {
        self.style == Style::Flow
    }

    /// Returns the node's anchor and explicit tag as written before it,
    /// e.g. `&base !!map`, or `None` if it has neither.
    pub fn properties(&self) -> Option<String> {
        let anchor = self.anchor.as_ref().map(|a| format!("&{}", a));
        match (anchor, self.explicit_tag.as_ref()) {
            (Some(anchor), Some(tag)) => Some(format!("{} {}", anchor, tag)),
            (Some(anchor), None) => Some(anchor),
            (None, Some(tag)) => Some(tag.clone()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_resolves_null() {
        assert!(Node::scalar("~").is_null());
        assert!(Node::scalar("null").is_null());
        assert!(Node::scalar("").is_null());
        assert!(!Node::scalar("nullable").is_null());
    }

    #[test]
    fn test_quoted_null_is_string() {
        let node = Node::styled_scalar("null", ScalarStyle::DoubleQuoted);
        assert!(!node.is_null());
        assert_eq!(node.tag, Tag::Str);
    }

    #[test]
    fn test_properties() {
        let mut node = Node::scalar("x").with_anchor("a");
        assert_eq!(node.properties().as_deref(), Some("&a"));

        node.explicit_tag = Some("!Ref".to_string());
        assert_eq!(node.properties().as_deref(), Some("&a !Ref"));

        assert_eq!(Node::scalar("x").properties(), None);
    }

    #[test]
    fn test_comments_is_empty() {
        assert!(Comments::default().is_empty());
        assert!(!Node::scalar("x").with_line_comment("# c").comments.is_empty());
    }

    #[test]
    fn test_collection_constructors() {
        let seq = Node::sequence(vec![Node::scalar("a")]).with_style(Style::Flow);
        assert!(seq.is_collection());
        assert!(seq.is_flow());
        assert_eq!(seq.children.len(), 1);

        let doc = Node::document(seq);
        assert_eq!(doc.kind, NodeKind::Document);
        assert!(!doc.is_collection());
    }
}
