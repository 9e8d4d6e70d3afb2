//! YAML parsing into a style- and comment-preserving [`Node`] tree.
//!
//! Parsing runs `yaml-rust2`'s event parser over the source and keeps the
//! marker of every event. The tree is built from the events in a second
//! pass, with the source text consulted for what the events do not carry:
//! flow vs block style, anchor names, tags as written and comments.
//!
//! # Example
//!
//! ```
//! use yam::document::node::{NodeKind, Style};
//! use yam::document::parser::parse_documents;
//!
//! let documents = parse_documents("# owner\nname: yam\ntags: [a, b]\n").unwrap();
//! let root = &documents[0].children[0];
//!
//! assert_eq!(root.kind, NodeKind::Mapping);
//! assert_eq!(root.children[0].comments.head.as_deref(), Some("# owner"));
//! assert_eq!(root.children[3].style, Style::Flow);
//! ```

use std::collections::{HashMap, HashSet, VecDeque};

use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag as EventTag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use super::comments::{scan_comments, Mask, RawComment, SourceText};
use super::node::{Node, NodeKind, ScalarStyle, Style, Tag};
use super::schema;
use crate::error::{Error, Result};

#[derive(Default)]
struct EventCollector {
    events: Vec<(Event, Marker)>,
}

impl MarkedEventReceiver for EventCollector {
    fn on_event(&mut self, event: Event, mark: Marker) {
        self.events.push((event, mark));
    }
}

/// Parses every document of a YAML stream.
///
/// A stream holding nothing but comments yields one document with a null
/// root and the comments as its foot. An empty stream yields no documents.
pub fn parse_documents(source: &str) -> Result<Vec<Node>> {
    let mut collector = EventCollector::default();
    Parser::new(source.chars())
        .load(&mut collector, true)
        .map_err(|source| Error::Decode {
            origin: None,
            source,
        })?;

    let text = SourceText::new(source);
    let layout = Layout::scan(&text, &collector.events);
    let comments = scan_comments(&text, &layout.mask);

    let starts = content_starts(&text, &collector.events);
    TreeBuilder::new(&text, comments, &layout, starts).build(collector.events)
}

fn resolve_tag(value: &str, style: TScalarStyle, tag: Option<&EventTag>) -> Tag {
    match tag {
        Some(tag) => schema::resolve_explicit(&tag.handle, &tag.suffix),
        None if matches!(style, TScalarStyle::Plain) => schema::resolve_plain(value),
        None => Tag::Str,
    }
}

fn scalar_style(style: TScalarStyle) -> ScalarStyle {
    #[allow(unreachable_patterns)]
    match style {
        TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
        TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        TScalarStyle::Literal => ScalarStyle::Literal,
        TScalarStyle::Folded => ScalarStyle::Folded,
        _ => ScalarStyle::Plain,
    }
}

/// Renders a tag the way it is conventionally written.
fn tag_text(tag: &EventTag) -> String {
    if tag.handle == "tag:yaml.org,2002:" {
        format!("!!{}", tag.suffix)
    } else {
        format!("{}{}", tag.handle, tag.suffix)
    }
}

fn property_count(anchored: bool, tag: Option<&EventTag>) -> usize {
    usize::from(anchored) + usize::from(tag.is_some())
}

fn is_flow_start(text: &SourceText, mark: &Marker) -> bool {
    matches!(text.char_at(mark.index()), Some('[') | Some('{'))
}

/// First source position of a block collection's content, and how many
/// property tokens of nested nodes sit between its own properties and that
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ContentStart {
    index: usize,
    skip: usize,
}

/// Locates the content of every block collection.
///
/// A block collection's own marker does not point at its start (a mapping's
/// is reported at its first `:`), so its anchor and tag are looked up
/// before its first descendant that carries a reliable marker: a scalar,
/// an alias or a flow collection.
fn content_starts(text: &SourceText, events: &[(Event, Marker)]) -> HashMap<usize, ContentStart> {
    let mut starts: HashMap<usize, ContentStart> = HashMap::new();

    for i in (0..events.len()).rev() {
        let is_block_start = match &events[i].0 {
            Event::SequenceStart(..) | Event::MappingStart(..) => !is_flow_start(text, &events[i].1),
            _ => false,
        };
        if !is_block_start {
            continue;
        }

        let Some((child, mark)) = events.get(i + 1) else {
            continue;
        };
        let start = match child {
            Event::Scalar(_, _, anchor_id, tag) => ContentStart {
                index: mark.index(),
                skip: property_count(*anchor_id > 0, tag.as_ref()),
            },
            Event::SequenceStart(anchor_id, tag) | Event::MappingStart(anchor_id, tag) => {
                let own = property_count(*anchor_id > 0, tag.as_ref());
                match starts.get(&(i + 1)) {
                    Some(inner) => ContentStart {
                        index: inner.index,
                        skip: inner.skip + own,
                    },
                    None => ContentStart {
                        index: mark.index(),
                        skip: own,
                    },
                }
            }
            _ => ContentStart {
                index: mark.index(),
                skip: 0,
            },
        };
        starts.insert(i, start);
    }

    starts
}

/// Scalar regions to hide from the comment scan, and the event that hosts a
/// trailing comment on each line.
struct Layout {
    mask: Mask,
    hosts: HashMap<usize, usize>,
    /// Lines after the first of a multi-line flow collection. Every comment
    /// on them joins the collection's line comment.
    flow_lines: HashSet<usize>,
}

impl Layout {
    fn scan(text: &SourceText, events: &[(Event, Marker)]) -> Self {
        let mut mask = Mask::new(text.len());
        let mut hosts = HashMap::new();
        let mut flow_lines = HashSet::new();
        // (is_flow, event index) per open collection
        let mut open: Vec<(bool, usize)> = Vec::new();
        let mut in_document = false;

        for (i, (event, mark)) in events.iter().enumerate() {
            let index = mark.index();
            let line = text.line_of(index);
            let in_flow = open.iter().any(|(flow, _)| *flow);

            match event {
                Event::DocumentStart { .. } => in_document = true,
                Event::DocumentEnd => in_document = false,
                Event::Scalar(value, style, _, tag) => {
                    let mut end_line = line;
                    match style {
                        TScalarStyle::SingleQuoted | TScalarStyle::DoubleQuoted => {
                            if let Some(end) = text.closing_quote(index) {
                                mask.cover(index..end + 1);
                                end_line = text.line_of(end);
                            }
                        }
                        TScalarStyle::Literal | TScalarStyle::Folded => {
                            // The marker sits on the first content line; a
                            // trailing comment belongs to the header line.
                            if let Some(header) = text.block_scalar_header(index) {
                                mask.cover_block_scalar(text, header, in_document && open.is_empty());
                                end_line = text.line_of(header);
                            }
                        }
                        _ => {}
                    }
                    if !in_flow && resolve_tag(value, *style, tag.as_ref()) != Tag::Null {
                        hosts.insert(end_line, i);
                    }
                }
                Event::Alias(_) => {
                    if !in_flow {
                        hosts.insert(line, i);
                    }
                }
                Event::SequenceStart(..) | Event::MappingStart(..) => {
                    open.push((is_flow_start(text, mark), i));
                }
                Event::SequenceEnd | Event::MappingEnd => {
                    if let Some((true, start)) = open.pop() {
                        if !open.iter().any(|(flow, _)| *flow) {
                            let start_line = text.line_of(events[start].1.index());
                            for spanned in start_line..=line {
                                hosts.insert(spanned, start);
                            }
                            flow_lines.extend(start_line + 1..=line);
                        }
                    }
                }
                _ => {}
            }
        }

        Self {
            mask,
            hosts,
            flow_lines,
        }
    }
}

/// Position of a node within its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Root,
    Key,
    Value,
    Item,
}

struct TreeBuilder<'a> {
    text: &'a SourceText,
    /// Full-line comments not yet reached by the event stream.
    waiting: VecDeque<RawComment>,
    /// Comments reached but not yet attached to a node.
    pending: Vec<String>,
    line_comments: HashMap<usize, String>,
    /// Where the properties of each block collection are looked up.
    starts: HashMap<usize, ContentStart>,
    stack: Vec<Node>,
    flow_depth: usize,
    documents: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn new(
        text: &'a SourceText,
        comments: Vec<RawComment>,
        layout: &Layout,
        starts: HashMap<usize, ContentStart>,
    ) -> Self {
        let mut waiting = VecDeque::new();
        let mut line_comments: HashMap<usize, String> = HashMap::new();

        for comment in comments {
            let hosted = !comment.full_line || layout.flow_lines.contains(&comment.line);
            match layout.hosts.get(&comment.line) {
                Some(&event) if hosted => {
                    if let Some(existing) = line_comments.get_mut(&event) {
                        existing.push(' ');
                        existing.push_str(&comment.text);
                    } else {
                        line_comments.insert(event, comment.text);
                    }
                }
                _ => waiting.push_back(comment),
            }
        }

        Self {
            text,
            waiting,
            pending: Vec::new(),
            line_comments,
            starts,
            stack: Vec::new(),
            flow_depth: 0,
            documents: Vec::new(),
        }
    }

    fn build(mut self, events: Vec<(Event, Marker)>) -> Result<Vec<Node>> {
        for (i, (event, mark)) in events.into_iter().enumerate() {
            let index = mark.index();
            let line = self.text.line_of(index);

            match event {
                Event::DocumentStart { .. } => self.start_document(index, line),
                Event::DocumentEnd => self.end_document(line)?,
                Event::Scalar(value, style, anchor_id, tag) => {
                    let node = self.scalar(i, index, value, style, anchor_id > 0, tag);
                    self.attach(node, line)?;
                }
                Event::Alias(_) => {
                    let mut node = Node::alias(self.text.name_at(index + 1));
                    node.comments.line = self.line_comments.remove(&i);
                    self.attach(node, line)?;
                }
                Event::SequenceStart(anchor_id, tag) => {
                    let node = Node::new(NodeKind::Sequence);
                    self.start_collection(node, i, index, line, anchor_id > 0, tag);
                }
                Event::MappingStart(anchor_id, tag) => {
                    let node = Node::new(NodeKind::Mapping);
                    self.start_collection(node, i, index, line, anchor_id > 0, tag);
                }
                Event::SequenceEnd | Event::MappingEnd => self.end_collection()?,
                _ => {}
            }
        }

        Ok(self.finish())
    }

    /// Moves every comment above `line` into the pending list.
    fn reach(&mut self, line: usize) {
        while self.waiting.front().is_some_and(|c| c.line < line) {
            if let Some(comment) = self.waiting.pop_front() {
                self.pending.push(comment.text);
            }
        }
    }

    fn take_pending(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let joined = self.pending.join("\n");
        self.pending.clear();
        Some(joined)
    }

    fn role(&self) -> Role {
        match self.stack.last() {
            Some(parent) => match parent.kind {
                NodeKind::Sequence => Role::Item,
                NodeKind::Mapping if parent.children.len() % 2 == 0 => Role::Key,
                NodeKind::Mapping => Role::Value,
                _ => Role::Root,
            },
            None => Role::Root,
        }
    }

    /// Head comment for a node starting on `line`. Values and block
    /// collections at the root leave comments pending for the first key or
    /// item inside them.
    fn head_comment(&mut self, line: usize, block_collection: bool) -> Option<String> {
        self.reach(line);
        if self.flow_depth > 0 {
            return None;
        }
        match self.role() {
            Role::Key | Role::Item => self.take_pending(),
            Role::Root if !block_collection => self.take_pending(),
            _ => None,
        }
    }

    /// Recovers the anchor and tag written before `index`. The last `skip`
    /// tokens belong to nodes nested in this one and are passed over.
    fn properties(&self, node: &mut Node, index: usize, skip: usize, anchored: bool, tag: Option<&EventTag>) {
        let wanted = property_count(anchored, tag);
        if wanted == 0 {
            return;
        }

        let mut tokens = self.text.tokens_before(index, wanted + skip);
        tokens.truncate(tokens.len().saturating_sub(skip));
        for token in tokens {
            if let Some(name) = token.strip_prefix('&') {
                if anchored {
                    node.anchor = Some(name.to_string());
                }
            } else if token.starts_with('!') && tag.is_some() {
                node.explicit_tag = Some(token);
            }
        }

        if node.explicit_tag.is_none() {
            node.explicit_tag = tag.map(tag_text);
        }
    }

    fn scalar(
        &mut self,
        event: usize,
        index: usize,
        value: String,
        style: TScalarStyle,
        anchored: bool,
        tag: Option<EventTag>,
    ) -> Node {
        // An omitted value is reported as a plain `~` positioned at the
        // following token.
        let omitted = matches!(style, TScalarStyle::Plain)
            && value == "~"
            && !self.text.starts_with_at(index, "~");

        let mut node = Node::new(NodeKind::Scalar);
        node.tag = resolve_tag(&value, style, tag.as_ref());
        node.scalar_style = scalar_style(style);
        node.value = if omitted { String::new() } else { value };
        self.properties(&mut node, index, 0, anchored, tag.as_ref());
        node.comments.line = self.line_comments.remove(&event);
        node
    }

    fn start_document(&mut self, index: usize, line: usize) {
        let mut document = Node::new(NodeKind::Document);
        if self.text.starts_with_at(index, "---") {
            document.explicit_start = true;
            self.reach(line);
            document.comments.head = self.take_pending();
        }
        self.stack.push(document);
    }

    fn end_document(&mut self, line: usize) -> Result<()> {
        let mut document = match self.stack.pop() {
            Some(node) if node.kind == NodeKind::Document => node,
            _ => {
                return Err(Error::MalformedTree {
                    path: ".".to_string(),
                    message: "unbalanced document end".to_string(),
                })
            }
        };

        if document.children.is_empty() {
            document.children.push(Node::null());
        }
        self.reach(line);
        document.comments.foot = self.take_pending();
        self.documents.push(document);
        Ok(())
    }

    fn start_collection(
        &mut self,
        mut node: Node,
        event: usize,
        index: usize,
        line: usize,
        anchored: bool,
        tag: Option<EventTag>,
    ) {
        let flow = matches!(self.text.char_at(index), Some('[') | Some('{'));
        if flow {
            node.style = Style::Flow;
        }
        node.comments.head = self.head_comment(line, !flow);
        match self.starts.get(&event) {
            Some(start) if !flow => {
                self.properties(&mut node, start.index, start.skip, anchored, tag.as_ref())
            }
            _ => self.properties(&mut node, index, 0, anchored, tag.as_ref()),
        }
        node.comments.line = self.line_comments.remove(&event);

        if flow {
            self.flow_depth += 1;
        }
        self.stack.push(node);
    }

    fn end_collection(&mut self) -> Result<()> {
        let node = match self.stack.pop() {
            Some(node) if node.is_collection() => node,
            _ => {
                return Err(Error::MalformedTree {
                    path: ".".to_string(),
                    message: "unbalanced collection end".to_string(),
                })
            }
        };
        if node.is_flow() {
            self.flow_depth = self.flow_depth.saturating_sub(1);
        }
        self.push_child(node)
    }

    fn attach(&mut self, mut node: Node, line: usize) -> Result<()> {
        node.comments.head = self.head_comment(line, false);
        self.push_child(node)
    }

    fn push_child(&mut self, node: Node) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(node);
                Ok(())
            }
            None => Err(Error::MalformedTree {
                path: ".".to_string(),
                message: "node outside of a document".to_string(),
            }),
        }
    }

    /// Attaches comments left after the last node to the last document.
    fn finish(mut self) -> Vec<Node> {
        self.reach(usize::MAX);
        if let Some(rest) = self.take_pending() {
            match self.documents.last_mut() {
                Some(document) => {
                    document.comments.foot = Some(match document.comments.foot.take() {
                        Some(foot) => format!("{}\n{}", foot, rest),
                        None => rest,
                    });
                }
                None => {
                    let mut document = Node::document(Node::null());
                    document.comments.foot = Some(rest);
                    self.documents.push(document);
                }
            }
        }
        self.documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_root(source: &str) -> Node {
        let mut documents = parse_documents(source).unwrap();
        assert_eq!(documents.len(), 1);
        documents.remove(0).children.remove(0)
    }

    #[test]
    fn test_parse_mapping() {
        let root = parse_root("name: yam\ncount: 3\n");
        assert_eq!(root.kind, NodeKind::Mapping);
        assert_eq!(root.style, Style::Block);
        let values: Vec<&str> = root.children.iter().map(|n| n.value.as_str()).collect();
        assert_eq!(values, vec!["name", "yam", "count", "3"]);
        assert_eq!(root.children[3].tag, Tag::Int);
    }

    #[test]
    fn test_parse_flow_collections() {
        let root = parse_root("list: [a, b]\nmap: {x: 1}\nblock:\n  - c\n");
        assert_eq!(root.children[1].style, Style::Flow);
        assert_eq!(root.children[1].kind, NodeKind::Sequence);
        assert_eq!(root.children[3].style, Style::Flow);
        assert_eq!(root.children[3].kind, NodeKind::Mapping);
        assert_eq!(root.children[5].style, Style::Block);
    }

    #[test]
    fn test_omitted_value_is_empty_null() {
        let root = parse_root("a:\nb: ~\n");
        assert!(root.children[1].is_null());
        assert_eq!(root.children[1].value, "");
        assert!(root.children[3].is_null());
        assert_eq!(root.children[3].value, "~");
    }

    #[test]
    fn test_scalar_styles() {
        let root = parse_root("a: 'x'\nb: \"y\"\nc: |\n  line\nd: >-\n  folded\n");
        assert_eq!(root.children[1].scalar_style, ScalarStyle::SingleQuoted);
        assert_eq!(root.children[3].scalar_style, ScalarStyle::DoubleQuoted);
        assert_eq!(root.children[5].scalar_style, ScalarStyle::Literal);
        assert_eq!(root.children[5].value, "line\n");
        assert_eq!(root.children[7].scalar_style, ScalarStyle::Folded);
        assert_eq!(root.children[7].value, "folded");
    }

    #[test]
    fn test_quoted_null_is_string() {
        let root = parse_root("a: \"null\"\n");
        assert!(!root.children[1].is_null());
    }

    #[test]
    fn test_head_and_line_comments() {
        let root = parse_root("# about a\na: 1 # one\n# about b\nb: 2\n");
        assert_eq!(root.children[0].comments.head.as_deref(), Some("# about a"));
        assert_eq!(root.children[1].comments.line.as_deref(), Some("# one"));
        assert_eq!(root.children[2].comments.head.as_deref(), Some("# about b"));
    }

    #[test]
    fn test_comment_characters_inside_scalars() {
        let root = parse_root("a: \"x # y\"\nb: |\n  # not a comment\n");
        assert_eq!(root.children[1].comments.line, None);
        assert_eq!(root.children[3].value, "# not a comment\n");
        assert!(root.children[3].comments.is_empty());
    }

    #[test]
    fn test_sequence_item_comments() {
        let root = parse_root("items:\n  # first\n  - a\n  - b # second\n");
        let items = &root.children[1];
        assert_eq!(items.children[0].comments.head.as_deref(), Some("# first"));
        assert_eq!(items.children[1].comments.line.as_deref(), Some("# second"));
    }

    #[test]
    fn test_flow_collection_hosts_line_comment() {
        let root = parse_root("tags: [a, b] # inline\n");
        assert_eq!(root.children[1].comments.line.as_deref(), Some("# inline"));
        assert_eq!(root.children[1].children[1].comments.line, None);
    }

    #[test]
    fn test_foot_comment() {
        let documents = parse_documents("a: 1\n# trailing\n").unwrap();
        assert_eq!(documents[0].comments.foot.as_deref(), Some("# trailing"));
    }

    #[test]
    fn test_comment_only_stream() {
        let documents = parse_documents("# just a note\n").unwrap();
        assert_eq!(documents.len(), 1);
        assert!(documents[0].children[0].is_null());
        assert_eq!(documents[0].comments.foot.as_deref(), Some("# just a note"));
    }

    #[test]
    fn test_empty_stream() {
        assert!(parse_documents("").unwrap().is_empty());
    }

    #[test]
    fn test_anchors_aliases_and_tags() {
        let root = parse_root("base: &base\n  x: 1\ncopy: *base\nref: !Ref name\nnum: !!str 3\n");
        assert_eq!(root.children[1].anchor.as_deref(), Some("base"));
        assert_eq!(root.children[3].kind, NodeKind::Alias);
        assert_eq!(root.children[3].value, "base");
        assert_eq!(root.children[5].explicit_tag.as_deref(), Some("!Ref"));
        assert_eq!(root.children[7].explicit_tag.as_deref(), Some("!!str"));
        assert_eq!(root.children[7].tag, Tag::Str);
    }

    #[test]
    fn test_block_collection_properties() {
        let root = parse_root("base: &base\n  x: 1\ntagged: !!map\n  y: 2\nboth: &b !Set\n  - z\n");
        assert_eq!(root.children[1].anchor.as_deref(), Some("base"));
        assert_eq!(root.children[1].explicit_tag, None);
        assert_eq!(root.children[3].explicit_tag.as_deref(), Some("!!map"));
        assert_eq!(root.children[5].anchor.as_deref(), Some("b"));
        assert_eq!(root.children[5].explicit_tag.as_deref(), Some("!Set"));
        assert_eq!(root.children[5].children[0].anchor, None);
    }

    #[test]
    fn test_sequence_item_collection_properties() {
        let root = parse_root("- &anc\n  x: 1\n- *anc\n- &outer\n  - &inner a\n");
        assert_eq!(root.children[0].kind, NodeKind::Mapping);
        assert_eq!(root.children[0].anchor.as_deref(), Some("anc"));
        assert_eq!(root.children[0].children[0].anchor, None);
        assert_eq!(root.children[1].kind, NodeKind::Alias);
        assert_eq!(root.children[2].anchor.as_deref(), Some("outer"));
        assert_eq!(root.children[2].children[0].anchor.as_deref(), Some("inner"));
    }

    #[test]
    fn test_nested_key_properties_are_not_taken_by_parent() {
        let root = parse_root("outer: &o\n  &k key: v\n");
        let outer = &root.children[1];
        assert_eq!(outer.anchor.as_deref(), Some("o"));
        assert_eq!(outer.children[0].anchor.as_deref(), Some("k"));
    }

    #[test]
    fn test_block_scalar_body_is_not_commented() {
        let documents = parse_documents("s: |\n  # setup\n  make # build\nt: 1\n").unwrap();
        let root = &documents[0].children[0];
        assert_eq!(root.children[1].value, "# setup\nmake # build\n");
        assert!(root.children[1].comments.is_empty());
        assert!(root.children[2].comments.is_empty());
        assert!(documents[0].comments.is_empty());
    }

    #[test]
    fn test_block_scalar_header_comment() {
        let root = parse_root("run: |- # steps\n  make\n");
        assert_eq!(root.children[0].comments.line, None);
        assert_eq!(root.children[1].comments.line.as_deref(), Some("# steps"));
        assert_eq!(root.children[1].value, "make");
    }

    #[test]
    fn test_inner_flow_comments_stay_with_collection() {
        let documents = parse_documents("a: [\n  1, # one\n  # between\n  2\n] # end\nb: 2\n").unwrap();
        let root = &documents[0].children[0];
        assert_eq!(
            root.children[1].comments.line.as_deref(),
            Some("# one # between # end")
        );
        assert_eq!(root.children[2].comments.head, None);
        assert_eq!(documents[0].comments.foot, None);
    }

    #[test]
    fn test_multiple_documents() {
        let documents = parse_documents("# header\n---\na: 1\n---\nb: 2\n").unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents[0].explicit_start);
        assert_eq!(documents[0].comments.head.as_deref(), Some("# header"));
        assert!(documents[1].explicit_start);
        assert_eq!(documents[1].children[0].children[0].value, "b");
    }

    #[test]
    fn test_implicit_document_start() {
        let documents = parse_documents("a: 1\n").unwrap();
        assert!(!documents[0].explicit_start);
    }

    #[test]
    fn test_invalid_yaml_is_decode_error() {
        let result = parse_documents("key: [unclosed\n");
        assert!(matches!(result, Err(Error::Decode { .. })));
    }
}
