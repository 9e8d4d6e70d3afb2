//! Inline rendering of flow collections.

use crate::document::{Node, NodeKind, ScalarStyle};
use crate::error::Result;
use crate::yamlpath::Path;

use super::options::Rule;
use super::{scalar, Encoder};

impl<'a> Encoder<'a> {
    /// Renders `node` as a single flow-style item: `[a, b]`, `{k: v}`, a
    /// scalar or an alias, preceded by its anchor and tag.
    pub(super) fn flow(&self, node: &Node, path: &Path) -> Result<String> {
        let text = match node.kind {
            NodeKind::Sequence => self.flow_sequence(node, path)?,
            NodeKind::Mapping => self.flow_mapping(node, path)?,
            NodeKind::Alias => format!("*{}", node.value),
            NodeKind::Scalar => self.flow_scalar(node, path),
            NodeKind::Document => return Err(self.nested_document(path)),
        };

        Ok(match node.properties() {
            Some(props) => format!("{} {}", props, text),
            None => text,
        })
    }

    fn flow_scalar(&self, node: &Node, path: &Path) -> String {
        if node.is_null() {
            return if node.value.is_empty() {
                "null".to_string()
            } else {
                node.value.clone()
            };
        }

        let style = match self.scalar_style(node, path) {
            ScalarStyle::Literal | ScalarStyle::Folded => ScalarStyle::DoubleQuoted,
            style => style,
        };
        scalar::render(&node.value, style, self.rules.indent(), None)
    }

    fn flow_sequence(&self, node: &Node, path: &Path) -> Result<String> {
        let dedup = self.rules.matches(Rule::Dedup, path);
        let mut items: Vec<String> = Vec::with_capacity(node.children.len());

        for child in self.arrange(node, path) {
            let item = self.flow(child, &path.append_seq_part(items.len()))?;
            if dedup && items.contains(&item) {
                continue;
            }
            items.push(item);
        }

        Ok(format!("[{}]", items.join(", ")))
    }

    fn flow_mapping(&self, node: &Node, path: &Path) -> Result<String> {
        let mut entries = Vec::with_capacity(node.children.len() / 2);

        for pair in node.children.chunks(2) {
            let key = self.key(&pair[0])?;
            match pair.get(1) {
                Some(value) => {
                    let value = self.flow(value, &path.append_map_part(&pair[0].value))?;
                    entries.push(format!("{}: {}", key, value));
                }
                None => entries.push(key),
            }
        }

        Ok(format!("{{{}}}", entries.join(", ")))
    }
}
