//! YAML syntax tree and the parser that builds it.

pub(crate) mod comments;
pub mod node;
pub mod parser;
pub mod schema;

pub use node::{Comments, Node, NodeKind, ScalarStyle, Style, Tag};
pub use parser::parse_documents;
