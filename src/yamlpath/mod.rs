//! Path expressions addressing nodes of a YAML tree.
//!
//! Formatting rules are scoped with a small, yq-like path language. The
//! same [`Path`] type describes both a rule's pattern (parsed once from an
//! expression) and the location of the node currently being encoded (built
//! up one part per structural step as the encoder descends).
//!
//! # Supported Syntax
//!
//! - `.` - Root node only
//! - `.name` - Map key `name` (letters, digits, `_`, `-`)
//! - `.*` - Any map key
//! - `[n]` - Sequence index `n`
//! - `[]` - Any sequence index
//!
//! Segments concatenate left to right with the root implied at the start.
//!
//! # Examples
//!
//! ```
//! use yam::yamlpath::{Parser, Path};
//!
//! let pattern = Parser::parse(".services.*.ports[]").unwrap();
//! let subject = Path::root()
//!     .append_map_part("services")
//!     .append_map_part("web")
//!     .append_map_part("ports")
//!     .append_seq_part(0);
//! assert!(pattern.matches(&subject));
//!
//! // Matching is exact-depth, never prefix matching.
//! assert!(!pattern.matches(&Path::root().append_map_part("services")));
//! ```

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::{Part, Path, Selector};
pub use error::PathError;
pub use parser::Parser;
