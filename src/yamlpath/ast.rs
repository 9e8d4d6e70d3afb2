//! Path types shared by rule patterns and encode-time subject paths.

use std::fmt;

/// Either a concrete selector value or a wildcard matching any value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector<T> {
    /// Matches exactly this key or index.
    Concrete(T),
    /// Matches any key or index (`.*` / `[]`).
    Any,
}

impl<T: PartialEq> Selector<T> {
    /// Returns true if this selector, used as a pattern, accepts `subject`.
    ///
    /// A wildcard on either side matches.
    pub fn accepts(&self, subject: &Selector<T>) -> bool {
        match (self, subject) {
            (Selector::Any, _) | (_, Selector::Any) => true,
            (Selector::Concrete(a), Selector::Concrete(b)) => a == b,
        }
    }
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Part {
    /// The document root. Always first, never repeated.
    Root,
    /// A mapping key.
    Map(Selector<String>),
    /// A sequence index.
    Seq(Selector<usize>),
}

impl Part {
    fn matches(&self, subject: &Part) -> bool {
        match (self, subject) {
            (Part::Root, Part::Root) => true,
            (Part::Map(pattern), Part::Map(key)) => pattern.accepts(key),
            (Part::Seq(pattern), Part::Seq(index)) => pattern.accepts(index),
            _ => false,
        }
    }
}

/// A root-anchored location in a YAML tree.
///
/// Paths are immutable: the `append_*` methods return a new path. The first
/// part is always [`Part::Root`] and it never appears again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    parts: Vec<Part>,
}

impl Default for Path {
    fn default() -> Self {
        Self::root()
    }
}

impl Path {
    /// The path of the document root (`.`).
    pub fn root() -> Self {
        Self {
            parts: vec![Part::Root],
        }
    }

    /// Returns a new path with a concrete map key appended.
    pub fn append_map_part(&self, key: &str) -> Self {
        self.append(Part::Map(Selector::Concrete(key.to_string())))
    }

    /// Returns a new path with a concrete sequence index appended.
    pub fn append_seq_part(&self, index: usize) -> Self {
        self.append(Part::Seq(Selector::Concrete(index)))
    }

    /// Returns a new path with `part` appended.
    ///
    /// A second [`Part::Root`] is ignored so the root invariant holds.
    pub fn append(&self, part: Part) -> Self {
        let mut parts = self.parts.clone();
        if part != Part::Root {
            parts.push(part);
        }
        Self { parts }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false: a path holds at least the root.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn last(&self) -> &Part {
        // Non-empty by construction.
        &self.parts[self.parts.len() - 1]
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns true if this path, used as a pattern, matches `subject`.
    ///
    /// Both paths must have the same length; this is not prefix matching.
    pub fn matches(&self, subject: &Path) -> bool {
        self.parts.len() == subject.parts.len()
            && self
                .parts
                .iter()
                .zip(&subject.parts)
                .all(|(pattern, part)| pattern.matches(part))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parts.len() == 1 {
            return write!(f, ".");
        }
        for part in &self.parts {
            match part {
                Part::Root => {}
                Part::Map(Selector::Concrete(key)) => write!(f, ".{}", key)?,
                Part::Map(Selector::Any) => write!(f, ".*")?,
                Part::Seq(Selector::Concrete(index)) => write!(f, "[{}]", index)?,
                Part::Seq(Selector::Any) => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}
