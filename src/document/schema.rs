//! Tag resolution for untagged plain scalars (YAML 1.2 core schema).

use std::sync::LazyLock;

use regex::Regex;

use super::node::Tag;

static INT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-+]?[0-9]+|0o[0-7]+|0x[0-9a-fA-F]+)$").unwrap());

static FLOAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?)(?:[eE][-+]?[0-9]+)?|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
    )
    .unwrap()
});

/// Resolves the tag of an untagged plain scalar from its text.
pub fn resolve_plain(value: &str) -> Tag {
    match value {
        "" | "~" | "null" | "Null" | "NULL" => Tag::Null,
        "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => Tag::Bool,
        _ if INT_PATTERN.is_match(value) => Tag::Int,
        _ if FLOAT_PATTERN.is_match(value) => Tag::Float,
        _ => Tag::Str,
    }
}

/// Resolves an explicit tag given its handle and suffix.
///
/// Only the standard `!!` handle (or its expansion) maps onto the core
/// schema. Local and custom tags resolve to [`Tag::Str`].
pub fn resolve_explicit(handle: &str, suffix: &str) -> Tag {
    if handle != "!!" && handle != "tag:yaml.org,2002:" {
        return Tag::Str;
    }
    match suffix {
        "null" => Tag::Null,
        "bool" => Tag::Bool,
        "int" => Tag::Int,
        "float" => Tag::Float,
        _ => Tag::Str,
    }
}
