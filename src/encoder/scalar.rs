//! Scalar text emission.
//!
//! Each style is emitted as written where the value allows it. A value the
//! requested style cannot carry (a line break in a plain scalar, control
//! characters in a block scalar, ...) falls back to double quotes.

use std::fmt::Write;

use crate::document::ScalarStyle;

/// Renders `value` in `style`, with `comment` appended to the first line.
///
/// Block scalar bodies are indented by `indent` spaces relative to the line
/// the scalar starts on.
pub(crate) fn render(value: &str, style: ScalarStyle, indent: usize, comment: Option<&str>) -> String {
    let text = match style {
        ScalarStyle::Plain if !value.contains('\n') => value.to_string(),
        ScalarStyle::SingleQuoted if !value.contains('\n') && !has_control(value) => single_quoted(value),
        ScalarStyle::Literal => match literal(value, indent, comment) {
            Some(text) => return text,
            None => double_quoted(value),
        },
        ScalarStyle::Folded => match folded(value, indent, comment) {
            Some(text) => return text,
            None => double_quoted(value),
        },
        _ => double_quoted(value),
    };

    match comment {
        Some(comment) if text.is_empty() => comment.to_string(),
        Some(comment) => format!("{} {}", text, comment),
        None => text,
    }
}

fn has_control(value: &str) -> bool {
    value.chars().any(|c| c.is_control() && c != '\n' && c != '\t')
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub(crate) fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            '\u{FEFF}' => out.push_str("\\uFEFF"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Splits a block scalar value into its chomping indicator and the body
/// without the final line break.
fn chomp(value: &str) -> (&'static str, &str) {
    if !value.ends_with('\n') {
        ("-", value)
    } else if value.ends_with("\n\n") {
        ("+", &value[..value.len() - 1])
    } else {
        ("", &value[..value.len() - 1])
    }
}

/// Builds `|`/`>` header and indented body lines. `None` when the value
/// cannot be written as a block scalar.
fn block(indicator: char, value: &str, body: &str, indent: usize, comment: Option<&str>) -> Option<String> {
    if value.trim_matches('\n').is_empty() || has_control(value) || value.contains('\r') {
        return None;
    }

    let (chomping, _) = chomp(value);
    let first_content = body.lines().find(|line| !line.is_empty()).unwrap_or("");
    let mut header = indicator.to_string();
    if first_content.starts_with(' ') {
        if indent > 9 {
            return None;
        }
        header.push_str(&indent.to_string());
    }
    header.push_str(chomping);
    if let Some(comment) = comment {
        header.push(' ');
        header.push_str(comment);
    }

    let pad = " ".repeat(indent);
    let mut out = header;
    for line in body.split('\n') {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
    }
    Some(out)
}

fn literal(value: &str, indent: usize, comment: Option<&str>) -> Option<String> {
    let (_, body) = chomp(value);
    block('|', value, body, indent, comment)
}

/// Folded scalars turn a single line break between two lines into a space,
/// so every run of line breaks inside the content is written one longer.
/// Lines starting with whitespace are not folded by readers; such values are
/// written as literals instead.
fn folded(value: &str, indent: usize, comment: Option<&str>) -> Option<String> {
    let (_, body) = chomp(value);
    if body.split('\n').any(|line| line.starts_with(' ') || line.starts_with('\t')) {
        return literal(value, indent, comment);
    }

    // Trailing line breaks kept by `+` chomping are not folded.
    let content = body.trim_end_matches('\n');
    let trailing = &body[content.len()..];
    let unfolded = widen_breaks(content) + trailing;

    block('>', value, &unfolded, indent, comment)
}

/// Writes every run of line breaks that follows content one break longer.
fn widen_breaks(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + 8);
    let mut in_run = false;
    let mut seen_content = false;
    for ch in content.chars() {
        if ch == '\n' {
            if !in_run && seen_content {
                out.push('\n');
            }
            in_run = true;
        } else {
            in_run = false;
            seen_content = true;
        }
        out.push(ch);
    }
    out
}
