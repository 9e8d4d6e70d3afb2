//! Comment recovery from YAML source text.
//!
//! The event parser discards comments, so they are found by scanning the
//! source directly. A `#` starts a comment when it is at the start of a line
//! or follows a space or tab, and is not inside a quoted scalar or a block
//! scalar body. Those regions are masked out before the scan.

/// Source text indexed by character, with line lookup.
///
/// Parser markers count characters, not bytes, so all positions here are
/// character indices.
pub(crate) struct SourceText {
    chars: Vec<char>,
    line_starts: Vec<usize>,
}

impl SourceText {
    pub(crate) fn new(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut line_starts = vec![0];
        for (i, ch) in chars.iter().enumerate() {
            if *ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { chars, line_starts }
    }

    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }

    pub(crate) fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    pub(crate) fn starts_with_at(&self, index: usize, needle: &str) -> bool {
        let mut pos = index;
        for expected in needle.chars() {
            if self.char_at(pos) != Some(expected) {
                return false;
            }
            pos += 1;
        }
        true
    }

    /// Zero-based line number of a character index. Indices past the end map
    /// to the last line.
    pub(crate) fn line_of(&self, index: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= index) - 1
    }

    pub(crate) fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Character range of a line, excluding its newline.
    pub(crate) fn line_range(&self, line: usize) -> std::ops::Range<usize> {
        let start = self.line_starts[line];
        let end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.chars.len(),
        };
        start..end
    }

    pub(crate) fn line_indent(&self, line: usize) -> usize {
        self.chars[self.line_range(line)]
            .iter()
            .take_while(|ch| **ch == ' ')
            .count()
    }

    pub(crate) fn is_blank_line(&self, line: usize) -> bool {
        self.chars[self.line_range(line)]
            .iter()
            .all(|ch| ch.is_whitespace())
    }

    pub(crate) fn slice(&self, range: std::ops::Range<usize>) -> String {
        self.chars[range].iter().collect()
    }

    /// Reads up to `count` whitespace-separated tokens that end right before
    /// `index`, returned in source order. Sequence entry dashes are skipped.
    /// Used to recover anchors and tags, which precede the node they belong
    /// to.
    pub(crate) fn tokens_before(&self, index: usize, count: usize) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut pos = index.min(self.chars.len());
        while tokens.len() < count {
            while pos > 0 && self.chars[pos - 1].is_whitespace() {
                pos -= 1;
            }
            if pos == 0 {
                break;
            }
            let end = pos;
            while pos > 0
                && !self.chars[pos - 1].is_whitespace()
                && !matches!(self.chars[pos - 1], '[' | '{' | ',')
            {
                pos -= 1;
            }
            if pos == end {
                break;
            }
            let token = self.slice(pos..end);
            if token != "-" {
                tokens.push(token);
            }
        }
        tokens.reverse();
        tokens
    }

    /// Finds the `|` or `>` header of a block scalar whose content is
    /// reported at `content`. The header is the last token before any
    /// comment on the closest non-blank line above the content.
    pub(crate) fn block_scalar_header(&self, content: usize) -> Option<usize> {
        let mut pos = content.min(self.chars.len());
        while pos > 0 && self.chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        if pos == 0 {
            return None;
        }

        let range = self.line_range(self.line_of(pos - 1));
        let mut header = None;
        let mut i = range.start;
        while i < range.end {
            if self.chars[i].is_whitespace() {
                i += 1;
                continue;
            }
            let start = i;
            while i < range.end && !self.chars[i].is_whitespace() {
                i += 1;
            }
            if self.chars[start] == '#' {
                break;
            }
            let is_header = matches!(self.chars[start], '|' | '>')
                && self.chars[start + 1..i]
                    .iter()
                    .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-'));
            header = is_header.then_some(start);
        }
        header
    }

    /// Reads an alias or anchor name starting at `index`.
    pub(crate) fn name_at(&self, index: usize) -> String {
        self.chars[index.min(self.chars.len())..]
            .iter()
            .take_while(|ch| !ch.is_whitespace() && !matches!(ch, ',' | '[' | ']' | '{' | '}'))
            .collect()
    }

    /// Finds the closing quote of a quoted scalar opening at `start`.
    pub(crate) fn closing_quote(&self, start: usize) -> Option<usize> {
        let quote = self.char_at(start)?;
        let mut pos = start + 1;
        while pos < self.chars.len() {
            let ch = self.chars[pos];
            match quote {
                '"' if ch == '\\' => pos += 2,
                '"' if ch == '"' => return Some(pos),
                '\'' if ch == '\'' => {
                    if self.char_at(pos + 1) == Some('\'') {
                        pos += 2;
                    } else {
                        return Some(pos);
                    }
                }
                _ => pos += 1,
            }
        }
        None
    }
}

/// A comment found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawComment {
    pub line: usize,
    /// Comment text including the leading `#`, trailing whitespace removed.
    pub text: String,
    /// Whether only whitespace precedes the comment on its line.
    pub full_line: bool,
}

/// Masks character ranges that belong to scalar content.
pub(crate) struct Mask {
    masked: Vec<bool>,
}

impl Mask {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            masked: vec![false; len],
        }
    }

    pub(crate) fn cover(&mut self, range: std::ops::Range<usize>) {
        let end = range.end.min(self.masked.len());
        for slot in &mut self.masked[range.start.min(end)..end] {
            *slot = true;
        }
    }

    fn contains(&self, index: usize) -> bool {
        self.masked.get(index).copied().unwrap_or(false)
    }

    /// Masks the body of a block scalar whose `|` or `>` indicator is at
    /// `header`. Body lines are those at or beyond the indentation of the
    /// first non-blank line after the header, plus interleaved blank lines.
    /// A document-root block scalar may sit at column zero and runs until a
    /// document marker.
    pub(crate) fn cover_block_scalar(&mut self, text: &SourceText, header: usize, is_root: bool) {
        let header_line = text.line_of(header);
        let parent_indent = text.line_indent(header_line);

        let first_content = (header_line + 1..text.line_count()).find(|&l| !text.is_blank_line(l));
        let Some(first_content) = first_content else {
            return;
        };
        let content_indent = text.line_indent(first_content);
        if !is_root && content_indent <= parent_indent {
            return;
        }

        for line in header_line + 1..text.line_count() {
            let range = text.line_range(line);
            if is_root
                && (text.starts_with_at(range.start, "---") || text.starts_with_at(range.start, "..."))
            {
                break;
            }
            if text.is_blank_line(line) || text.line_indent(line) >= content_indent {
                self.cover(range);
            } else {
                break;
            }
        }
    }
}

/// Finds every comment outside masked regions, at most one per line.
pub(crate) fn scan_comments(text: &SourceText, mask: &Mask) -> Vec<RawComment> {
    let mut comments = Vec::new();

    for line in 0..text.line_count() {
        let range = text.line_range(line);
        for pos in range.clone() {
            if mask.contains(pos) || text.char_at(pos) != Some('#') {
                continue;
            }
            let starts_token = pos == range.start
                || matches!(text.char_at(pos - 1), Some(' ') | Some('\t'));
            if !starts_token {
                continue;
            }

            let full_line = (range.start..pos).all(|i| matches!(text.char_at(i), Some(' ') | Some('\t')));
            comments.push(RawComment {
                line,
                text: text.slice(pos..range.end).trim_end().to_string(),
                full_line,
            });
            break;
        }
    }

    comments
}
