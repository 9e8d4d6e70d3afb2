//! Path expression parser.

use super::ast::{Part, Path, Selector};
use super::error::PathError;

const ROOT_EXPRESSION: &str = ".";

/// Parser for path expression strings such as `.A_KEY[].other-key.thing[0]`.
pub struct Parser {
    input: String,
    chars: Vec<char>,
    position: usize,
}

impl Parser {
    /// Creates a new parser for the given expression.
    pub fn new(expression: &str) -> Self {
        Self {
            input: expression.to_string(),
            chars: expression.chars().collect(),
            position: 0,
        }
    }

    /// Parses the expression into a [`Path`].
    ///
    /// The scan is greedy and left to right. There is no best-effort result:
    /// any input the grammar does not cover fails the whole expression.
    pub fn parse(expression: &str) -> Result<Path, PathError> {
        let mut parser = Parser::new(expression);
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<Path, PathError> {
        if self.input == ROOT_EXPRESSION {
            return Ok(Path::root());
        }
        if self.is_eof() {
            return Err(self.unsupported());
        }

        let mut path = Path::root();
        while !self.is_eof() {
            let part = match (self.peek(), self.peek_at(1)) {
                (Some('.'), Some('[')) => {
                    self.next();
                    self.parse_seq_index()?
                }
                (Some('.'), _) => self.parse_map_key()?,
                (Some('['), _) => self.parse_seq_index()?,
                _ => return Err(self.unsupported()),
            };
            path = path.append(part);
        }

        Ok(path)
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn is_eof(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn unsupported(&self) -> PathError {
        PathError::unsupported(&self.input, self.position)
    }

    /// Parses `.name` or `.*`. The segment must be followed by the end of
    /// input, `.` or `[`.
    fn parse_map_key(&mut self) -> Result<Part, PathError> {
        self.next();

        let selector = if self.peek() == Some('*') {
            self.next();
            Selector::Any
        } else {
            let mut name = String::new();
            while let Some(ch) = self.peek() {
                if is_identifier_char(ch) {
                    name.push(ch);
                    self.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                return Err(self.unsupported());
            }
            Selector::Concrete(name)
        };

        match self.peek() {
            None | Some('.') | Some('[') => Ok(Part::Map(selector)),
            Some(_) => Err(self.unsupported()),
        }
    }

    /// Parses `[n]` or `[]`.
    fn parse_seq_index(&mut self) -> Result<Part, PathError> {
        if self.next() != Some('[') {
            return Err(self.unsupported());
        }

        let mut digits = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.next();
            } else {
                break;
            }
        }

        if self.peek() != Some(']') {
            return Err(self.unsupported());
        }
        self.next();

        if digits.is_empty() {
            return Ok(Part::Seq(Selector::Any));
        }

        let index = digits
            .parse::<usize>()
            .map_err(|_| PathError::IndexOverflow {
                expression: self.input.clone(),
                digits: digits.clone(),
            })?;
        Ok(Part::Seq(Selector::Concrete(index)))
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

impl std::str::FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::parse(s)
    }
}
