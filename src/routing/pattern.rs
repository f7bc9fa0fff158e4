//! Route path pattern parser.
//!
//! # Grammar
//! ```text
//! pattern  := (literal | variable | group)*
//! group    := '(' pattern ')'
//! variable := (':' | '*') word
//! word     := [A-Za-z0-9_]+
//! ```
//!
//! A `:` or `*` not followed by a word character is literal text.
//! Groups nest to any depth and mark their contents as optional.

use serde::{Deserialize, Serialize};

use crate::routing::types::{RoutingError, RoutingResult};

/// Kind of route variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarKind {
    /// `:name`, a single path component.
    Segment,
    /// `*name`, may span slashes.
    Wildcard,
}

impl VarKind {
    pub fn sigil(self) -> char {
        match self {
            VarKind::Segment => ':',
            VarKind::Wildcard => '*',
        }
    }

    fn from_sigil(c: char) -> Option<Self> {
        match c {
            ':' => Some(VarKind::Segment),
            '*' => Some(VarKind::Wildcard),
            _ => None,
        }
    }
}

/// One node of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Literal { text: String },
    Variable { kind: VarKind, name: String },
    Optional { segments: Vec<Segment> },
}

/// A variable occurrence found while walking a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarRef<'a> {
    pub kind: VarKind,
    pub name: &'a str,
    pub optional: bool,
}

/// Parsed route path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parse a (normalized) route path.
    pub fn parse(path: &str) -> RoutingResult<Self> {
        let mut parser = Parser {
            path,
            chars: path.char_indices().peekable(),
        };
        let segments = parser.sequence(0)?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Variables in left-to-right order, descending into groups.
    pub fn variables(&self) -> Vec<VarRef<'_>> {
        let mut out = Vec::new();
        collect_vars(&self.segments, false, &mut out);
        out
    }
}

fn collect_vars<'a>(segments: &'a [Segment], optional: bool, out: &mut Vec<VarRef<'a>>) {
    for segment in segments {
        match segment {
            Segment::Literal { .. } => {}
            Segment::Variable { kind, name } => out.push(VarRef {
                kind: *kind,
                name,
                optional,
            }),
            Segment::Optional { segments } => collect_vars(segments, true, out),
        }
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Parser<'a> {
    path: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn sequence(&mut self, depth: usize) -> RoutingResult<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut literal = String::new();

        while let Some((pos, c)) = self.chars.next() {
            match c {
                '(' => {
                    flush(&mut literal, &mut segments);
                    let inner = self.sequence(depth + 1)?;
                    segments.push(Segment::Optional { segments: inner });
                }
                ')' => {
                    if depth == 0 {
                        return Err(self.malformed(format!("unexpected ')' at byte {}", pos)));
                    }
                    flush(&mut literal, &mut segments);
                    return Ok(segments);
                }
                ':' | '*' if self.chars.peek().is_some_and(|(_, next)| is_word(*next)) => {
                    flush(&mut literal, &mut segments);
                    let mut name = String::new();
                    while let Some((_, next)) = self.chars.peek() {
                        if !is_word(*next) {
                            break;
                        }
                        name.push(*next);
                        self.chars.next();
                    }
                    if let Some(kind) = VarKind::from_sigil(c) {
                        segments.push(Segment::Variable { kind, name });
                    }
                }
                _ => literal.push(c),
            }
        }

        if depth > 0 {
            return Err(self.malformed("unclosed '('".to_string()));
        }
        flush(&mut literal, &mut segments);
        Ok(segments)
    }

    fn malformed(&self, reason: String) -> RoutingError {
        RoutingError::MalformedPattern {
            path: self.path.to_string(),
            reason,
        }
    }
}

fn flush(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal {
            text: std::mem::take(literal),
        });
    }
}
