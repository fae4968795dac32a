// Byte-cursor parser for the lossless stylesheet tree.

use super::{AtRule, Comment, Declaration, Node, RawValue, Rule, Stylesheet};
use crate::errors::StylesheetError;
use crate::position::{Position, Span};

pub(super) fn parse(source: &str) -> Result<Stylesheet, StylesheetError> {
    let mut parser = Parser::new(source);
    let (nodes, after) = parser.parse_nodes(None)?;
    Ok(Stylesheet { nodes, after })
}

/// Line start offsets, for turning byte offsets into 1-based positions.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(src: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(src.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn position(&self, src: &str, offset: usize) -> Position {
        let line = self.starts.partition_point(|&s| s <= offset);
        let line_start = self.starts[line - 1];
        let column = src[line_start..offset].chars().count() + 1;
        Position::new(line, column)
    }
}

/// What ended a statement scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Semicolon,
    Open,
    Close,
    Eof,
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    lines: LineIndex,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            lines: LineIndex::new(src),
        }
    }

    fn eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0)
    }

    fn position(&self, offset: usize) -> Position {
        self.lines.position(self.src, offset)
    }

    /// Offset of the last character ending before `end`.
    fn last_char_offset(&self, end: usize) -> usize {
        self.src[..end]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.position(start), self.position(self.last_char_offset(end)))
    }

    fn skip_whitespace(&mut self) {
        while !self.eof() && self.peek().is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Parse block contents (or the whole sheet when `open` is `None`) up to
    /// the closing brace, which is left for the caller.
    fn parse_nodes(&mut self, open: Option<usize>) -> Result<(Vec<Node>, String), StylesheetError> {
        let mut nodes = Vec::new();

        loop {
            let before_start = self.pos;
            loop {
                self.skip_whitespace();
                if self.peek() == b';' {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            let before = self.src[before_start..self.pos].to_string();

            if self.eof() {
                return match open {
                    Some(offset) => Err(StylesheetError::UnclosedBlock {
                        position: self.position(offset),
                    }),
                    None => Ok((nodes, before)),
                };
            }

            match self.peek() {
                b'}' => {
                    if open.is_some() {
                        return Ok((nodes, before));
                    }
                    return Err(StylesheetError::UnexpectedClose {
                        position: self.position(self.pos),
                    });
                }
                b'/' if self.peek_at(self.pos + 1) == b'*' => {
                    nodes.push(Node::Comment(self.parse_comment(before)?));
                }
                b'@' => nodes.push(Node::AtRule(self.parse_at_rule(before)?)),
                _ => {
                    let start = self.pos;
                    let (end, terminator) = self.scan_statement(start)?;
                    if terminator == Terminator::Open {
                        nodes.push(Node::Rule(self.parse_rule(before, start, end)?));
                    } else if open.is_some() {
                        nodes.push(Node::Declaration(self.parse_declaration(
                            before, start, end, terminator,
                        )?));
                    } else {
                        return Err(self.unknown_word(start, end));
                    }
                }
            }
        }
    }

    fn parse_comment(&mut self, before: String) -> Result<Comment, StylesheetError> {
        let src = self.src;
        let start = self.pos;
        let body_start = start + 2;
        let close = src[body_start..]
            .find("*/")
            .map(|i| body_start + i)
            .ok_or_else(|| StylesheetError::UnclosedComment {
                position: self.position(start),
            })?;
        self.pos = close + 2;

        let body = &src[body_start..close];
        let text = body.trim();
        let (left, right) = if text.is_empty() {
            (body.to_string(), String::new())
        } else {
            let left_len = body.len() - body.trim_start().len();
            let right_len = body.len() - body.trim_end().len();
            (
                body[..left_len].to_string(),
                body[body.len() - right_len..].to_string(),
            )
        };

        Ok(Comment {
            text: text.to_string(),
            span: self.span(start, self.pos),
            before,
            left,
            right,
        })
    }

    fn parse_rule(
        &mut self,
        before: String,
        start: usize,
        open: usize,
    ) -> Result<Rule, StylesheetError> {
        let src = self.src;
        let prelude = &src[start..open];
        let selector = prelude.trim_end();
        let between = prelude[selector.len()..].to_string();
        let selector = selector.to_string();

        self.pos = open + 1;
        let (nodes, after) = self.parse_nodes(Some(open))?;
        // parse_nodes only returns inside a block when it sees the close brace.
        self.pos += 1;

        Ok(Rule {
            selector,
            nodes,
            span: self.span(start, self.pos),
            before,
            between,
            after,
        })
    }

    fn parse_at_rule(&mut self, before: String) -> Result<AtRule, StylesheetError> {
        let start = self.pos;
        let mut name_end = start + 1;
        while name_end < self.bytes.len()
            && (self.bytes[name_end].is_ascii_alphanumeric()
                || matches!(self.bytes[name_end], b'-' | b'_'))
        {
            name_end += 1;
        }
        let name = self.src[start + 1..name_end].to_string();

        let (end, terminator) = self.scan_statement(name_end)?;
        let params = self.src[name_end..end].to_string();

        let (nodes, after, semicolon) = match terminator {
            Terminator::Open => {
                self.pos = end + 1;
                let (nodes, after) = self.parse_nodes(Some(end))?;
                self.pos += 1;
                (Some(nodes), after, false)
            }
            Terminator::Semicolon => {
                self.pos = end + 1;
                (None, String::new(), true)
            }
            Terminator::Close | Terminator::Eof => {
                self.pos = end;
                (None, String::new(), false)
            }
        };

        Ok(AtRule {
            name,
            params,
            nodes,
            span: self.span(start, self.pos.max(start + 1)),
            before,
            after,
            semicolon,
        })
    }

    fn parse_declaration(
        &mut self,
        before: String,
        start: usize,
        end: usize,
        terminator: Terminator,
    ) -> Result<Declaration, StylesheetError> {
        let src = self.src;
        let statement = &src[start..end];
        let colon = find_top_level(statement, b':').ok_or_else(|| self.unknown_word(start, end))?;

        let prop = statement[..colon].trim_end();
        if prop.is_empty() {
            return Err(self.unknown_word(start, end));
        }

        let rest = &statement[colon + 1..];
        let value_offset = colon + 1 + (rest.len() - rest.trim_start().len());
        let between = statement[prop.len()..value_offset].to_string();

        let region = &statement[value_offset..];
        let trimmed = region.trim_end();
        let after = region[trimmed.len()..].to_string();

        let (raw, important) = match split_important(trimmed) {
            Some(bang) => {
                let raw = trimmed[..bang].trim_end();
                (raw, Some(trimmed[raw.len()..].to_string()))
            }
            None => (trimmed, None),
        };
        let value = strip_comments(raw);
        let raw_value = (value != raw).then(|| RawValue {
            value: value.clone(),
            raw: raw.to_string(),
        });

        let content_end = start + value_offset + trimmed.len();
        let span = self.span(start, content_end.max(start + prop.len()));

        self.pos = match terminator {
            Terminator::Semicolon => end + 1,
            _ => end,
        };

        Ok(Declaration {
            prop: prop.to_string(),
            value,
            important,
            span,
            before,
            between,
            after,
            raw_value,
            semicolon: terminator == Terminator::Semicolon,
        })
    }

    /// Find the first `;`, `{` or `}` at nesting depth zero, outside strings
    /// and comments.
    fn scan_statement(&self, from: usize) -> Result<(usize, Terminator), StylesheetError> {
        let mut i = from;
        let mut depth = 0usize;

        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 1,
                quote @ (b'"' | b'\'') => {
                    let open = i;
                    i += 1;
                    loop {
                        match self.bytes.get(i).copied() {
                            None | Some(b'\n') => {
                                return Err(StylesheetError::UnclosedString {
                                    position: self.position(open),
                                })
                            }
                            Some(b'\\') => i += 1,
                            Some(b) if b == quote => break,
                            _ => {}
                        }
                        i += 1;
                    }
                }
                b'/' if self.peek_at(i + 1) == b'*' => {
                    let close = self.src[i + 2..].find("*/").ok_or_else(|| {
                        StylesheetError::UnclosedComment {
                            position: self.position(i),
                        }
                    })?;
                    i += close + 3;
                }
                b'(' | b'[' => depth += 1,
                b')' | b']' => depth = depth.saturating_sub(1),
                b';' if depth == 0 => return Ok((i, Terminator::Semicolon)),
                b'{' if depth == 0 => return Ok((i, Terminator::Open)),
                b'}' if depth == 0 => return Ok((i, Terminator::Close)),
                _ => {}
            }
            i += 1;
        }

        Ok((self.bytes.len(), Terminator::Eof))
    }

    fn unknown_word(&self, start: usize, end: usize) -> StylesheetError {
        let word = self.src[start..end]
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        StylesheetError::UnknownWord {
            word,
            position: self.position(start),
        }
    }
}

fn find_top_level(text: &str, needle: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) if b == b'\\' => i += 1,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' | b'[' => depth += 1,
                b')' | b']' => depth = depth.saturating_sub(1),
                _ if b == needle && depth == 0 => return Some(i),
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Drop comments that touch whitespace or either end of the value, then trim.
/// A comment glued between two tokens (`a/**/b`) stays.
fn strip_comments(raw: &str) -> String {
    if !raw.contains("/*") {
        return raw.to_string();
    }

    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut quote: Option<u8> = None;
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) if b == b'\\' => i += 1,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'\\' => i += 1,
            None if b == b'/' && bytes.get(i + 1) == Some(&b'*') => {
                let end = raw[i + 2..].find("*/").map_or(raw.len(), |close| i + close + 4);
                let spaced_before = i == 0 || bytes[i - 1].is_ascii_whitespace();
                let spaced_after = end >= raw.len() || bytes[end].is_ascii_whitespace();
                if spaced_before || spaced_after {
                    out.push_str(&raw[copied..i]);
                    copied = end;
                }
                i = end;
                continue;
            }
            None => {}
        }
        i += 1;
    }
    out.push_str(&raw[copied..]);
    out.trim().to_string()
}

/// Offset of the `!` of a trailing `!important` flag.
fn split_important(value: &str) -> Option<usize> {
    let bang = value.rfind('!')?;
    value[bang + 1..]
        .trim_start()
        .eq_ignore_ascii_case("important")
        .then_some(bang)
}
