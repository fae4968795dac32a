//! Minimal lossless stylesheet tree.
//!
//! The tree keeps every byte of the input in node raws, so an
//! unmodified sheet prints back identically. Only what the font pack transform
//! needs is modelled: rules, at-rules, declarations and comments with source
//! spans.

mod parser;

use crate::errors::StylesheetError;
use crate::position::Span;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
    /// Trailing whitespace after the last node.
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
    Comment(Comment),
}

/// A qualified rule: `selector { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<Node>,
    pub span: Span,
    pub(crate) before: String,
    pub(crate) between: String,
    pub(crate) after: String,
}

/// `@name params;` or `@name params { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    pub name: String,
    /// Raw text between the name and the block or semicolon.
    pub params: String,
    pub nodes: Option<Vec<Node>>,
    pub span: Span,
    pub(crate) before: String,
    pub(crate) after: String,
    pub(crate) semicolon: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub prop: String,
    /// Value without surrounding whitespace, comments and `!important`.
    pub value: String,
    /// Raw `!important` suffix including the whitespace before it, if any.
    pub important: Option<String>,
    pub span: Span,
    pub(crate) before: String,
    pub(crate) between: String,
    pub(crate) after: String,
    pub(crate) semicolon: bool,
    pub(crate) raw_value: Option<RawValue>,
}

/// Source text of a value that contained comments, printed instead of
/// `value` for as long as `value` is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawValue {
    pub(crate) value: String,
    pub(crate) raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Body without delimiters and surrounding whitespace.
    pub text: String,
    pub span: Span,
    pub(crate) before: String,
    pub(crate) left: String,
    pub(crate) right: String,
}

impl Stylesheet {
    pub fn parse(source: &str) -> Result<Self, StylesheetError> {
        parser::parse(source)
    }

    /// Every comment in document order, including comments inside blocks.
    pub fn comments(&self) -> Vec<&Comment> {
        let mut out = Vec::new();
        collect_comments(&self.nodes, &mut out);
        out
    }

    /// Visit every rule in document order, parents before their nested
    /// rules. Stops at the first error.
    pub fn try_for_each_rule_mut<E, F>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&mut Rule) -> Result<(), E>,
    {
        visit_rules_mut(&mut self.nodes, &mut f)
    }

    pub fn rules(&self) -> Vec<&Rule> {
        let mut out = Vec::new();
        collect_rules(&self.nodes, &mut out);
        out
    }
}

impl Rule {
    /// Direct child declarations in document order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Declaration(decl) => Some(decl),
            _ => None,
        })
    }
}

fn collect_comments<'a>(nodes: &'a [Node], out: &mut Vec<&'a Comment>) {
    for node in nodes {
        match node {
            Node::Comment(comment) => out.push(comment),
            Node::Rule(rule) => collect_comments(&rule.nodes, out),
            Node::AtRule(at) => {
                if let Some(children) = &at.nodes {
                    collect_comments(children, out);
                }
            }
            Node::Declaration(_) => {}
        }
    }
}

fn collect_rules<'a>(nodes: &'a [Node], out: &mut Vec<&'a Rule>) {
    for node in nodes {
        match node {
            Node::Rule(rule) => {
                out.push(rule);
                collect_rules(&rule.nodes, out);
            }
            Node::AtRule(at) => {
                if let Some(children) = &at.nodes {
                    collect_rules(children, out);
                }
            }
            _ => {}
        }
    }
}

fn visit_rules_mut<E, F>(nodes: &mut [Node], f: &mut F) -> Result<(), E>
where
    F: FnMut(&mut Rule) -> Result<(), E>,
{
    for node in nodes {
        match node {
            Node::Rule(rule) => {
                f(rule)?;
                visit_rules_mut(&mut rule.nodes, f)?;
            }
            Node::AtRule(at) => {
                if let Some(children) = &mut at.nodes {
                    visit_rules_mut(children, f)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

impl Declaration {
    fn printed_value(&self) -> &str {
        match &self.raw_value {
            Some(raw) if raw.value == self.value => &raw.raw,
            _ => &self.value,
        }
    }
}

impl std::fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for node in &self.nodes {
            write!(f, "{}", node)?;
        }
        f.write_str(&self.after)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Rule(rule) => {
                write!(f, "{}{}{}{{", rule.before, rule.selector, rule.between)?;
                for child in &rule.nodes {
                    write!(f, "{}", child)?;
                }
                write!(f, "{}}}", rule.after)
            }
            Node::AtRule(at) => {
                write!(f, "{}@{}{}", at.before, at.name, at.params)?;
                match &at.nodes {
                    Some(children) => {
                        f.write_str("{")?;
                        for child in children {
                            write!(f, "{}", child)?;
                        }
                        write!(f, "{}}}", at.after)
                    }
                    None if at.semicolon => f.write_str(";"),
                    None => Ok(()),
                }
            }
            Node::Declaration(decl) => {
                write!(
                    f,
                    "{}{}{}{}{}{}",
                    decl.before,
                    decl.prop,
                    decl.between,
                    decl.printed_value(),
                    decl.important.as_deref().unwrap_or(""),
                    decl.after
                )?;
                if decl.semicolon {
                    f.write_str(";")?;
                }
                Ok(())
            }
            Node::Comment(comment) => write!(
                f,
                "{}/*{}{}{}*/",
                comment.before, comment.left, comment.text, comment.right
            ),
        }
    }
}
