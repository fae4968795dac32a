//! Parser for the `font` shorthand value.
//!
//! Grammar, over a whitespace-separated token list:
//!
//! ```text
//! font            = modifier* size-line-height family
//! size-line-height = <non-space> [ "/" <non-space> ]
//! family          = <non-space>          (a pack slug)
//! ```
//!
//! Modifiers are unlabeled; the resolver discovers their axis through the
//! `reverse:` keys of the candidate records.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SIZE_LINE_HEIGHT: Regex = Regex::new(r"^\S+(?:/\S+)?$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontShorthand {
    /// Leading tokens in written order.
    pub modifiers: Vec<String>,
    pub size_line_height: String,
    /// Pack slug.
    pub family: String,
}

impl FontShorthand {
    /// Parse a `font` value. `None` when the value lacks either a size or a
    /// family, or the size field is malformed.
    pub fn parse(value: &str) -> Option<Self> {
        let mut tokens = split_space(value);
        let family = tokens.pop()?;
        let size_line_height = tokens.pop()?;
        if !SIZE_LINE_HEIGHT.is_match(size_line_height) {
            return None;
        }

        Some(Self {
            modifiers: tokens.into_iter().map(str::to_string).collect(),
            size_line_height: size_line_height.to_string(),
            family: family.to_string(),
        })
    }

    pub fn token_count(&self) -> usize {
        self.modifiers.len() + 2
    }
}

/// Split a value on whitespace, keeping quoted strings and parenthesized
/// groups intact.
pub fn split_space(value: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start: Option<usize> = None;

    for (i, ch) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if let Some(q) = quote {
            if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\\' => {
                escaped = true;
                start.get_or_insert(i);
            }
            '"' | '\'' => {
                quote = Some(ch);
                start.get_or_insert(i);
            }
            '(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                start.get_or_insert(i);
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&value[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }

    if let Some(s) = start {
        tokens.push(&value[s..]);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_shorthand() {
        let font = FontShorthand::parse("light italic small-caps expanded 1rem/1.2 roboto").unwrap();
        assert_eq!(font.modifiers, ["light", "italic", "small-caps", "expanded"]);
        assert_eq!(font.size_line_height, "1rem/1.2");
        assert_eq!(font.family, "roboto");
        assert_eq!(font.token_count(), 6);
    }

    #[test]
    fn size_and_family_are_enough() {
        let font = FontShorthand::parse("  0   roboto ").unwrap();
        assert!(font.modifiers.is_empty());
        assert_eq!(font.size_line_height, "0");
        assert_eq!(font.family, "roboto");
    }

    #[test]
    fn rejects_missing_size_or_family() {
        assert_eq!(FontShorthand::parse("roboto"), None);
        assert_eq!(FontShorthand::parse("0"), None);
        assert_eq!(FontShorthand::parse(""), None);
    }

    #[test]
    fn rejects_size_field_with_inner_spaces() {
        assert_eq!(FontShorthand::parse("calc(1rem + 2px) roboto"), None);
    }

    #[test]
    fn fallback_lists_keep_the_last_token_as_family() {
        let font = FontShorthand::parse("0 roboto, Arial, sans-serif").unwrap();
        assert_eq!(font.family, "sans-serif");
        assert_eq!(font.size_line_height, "Arial,");
        assert_eq!(font.modifiers, ["0", "roboto,"]);
    }

    #[test]
    fn split_respects_quotes_and_parens() {
        assert_eq!(
            split_space(r#"bold "Open Sans" calc(1rem + 2px)"#),
            vec!["bold", r#""Open Sans""#, "calc(1rem + 2px)"]
        );
        assert_eq!(split_space("a\t b\nc"), vec!["a", "b", "c"]);
        assert!(split_space("   ").is_empty());
    }
}
