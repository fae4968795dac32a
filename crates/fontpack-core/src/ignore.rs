//! Ignore directives embedded in stylesheet comments.
//!
//! ```css
//! /* postcss-font-pack: start-ignore */
//! body { font: not-a-pack; }
//! /* postcss-font-pack: end-ignore */
//!
//! /* postcss-font-pack: ignore-next */
//! body { font-family: left-alone; }
//! ```

use crate::errors::FontPackError;
use crate::position::{Position, Span};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::VecDeque;

lazy_static! {
    /// `<plugin>: <directive>`; the directive is lowercase letters and hyphens.
    static ref DIRECTIVE: Regex =
        Regex::new(&format!("^{}: ([a-z-]+)$", regex::escape(crate::PLUGIN_NAME))).unwrap();
}

/// Ranges and single-shot markers that exempt declarations from processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreZones {
    ranges: Vec<Span>,
    nexts: VecDeque<Position>,
}

impl IgnoreZones {
    /// Scan comments, given as `(text, span)` in document order, for
    /// directives. `text` is the comment body without delimiters.
    pub fn scan<'a, I>(comments: I) -> Result<Self, FontPackError>
    where
        I: IntoIterator<Item = (&'a str, Span)>,
    {
        let mut zones = IgnoreZones::default();
        let mut start: Option<Position> = None;

        for (text, span) in comments {
            let Some(directive) = parse_directive(text) else {
                continue;
            };

            match directive {
                "start-ignore" => {
                    if start.is_some() {
                        return Err(FontPackError::directive(
                            "start-ignore already defined",
                            span.start,
                        ));
                    }
                    start = Some(span.end);
                }
                "end-ignore" => {
                    let Some(open) = start.take() else {
                        return Err(FontPackError::directive(
                            "start-ignore not defined",
                            span.start,
                        ));
                    };
                    zones.ranges.push(Span::new(open, span.start));
                }
                "ignore-next" => {
                    if start.is_some() {
                        return Err(FontPackError::directive(
                            "Unnecessary ignore-next after start-ignore",
                            span.start,
                        ));
                    }
                    zones.nexts.push_back(span.end);
                }
                other => {
                    return Err(FontPackError::directive(
                        format!("Unsupported directive: {}", other),
                        span.start,
                    ));
                }
            }
        }

        Ok(zones)
    }

    /// Whether the declaration at `span` is exempt. A pending `ignore-next`
    /// marker at or before the declaration is consumed by this call.
    pub fn claims(&mut self, span: &Span) -> bool {
        if let Some(next) = self.nexts.front() {
            if span.start.is_at_or_after(next) {
                self.nexts.pop_front();
                return true;
            }
        }

        self.ranges.iter().any(|range| range.encloses(span))
    }

    #[cfg(test)]
    pub(crate) fn ranges(&self) -> &[Span] {
        &self.ranges
    }

    #[cfg(test)]
    pub(crate) fn pending_nexts(&self) -> usize {
        self.nexts.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.ranges.is_empty() && self.nexts.is_empty()
    }
}

fn parse_directive(text: &str) -> Option<&str> {
    DIRECTIVE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn span(l1: usize, c1: usize, l2: usize, c2: usize) -> Span {
        Span::new(Position::new(l1, c1), Position::new(l2, c2))
    }

    #[test]
    fn unrelated_comments_are_skipped() {
        let zones = IgnoreZones::scan([
            ("postcss-foo: bar", span(1, 1, 1, 22)),
            ("just a note", span(2, 1, 2, 15)),
            ("postcss-font-pack: Start-Ignore", span(3, 1, 3, 30)),
        ])
        .unwrap();
        assert!(zones.is_empty());
    }

    #[test]
    fn start_and_end_close_a_range() {
        let zones = IgnoreZones::scan([
            ("postcss-font-pack: start-ignore", span(1, 1, 1, 37)),
            ("postcss-font-pack: end-ignore", span(3, 1, 3, 35)),
        ])
        .unwrap();
        assert_eq!(zones.ranges(), &[span(1, 37, 3, 1)]);
        assert_eq!(zones.pending_nexts(), 0);
    }

    #[test]
    fn range_claims_enclosed_declarations() {
        let mut zones = IgnoreZones::scan([
            ("postcss-font-pack: start-ignore", span(1, 1, 1, 37)),
            ("postcss-font-pack: end-ignore", span(3, 1, 3, 35)),
        ])
        .unwrap();
        assert!(zones.claims(&span(2, 6, 2, 13)));
        assert!(zones.claims(&span(2, 6, 2, 13)));
        assert!(!zones.claims(&span(4, 6, 4, 13)));
    }

    #[test]
    fn ignore_next_is_consumed_once() {
        let mut zones =
            IgnoreZones::scan([("postcss-font-pack: ignore-next", span(1, 1, 1, 36))]).unwrap();
        assert_eq!(zones.pending_nexts(), 1);
        assert!(zones.claims(&span(1, 42, 1, 57)));
        assert!(!zones.claims(&span(1, 64, 1, 79)));
        assert_eq!(zones.pending_nexts(), 0);
    }

    #[test]
    fn ignore_next_waits_for_a_later_declaration() {
        let mut zones =
            IgnoreZones::scan([("postcss-font-pack: ignore-next", span(5, 1, 5, 36))]).unwrap();
        assert!(!zones.claims(&span(2, 1, 2, 10)));
        assert!(zones.claims(&span(6, 1, 6, 10)));
    }

    #[test]
    fn misordered_directives_fail() {
        let cases = [
            (
                vec!["postcss-font-pack: start-ignore", "postcss-font-pack: start-ignore"],
                "start-ignore already defined",
            ),
            (
                vec!["postcss-font-pack: start-ignore", "postcss-font-pack: ignore-next"],
                "Unnecessary ignore-next after start-ignore",
            ),
            (vec!["postcss-font-pack: end-ignore"], "start-ignore not defined"),
            (vec!["postcss-font-pack: foo-bar"], "Unsupported directive: foo-bar"),
        ];

        for (texts, expected) in cases {
            let comments = texts
                .iter()
                .enumerate()
                .map(|(i, t)| (*t, span(i + 1, 1, i + 1, 40)));
            let err = IgnoreZones::scan(comments).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Directive);
            assert_eq!(err.message(), expected);
        }
    }

    #[test]
    fn unterminated_start_produces_no_range() {
        let zones =
            IgnoreZones::scan([("postcss-font-pack: start-ignore", span(1, 1, 1, 37))]).unwrap();
        assert!(zones.is_empty());
    }
}
