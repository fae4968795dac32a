//! Per-rule resolution of font declarations against the lookup table.
//!
//! A rule is scanned in three passes, each in document order:
//!
//! 1. `font` and `font-family` select the candidate records of a pack,
//! 2. `font-weight`, `font-style`, `font-variant`, `font-stretch` filter them,
//! 3. `font-size` only marks the size as provided.
//!
//! The surviving candidates are then narrowed to records whose every
//! `axis:token` key agrees with what the rule wrote. Exactly one must remain.

use crate::errors::FontPackError;
use crate::ignore::IgnoreZones;
use crate::lookup::{LookupTable, VariantRecord};
use crate::shorthand::FontShorthand;
use crate::stylesheet::{Declaration, Node, Rule};
use std::collections::BTreeMap;

const LONGHAND_AXES: [&str; 4] = ["weight", "style", "variant", "stretch"];

/// Tokens written by the `font` shorthand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShorthandConstraint {
    pub family: String,
    pub size_line_height: String,
    /// `(axis, token)` in the order the axes were first written.
    pub axes: Vec<(String, String)>,
}

/// What a rule asked for, keyed by axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    /// Longhand declarations: `family` / `weight` / ... to the written token.
    pub longhand: BTreeMap<String, String>,
    pub shorthand: Option<ShorthandConstraint>,
}

impl ConstraintSet {
    /// The token written for `axis`, preferring longhand declarations over
    /// the shorthand.
    pub fn value_for(&self, axis: &str) -> Option<&str> {
        if let Some(token) = self.longhand.get(axis) {
            return Some(token);
        }
        let font = self.shorthand.as_ref()?;
        if axis == "family" {
            return Some(&font.family);
        }
        font.axes
            .iter()
            .find(|(a, _)| a == axis)
            .map(|(_, token)| token.as_str())
    }

    /// Whether `record` agrees with every constraint it declares.
    pub fn admits(&self, record: &VariantRecord) -> bool {
        record
            .constraints()
            .all(|(axis, token)| self.value_for(axis) == Some(token))
    }
}

/// A declaration whose value will be rewritten, by index into `rule.nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contribution {
    Shorthand { index: usize, font: FontShorthand },
    Longhand { index: usize, axis: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRule<'t> {
    pub record: &'t VariantRecord,
    pub constraints: ConstraintSet,
    pub contributions: Vec<Contribution>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'t> {
    /// The rule has no font declarations to process.
    Silent,
    Resolved(ResolvedRule<'t>),
}

/// Resolution state of one rule. Created per rule and dropped with it.
struct RuleContext<'t> {
    lookup: &'t LookupTable,
    constraints: ConstraintSet,
    candidates: Vec<&'t VariantRecord>,
    declaration_count: usize,
    size_provided: bool,
    contributions: Vec<Contribution>,
}

impl<'t> RuleContext<'t> {
    fn new(lookup: &'t LookupTable) -> Self {
        Self {
            lookup,
            constraints: ConstraintSet::default(),
            candidates: Vec::new(),
            declaration_count: 0,
            size_provided: false,
            contributions: Vec::new(),
        }
    }

    fn select_pack(&mut self, slug: &str) {
        self.candidates = self
            .lookup
            .candidates(slug)
            .map(|records| records.iter().collect())
            .unwrap_or_default();
    }

    fn ensure_candidates(&self, decl: &Declaration) -> Result<(), FontPackError> {
        if self.candidates.is_empty() {
            return Err(FontPackError::pack_not_found(Some(decl.span.start)));
        }
        Ok(())
    }

    fn apply_shorthand(&mut self, index: usize, decl: &Declaration) -> Result<(), FontPackError> {
        let font = FontShorthand::parse(&decl.value).ok_or_else(|| {
            FontPackError::syntax("font property requires size and family", decl.span.start)
        })?;
        self.declaration_count += font.token_count();
        self.size_provided = true;

        self.select_pack(&font.family);
        let mut axes = Vec::new();
        for token in &font.modifiers {
            self.candidates.retain(|record| match record.reverse(token) {
                Some(axis) => {
                    assign_axis(&mut axes, axis, token);
                    true
                }
                None => false,
            });
        }
        self.ensure_candidates(decl)?;

        self.constraints.shorthand = Some(ShorthandConstraint {
            family: font.family.clone(),
            size_line_height: font.size_line_height.clone(),
            axes,
        });
        self.contributions
            .push(Contribution::Shorthand { index, font });
        Ok(())
    }

    fn apply_longhand(
        &mut self,
        index: usize,
        axis: &str,
        decl: &Declaration,
    ) -> Result<(), FontPackError> {
        self.declaration_count += 1;
        if axis == "family" {
            self.select_pack(&decl.value);
        } else {
            self.candidates
                .retain(|record| record.contains_axis(axis, &decl.value));
        }
        self.ensure_candidates(decl)?;

        self.constraints
            .longhand
            .insert(axis.to_string(), decl.value.clone());
        self.contributions.push(Contribution::Longhand {
            index,
            axis: axis.to_string(),
        });
        Ok(())
    }

    fn apply_size(&mut self) -> Result<(), FontPackError> {
        self.size_provided = true;
        self.declaration_count += 1;
        if self.declaration_count == 1 {
            return Err(FontPackError::config("font-size missing required family"));
        }
        Ok(())
    }
}

/// Record `axis = token`, keeping the position of an axis written earlier.
fn assign_axis(axes: &mut Vec<(String, String)>, axis: &str, token: &str) {
    match axes.iter_mut().find(|(a, _)| a == axis) {
        Some(entry) => entry.1 = token.to_string(),
        None => axes.push((axis.to_string(), token.to_string())),
    }
}

fn declarations(rule: &Rule) -> impl Iterator<Item = (usize, &Declaration)> {
    rule.nodes.iter().enumerate().filter_map(|(i, node)| match node {
        Node::Declaration(decl) => Some((i, decl)),
        _ => None,
    })
}

/// Resolve the font declarations of `rule` to a single variant record.
///
/// Ignore markers in `zones` are consumed as declarations are visited.
pub fn resolve_rule<'t>(
    lookup: &'t LookupTable,
    zones: &mut IgnoreZones,
    rule: &Rule,
    require_size: bool,
) -> Result<Resolution<'t>, FontPackError> {
    let mut ctx = RuleContext::new(lookup);

    let is_family_source = |d: &Declaration| d.prop == "font" || d.prop == "font-family";
    for (index, decl) in declarations(rule).filter(|&(_, d)| is_family_source(d)) {
        if skipped(zones, decl) {
            continue;
        }
        if decl.prop == "font" {
            ctx.apply_shorthand(index, decl)?;
        } else {
            ctx.apply_longhand(index, "family", decl)?;
        }
    }

    for (index, decl) in declarations(rule) {
        let Some(axis) = decl.prop.strip_prefix("font-") else {
            continue;
        };
        if !LONGHAND_AXES.contains(&axis) || skipped(zones, decl) {
            continue;
        }
        ctx.apply_longhand(index, axis, decl)?;
    }

    for (_, decl) in declarations(rule).filter(|(_, d)| d.prop == "font-size") {
        if skipped(zones, decl) {
            continue;
        }
        ctx.apply_size()?;
    }

    if ctx.declaration_count == 0 {
        return Ok(Resolution::Silent);
    }

    if require_size && !ctx.size_provided {
        return Err(FontPackError::config("missing required font-size"));
    }

    let constraints = ctx.constraints;
    let matches: Vec<&VariantRecord> = ctx
        .candidates
        .into_iter()
        .filter(|record| constraints.admits(record))
        .collect();

    let record = match matches.as_slice() {
        [record] => *record,
        [] => return Err(FontPackError::pack_not_found(Some(rule.span.start))),
        _ => return Err(FontPackError::ambiguity("more than one pack found")),
    };

    tracing::debug!(
        selector = %rule.selector,
        family = record.family().unwrap_or_default(),
        "resolved font pack"
    );

    Ok(Resolution::Resolved(ResolvedRule {
        record,
        constraints,
        contributions: ctx.contributions,
    }))
}

fn skipped(zones: &mut IgnoreZones, decl: &Declaration) -> bool {
    let claimed = zones.claims(&decl.span);
    if claimed {
        tracing::trace!(prop = %decl.prop, at = %decl.span.start, "declaration ignored by directive");
    }
    claimed
}
