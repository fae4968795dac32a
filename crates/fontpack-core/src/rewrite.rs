//! Writes resolved literal values back into the rule.

use crate::errors::FontPackError;
use crate::lookup::VariantRecord;
use crate::resolve::{Contribution, ResolvedRule};
use crate::shorthand::FontShorthand;
use crate::stylesheet::{Node, Rule};

/// Rewrite every declaration that contributed to `resolved`.
///
/// New values are computed first and written only when all of them resolve,
/// so a failing rule is left as it was.
pub fn apply(rule: &mut Rule, resolved: &ResolvedRule<'_>) -> Result<(), FontPackError> {
    let mut updates = Vec::with_capacity(resolved.contributions.len());

    for contribution in &resolved.contributions {
        let (index, value) = match contribution {
            Contribution::Shorthand { index, font } => {
                (*index, shorthand_value(resolved.record, font))
            }
            Contribution::Longhand { index, axis } => {
                let written = match &rule.nodes[*index] {
                    Node::Declaration(decl) => decl.value.as_str(),
                    _ => continue,
                };
                (
                    *index,
                    resolved.record.resolve(axis, written).map(str::to_string),
                )
            }
        };

        let value = value.ok_or_else(|| {
            let position = match &rule.nodes[index] {
                Node::Declaration(decl) => Some(decl.span.start),
                _ => None,
            };
            FontPackError::pack_not_found(position)
        })?;
        updates.push((index, value));
    }

    for (index, value) in updates {
        if let Node::Declaration(decl) = &mut rule.nodes[index] {
            decl.value = value;
        }
    }
    Ok(())
}

/// `<resolved modifiers> <size/line-height> <family>`, with duplicate values
/// collapsed to their first occurrence.
fn shorthand_value(record: &VariantRecord, font: &FontShorthand) -> Option<String> {
    let mut axes: Vec<(&str, &str)> = Vec::new();
    for token in &font.modifiers {
        let axis = record.reverse(token)?;
        match axes.iter_mut().find(|(a, _)| *a == axis) {
            Some(entry) => entry.1 = token.as_str(),
            None => axes.push((axis, token.as_str())),
        }
    }

    let mut parts: Vec<&str> = Vec::with_capacity(axes.len() + 2);
    for (axis, token) in axes {
        parts.push(record.resolve(axis, token)?);
    }
    parts.push(&font.size_line_height);
    parts.push(record.resolve("family", &font.family)?);

    let mut unique: Vec<&str> = Vec::with_capacity(parts.len());
    for part in parts {
        if !unique.contains(&part) {
            unique.push(part);
        }
    }
    Some(unique.join(" "))
}
