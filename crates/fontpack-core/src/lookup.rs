//! Compiles the pack catalog into variant records.
//!
//! Every pack becomes an ordered list of [`VariantRecord`]s, one per prop
//! group. A record maps structured keys to strings:
//!
//! ```text
//! family:<slug>        -> "Roboto, Arial, sans-serif"
//! <axis>:<token>       -> resolved literal value   (weight:light -> 300)
//! reverse:<token>      -> axis name                (reverse:light -> weight)
//! ```
//!
//! A pack without prop groups compiles to a single record holding only the
//! family key.

use crate::config::{Pack, Packs, PropGroup};
use crate::errors::FontPackError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Key of a [`VariantRecord`] entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKey {
    /// `family:<slug>`; the value is the joined family list.
    Family(String),
    /// `<axis>:<token>`; the value is the literal the token resolves to.
    Axis { axis: String, token: String },
    /// `reverse:<token>`; the value is the axis the token belongs to.
    Reverse(String),
}

impl RecordKey {
    pub fn family(slug: impl Into<String>) -> Self {
        RecordKey::Family(slug.into())
    }

    pub fn axis(axis: impl Into<String>, token: impl Into<String>) -> Self {
        RecordKey::Axis {
            axis: axis.into(),
            token: token.into(),
        }
    }

    pub fn reverse(token: impl Into<String>) -> Self {
        RecordKey::Reverse(token.into())
    }

    /// The `(axis, token)` view of a matching key; `None` for reverse keys.
    pub fn constraint(&self) -> Option<(&str, &str)> {
        match self {
            RecordKey::Family(slug) => Some(("family", slug.as_str())),
            RecordKey::Axis { axis, token } => Some((axis.as_str(), token.as_str())),
            RecordKey::Reverse(_) => None,
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKey::Family(slug) => write!(f, "family:{}", slug),
            RecordKey::Axis { axis, token } => write!(f, "{}:{}", axis, token),
            RecordKey::Reverse(token) => write!(f, "reverse:{}", token),
        }
    }
}

/// One alternative combination of axis values within a pack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantRecord {
    entries: BTreeMap<RecordKey, String>,
}

impl VariantRecord {
    fn with_family(slug: &str, family: String) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(RecordKey::family(slug), family);
        Self { entries }
    }

    pub fn get(&self, key: &RecordKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The joined family string.
    pub fn family(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, RecordKey::Family(_)))
            .map(|(_, v)| v.as_str())
    }

    /// Resolve a written token against `axis`. The `family` axis resolves a
    /// pack slug to the joined family string.
    pub fn resolve(&self, axis: &str, token: &str) -> Option<&str> {
        if axis == "family" {
            return self.get(&RecordKey::family(token));
        }
        self.get(&RecordKey::axis(axis, token))
    }

    /// The axis a bare shorthand token belongs to.
    pub fn reverse(&self, token: &str) -> Option<&str> {
        self.get(&RecordKey::reverse(token))
    }

    pub fn contains_axis(&self, axis: &str, token: &str) -> bool {
        self.resolve(axis, token).is_some()
    }

    /// `(axis, token)` pairs a rule must agree with for this record to match.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.keys().filter_map(RecordKey::constraint)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for VariantRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

/// Variant records of every pack, keyed by slug. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct LookupTable {
    packs: BTreeMap<String, Vec<VariantRecord>>,
}

impl LookupTable {
    pub fn build(packs: &Packs) -> Result<Self, FontPackError> {
        let mut table = BTreeMap::new();
        for (slug, pack) in packs {
            table.insert(slug.clone(), compile_pack(slug, pack)?);
        }

        let lookup = Self { packs: table };
        tracing::debug!(
            packs = lookup.packs.len(),
            variants = lookup.variant_count(),
            "built font pack lookup table"
        );
        Ok(lookup)
    }

    /// Variant records of the pack named `slug`.
    pub fn candidates(&self, slug: &str) -> Option<&[VariantRecord]> {
        self.packs.get(slug).map(Vec::as_slice)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.packs.keys().map(String::as_str)
    }

    pub fn pack_count(&self) -> usize {
        self.packs.len()
    }

    pub fn variant_count(&self) -> usize {
        self.packs.values().map(Vec::len).sum()
    }
}

fn compile_pack(slug: &str, pack: &Pack) -> Result<Vec<VariantRecord>, FontPackError> {
    let family = pack
        .family
        .as_ref()
        .ok_or_else(|| FontPackError::config("missing required pack.family"))?;
    if family.is_empty() {
        return Err(FontPackError::config("pack.family is empty"));
    }
    let family = family.join(", ");

    let groups = match &pack.prop_groups {
        Some(groups) if !groups.is_empty() => groups,
        _ => return Ok(vec![VariantRecord::with_family(slug, family)]),
    };

    groups
        .iter()
        .map(|group| compile_group(slug, &family, group))
        .collect()
}

fn compile_group(
    slug: &str,
    family: &str,
    group: &PropGroup,
) -> Result<VariantRecord, FontPackError> {
    let mut record = VariantRecord::with_family(slug, family.to_string());
    for (axis, value) in group {
        let (token, resolved) = split_prop_value(value)?;
        record
            .entries
            .insert(RecordKey::axis(axis.as_str(), token.as_str()), resolved);
        record
            .entries
            .insert(RecordKey::reverse(token), axis.clone());
    }
    Ok(record)
}

/// Split a prop group value into `(public token, resolved value)`.
///
/// A scalar is its own alias; a pair is `[alias, resolved]`.
fn split_prop_value(value: &serde_json::Value) -> Result<(String, String), FontPackError> {
    if let Some(scalar) = scalar_to_string(value) {
        return Ok((scalar.clone(), scalar));
    }

    match value {
        serde_json::Value::Array(items) => match items.as_slice() {
            [alias, resolved] => match (scalar_to_string(alias), scalar_to_string(resolved)) {
                (Some(alias), Some(resolved)) => Ok((alias, resolved)),
                _ => Err(not_a_prop_value()),
            },
            _ => Err(not_a_prop_value()),
        },
        _ => Err(not_a_prop_value()),
    }
}

fn not_a_prop_value() -> FontPackError {
    FontPackError::type_mismatch("prop value expects string, number or array")
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(number_to_string(n)),
        _ => None,
    }
}

/// Whole floats render in integer form, so `300.0` matches a written `300`.
fn number_to_string(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}
