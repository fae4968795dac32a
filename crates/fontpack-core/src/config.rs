//! Plugin options and the font pack catalog.
//!
//! Options are decoded from YAML or JSON. Decoding is lenient: unknown fields
//! are reported with a warning, and structural validation of the catalog is
//! left to [`crate::lookup::LookupTable::build`] so that every catalog problem
//! surfaces as a [`crate::FontPackError`].

use crate::errors::ConfigLoadError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Catalog of packs keyed by slug.
pub type Packs = BTreeMap<String, Pack>;

/// Plugin options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// When true, a rule with font declarations but without a font size fails.
    #[serde(default)]
    pub require_size: bool,

    /// Supported font packs.
    #[serde(default)]
    pub packs: Option<Packs>,
}

/// A named font family stack plus its supported property combinations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pack {
    #[serde(default)]
    pub family: Option<Vec<String>>,

    #[serde(default)]
    pub prop_groups: Option<Vec<PropGroup>>,
}

/// One supported combination of axis values, e.g.
/// `{ weight: [light, 300], style: italic }`.
///
/// Values stay raw here; the lookup builder classifies them as scalar or
/// `[alias, value]` pair.
pub type PropGroup = BTreeMap<String, serde_json::Value>;

impl Options {
    pub fn new(packs: Packs) -> Self {
        Self {
            require_size: false,
            packs: Some(packs),
        }
    }

    pub fn with_require_size(mut self, require_size: bool) -> Self {
        self.require_size = require_size;
        self
    }

    /// Load options from a `.yaml`, `.yml` or `.json` file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(ConfigLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigLoadError> {
        let de = serde_yaml::Deserializer::from_str(content);
        let mut ignored = Vec::new();
        let options: Options = serde_ignored::deserialize(de, |path| {
            ignored.push(path.to_string());
        })
        .map_err(|e| ConfigLoadError::Yaml {
            message: e.to_string(),
        })?;
        warn_ignored(&ignored);
        Ok(options)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigLoadError> {
        let mut de = serde_json::Deserializer::from_str(content);
        let mut ignored = Vec::new();
        let options: Options = serde_ignored::deserialize(&mut de, |path| {
            ignored.push(path.to_string());
        })
        .map_err(|e| ConfigLoadError::Json {
            message: e.to_string(),
        })?;
        de.end().map_err(|e| ConfigLoadError::Json {
            message: e.to_string(),
        })?;
        warn_ignored(&ignored);
        Ok(options)
    }
}

fn warn_ignored(paths: &[String]) {
    for path in paths {
        tracing::warn!(field = %path, "ignoring unknown config field");
    }
}
