//! Entry point: validated options plus the compiled lookup table, applied to
//! whole stylesheets.

use crate::config::Options;
use crate::errors::{FontPackError, TransformError};
use crate::ignore::IgnoreZones;
use crate::lookup::LookupTable;
use crate::resolve::{resolve_rule, Resolution};
use crate::rewrite;
use crate::stylesheet::Stylesheet;

/// A configured font pack transform. Holds no per-document state and can be
/// reused across stylesheets.
#[derive(Debug, Clone)]
pub struct FontPack {
    lookup: LookupTable,
    require_size: bool,
}

impl FontPack {
    /// Validate `options` and compile the lookup table.
    pub fn new(options: Option<&Options>) -> Result<Self, FontPackError> {
        let options =
            options.ok_or_else(|| FontPackError::config("missing required configuration"))?;
        let packs = options
            .packs
            .as_ref()
            .ok_or_else(|| FontPackError::config("missing required option: packs"))?;
        if packs.is_empty() {
            return Err(FontPackError::config("packs option has no keys"));
        }

        Ok(Self {
            lookup: LookupTable::build(packs)?,
            require_size: options.require_size,
        })
    }

    pub fn lookup(&self) -> &LookupTable {
        &self.lookup
    }

    pub fn require_size(&self) -> bool {
        self.require_size
    }

    /// Resolve and rewrite every rule of `sheet` in document order.
    ///
    /// Stops at the first error. Rules processed before the failing one keep
    /// their rewritten values.
    pub fn process(&self, sheet: &mut Stylesheet) -> Result<(), FontPackError> {
        let mut zones = IgnoreZones::scan(
            sheet
                .comments()
                .into_iter()
                .map(|comment| (comment.text.as_str(), comment.span)),
        )?;

        sheet.try_for_each_rule_mut(|rule| {
            match resolve_rule(&self.lookup, &mut zones, rule, self.require_size)? {
                Resolution::Silent => Ok(()),
                Resolution::Resolved(resolved) => rewrite::apply(rule, &resolved),
            }
        })
    }

    /// Parse `css`, process it and print the result.
    pub fn process_css(&self, css: &str) -> Result<String, TransformError> {
        let mut sheet = Stylesheet::parse(css)?;
        self.process(&mut sheet)?;
        Ok(sheet.to_string())
    }
}

/// Build a stylesheet processor from `options`.
///
/// Configuration errors are raised here, once, rather than per document.
pub fn transform(
    options: Option<&Options>,
) -> Result<impl Fn(&mut Stylesheet) -> Result<(), FontPackError>, FontPackError> {
    let fontpack = FontPack::new(options)?;
    Ok(move |sheet: &mut Stylesheet| fontpack.process(sheet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Pack, Packs};
    use crate::errors::ErrorKind;

    fn roboto() -> Options {
        let mut packs = Packs::new();
        packs.insert(
            "roboto".to_string(),
            Pack {
                family: Some(vec!["Roboto".into(), "Arial".into(), "sans-serif".into()]),
                prop_groups: None,
            },
        );
        Options::new(packs)
    }

    fn config_message(options: Option<&Options>) -> String {
        let err = FontPack::new(options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        err.message().to_string()
    }

    #[test]
    fn rejects_missing_or_empty_catalog() {
        assert_eq!(config_message(None), "missing required configuration");
        assert_eq!(
            config_message(Some(&Options::default())),
            "missing required option: packs"
        );
        assert_eq!(
            config_message(Some(&Options::new(Packs::new()))),
            "packs option has no keys"
        );
    }

    #[test]
    fn rejects_packs_without_family() {
        let mut packs = Packs::new();
        packs.insert("roboto".to_string(), Pack::default());
        assert_eq!(
            config_message(Some(&Options::new(packs))),
            "missing required pack.family"
        );

        let mut packs = Packs::new();
        packs.insert(
            "roboto".to_string(),
            Pack {
                family: Some(Vec::new()),
                prop_groups: None,
            },
        );
        assert_eq!(config_message(Some(&Options::new(packs))), "pack.family is empty");
    }

    #[test]
    fn processes_text() {
        let fontpack = FontPack::new(Some(&roboto())).unwrap();
        assert!(!fontpack.require_size());
        assert_eq!(fontpack.lookup().pack_count(), 1);
        assert_eq!(
            fontpack.process_css("body{font-family:roboto}").unwrap(),
            "body{font-family:Roboto, Arial, sans-serif}"
        );
    }

    #[test]
    fn parse_errors_are_reported_separately() {
        let fontpack = FontPack::new(Some(&roboto())).unwrap();
        assert!(matches!(
            fontpack.process_css("body{font-family:roboto"),
            Err(TransformError::Parse(_))
        ));
        assert!(matches!(
            fontpack.process_css("body{font-family:lato}"),
            Err(TransformError::FontPack(_))
        ));
    }

    #[test]
    fn processor_is_reusable_across_documents() {
        let process = transform(Some(&roboto())).unwrap();
        for _ in 0..2 {
            let mut sheet = Stylesheet::parse("/* postcss-font-pack: ignore-next */a{font-family:x}b{font-family:roboto}").unwrap();
            process(&mut sheet).unwrap();
            assert_eq!(
                sheet.to_string(),
                "/* postcss-font-pack: ignore-next */a{font-family:x}b{font-family:Roboto, Arial, sans-serif}"
            );
        }
    }

    #[test]
    fn errors_from_later_rules_keep_earlier_rewrites() {
        let fontpack = FontPack::new(Some(&roboto())).unwrap();
        let mut sheet = Stylesheet::parse("a{font-family:roboto}b{font-family:lato}").unwrap();
        let err = fontpack.process(&mut sheet).unwrap_err();
        assert_eq!(err.message(), "pack not found");
        assert_eq!(
            sheet.to_string(),
            "a{font-family:Roboto, Arial, sans-serif}b{font-family:lato}"
        );
    }
}
