//! Resolve symbolic font pack references in stylesheets.
//!
//! A configuration names a set of font packs, each a family stack plus the
//! weight, style, variant and stretch combinations it supports. Stylesheets
//! refer to a pack by slug (`font-family: roboto`) and to variants by alias
//! (`font-weight: light`); [`FontPack`] rewrites those references to concrete
//! values and rejects combinations the pack does not cover.
//!
//! ```no_run
//! use fontpack_core::{FontPack, Options};
//!
//! let options = Options::from_yaml(
//!     "packs:\n  roboto:\n    family: [Roboto, Arial, sans-serif]\n",
//! )?;
//! let fontpack = FontPack::new(Some(&options))?;
//! let css = fontpack.process_css("body{font-family:roboto}")?;
//! assert_eq!(css, "body{font-family:Roboto, Arial, sans-serif}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod errors;
pub mod ignore;
pub mod lookup;
pub mod position;
pub mod resolve;
pub mod rewrite;
pub mod shorthand;
pub mod stylesheet;
pub mod transform;

/// Tool name used as the error prefix and in directive comments.
pub const PLUGIN_NAME: &str = "postcss-font-pack";

pub use config::{Options, Pack, Packs, PropGroup};
pub use errors::{ConfigLoadError, ErrorKind, FontPackError, StylesheetError, TransformError};
pub use lookup::{LookupTable, RecordKey, VariantRecord};
pub use position::{Position, Span};
pub use stylesheet::Stylesheet;
pub use transform::{transform, FontPack};
