//! Error taxonomy for loading configuration, parsing stylesheets and
//! resolving font packs.

use crate::position::Position;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of a [`FontPackError`], for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    TypeMismatch,
    Syntax,
    Lookup,
    Ambiguity,
    Directive,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Config => write!(f, "config"),
            ErrorKind::TypeMismatch => write!(f, "type_mismatch"),
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::Lookup => write!(f, "lookup"),
            ErrorKind::Ambiguity => write!(f, "ambiguity"),
            ErrorKind::Directive => write!(f, "directive"),
        }
    }
}

/// A fatal failure of the font pack transform.
///
/// Every message carries the `[postcss-font-pack]` prefix. Variants raised
/// against a declaration or comment also carry its start position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontPackError {
    #[error("[postcss-font-pack] {0}")]
    Config(String),

    #[error("[postcss-font-pack] {0}")]
    TypeMismatch(String),

    #[error("[postcss-font-pack] {}{message}", at(.position))]
    Syntax {
        message: String,
        position: Option<Position>,
    },

    #[error("[postcss-font-pack] {}{message}", at(.position))]
    Lookup {
        message: String,
        position: Option<Position>,
    },

    #[error("[postcss-font-pack] {0}")]
    Ambiguity(String),

    #[error("[postcss-font-pack] {}{message}", at(.position))]
    Directive {
        message: String,
        position: Option<Position>,
    },
}

fn at(position: &Option<Position>) -> String {
    match position {
        Some(p) => format!("{}: ", p),
        None => String::new(),
    }
}

impl FontPackError {
    pub fn config(message: impl Into<String>) -> Self {
        FontPackError::Config(message.into())
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        FontPackError::TypeMismatch(message.into())
    }

    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        FontPackError::Syntax {
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn lookup(message: impl Into<String>, position: Option<Position>) -> Self {
        FontPackError::Lookup {
            message: message.into(),
            position,
        }
    }

    /// The "pack not found" lookup failure, raised at every narrowing step.
    pub fn pack_not_found(position: Option<Position>) -> Self {
        Self::lookup("pack not found", position)
    }

    pub fn ambiguity(message: impl Into<String>) -> Self {
        FontPackError::Ambiguity(message.into())
    }

    pub fn directive(message: impl Into<String>, position: Position) -> Self {
        FontPackError::Directive {
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FontPackError::Config(_) => ErrorKind::Config,
            FontPackError::TypeMismatch(_) => ErrorKind::TypeMismatch,
            FontPackError::Syntax { .. } => ErrorKind::Syntax,
            FontPackError::Lookup { .. } => ErrorKind::Lookup,
            FontPackError::Ambiguity(_) => ErrorKind::Ambiguity,
            FontPackError::Directive { .. } => ErrorKind::Directive,
        }
    }

    /// Message text without prefix or position.
    pub fn message(&self) -> &str {
        match self {
            FontPackError::Config(m)
            | FontPackError::TypeMismatch(m)
            | FontPackError::Ambiguity(m) => m,
            FontPackError::Syntax { message, .. }
            | FontPackError::Lookup { message, .. }
            | FontPackError::Directive { message, .. } => message,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            FontPackError::Syntax { position, .. }
            | FontPackError::Lookup { position, .. }
            | FontPackError::Directive { position, .. } => *position,
            _ => None,
        }
    }
}

/// Failure to read or decode a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML: {message}")]
    Yaml { message: String },

    #[error("Failed to parse config JSON: {message}")]
    Json { message: String },

    #[error("Unsupported config format '{path}' (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },
}

/// Failure to parse stylesheet source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StylesheetError {
    #[error("{position}: unclosed comment")]
    UnclosedComment { position: Position },

    #[error("{position}: unclosed block")]
    UnclosedBlock { position: Position },

    #[error("{position}: unclosed string")]
    UnclosedString { position: Position },

    #[error("{position}: unexpected '}}'")]
    UnexpectedClose { position: Position },

    #[error("{position}: unknown word '{word}'")]
    UnknownWord { word: String, position: Position },
}

impl StylesheetError {
    pub fn position(&self) -> Position {
        match self {
            StylesheetError::UnclosedComment { position }
            | StylesheetError::UnclosedBlock { position }
            | StylesheetError::UnclosedString { position }
            | StylesheetError::UnexpectedClose { position }
            | StylesheetError::UnknownWord { position, .. } => *position,
        }
    }
}

/// Failure of the text-in, text-out convenience path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("stylesheet parse error: {0}")]
    Parse(#[from] StylesheetError),

    #[error(transparent)]
    FontPack(#[from] FontPackError),
}
