//! Errors that abort a whole declaration or annotation call.
//!
//! Per-construct problems (unparsable doc comments, untranslatable types)
//! are not errors; they degrade to undocumented or untyped output.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A documented construct whose ancestors never yield a name.
    #[error("cannot resolve a name for documented {kind} at line {line}")]
    UnresolvableName { kind: String, line: usize },

    /// A name path uses the segment reserved for tree bookkeeping.
    #[error("name path `{path}` uses the reserved segment `meta`")]
    ReservedSegmentCollision { path: String },

    #[error("failed to load JavaScript grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("JavaScript parser produced no tree")]
    ParseFailed,

    #[error("unknown format: {0}. Use dts or json")]
    UnknownFormat(String),

    #[error("invalid enum rename pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to serialize declaration tree: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
