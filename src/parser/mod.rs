//! Parser module: the JavaScript source layer and the doc-comment grammar.

pub mod jsdoc;
pub mod source;
pub mod type_expr;

use std::path::Path;

/// File extensions recognized as JavaScript sources.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx"];

/// Whether `path` names a JavaScript source by extension.
pub fn is_javascript(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}
