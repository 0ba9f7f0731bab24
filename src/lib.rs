//! dtsdoc: generate ambient TypeScript declarations from JSDoc-annotated
//! JavaScript.
//!
//! Two modes:
//!
//! - **declaration**: documented functions, methods and `@enum` objects are
//!   collected into a namespace/class tree and rendered as `declare ...`
//!   blocks (or dumped as JSON).
//! - **inline**: the source is returned with `/* : T*/` comments inserted
//!   after typed parameters and at the start of function bodies.
//!
//! ```no_run
//! let dts = dtsdoc::declare("/** @param {string} s */ function f(s) {}")?;
//! assert_eq!(dts, "declare function f(s: string): void;\n");
//! # Ok::<(), dtsdoc::Error>(())
//! ```

pub mod annotate;
pub mod error;
pub mod locate;
pub mod model;
pub mod names;
pub mod parser;
pub mod render;
pub mod translate;
pub mod tree;

pub use error::{Error, Result};
pub use model::{DeclKind, DeclNode, Leaf, ParamSig};

use parser::source::SourceTree;

/// Output mode of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Declaration,
    Inline,
}

/// Build the declaration tree for `src`.
pub fn build_tree(src: &str) -> Result<DeclNode> {
    let tree = SourceTree::parse(src)?;
    tree::build(&tree)
}

/// Render ambient declarations for `src`.
pub fn declare(src: &str) -> Result<String> {
    run(src, Mode::Declaration, "dts")
}

/// Rewrite `src` with inline type comments.
pub fn annotate(src: &str) -> Result<String> {
    let tree = SourceTree::parse(src)?;
    annotate::annotate_source(&tree)
}

/// Run one source through the pipeline. `format` names a renderer and is
/// ignored in inline mode.
pub fn run(src: &str, mode: Mode, format: &str) -> Result<String> {
    match mode {
        Mode::Inline => annotate(src),
        Mode::Declaration => {
            let renderer = render::create_renderer(format)?;
            renderer.render(&build_tree(src)?)
        }
    }
}
