//! Declaration tree builder.
//!
//! One pre-order traversal of the source; every located construct is
//! resolved to a name path and inserted into a nested [`DeclNode`] tree.
//! A `prototype` segment marks its owner as a class instead of creating a
//! child. A later construct on the same path replaces the earlier leaf.

use crate::error::{Error, Result};
use crate::locate::locate;
use crate::model::{Construct, DeclNode, EnumConstruct, FunctionConstruct, Leaf, ParamSig};
use crate::names::resolve_path;
use crate::parser::source::SourceTree;
use tracing::debug;

/// Segment name reserved for the `meta` record of the JSON tree dump.
pub const RESERVED_SEGMENT: &str = "meta";

const PROTOTYPE: &str = "prototype";

/// Build the declaration tree for a parsed source.
pub fn build(tree: &SourceTree<'_>) -> Result<DeclNode> {
    let mut builder = DeclBuilder::new();
    tree.for_each_node(|node| {
        if let Some(construct) = locate(tree, node) {
            builder.insert(tree, &construct)?;
        }
        Ok(())
    })?;
    Ok(builder.finish())
}

/// Accumulates constructs for the duration of one traversal.
#[derive(Debug, Default)]
pub struct DeclBuilder {
    root: DeclNode,
}

impl DeclBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tree: &SourceTree<'_>, construct: &Construct<'_>) -> Result<()> {
        match construct {
            Construct::Function(func) => self.insert_function(tree, func),
            Construct::Enum(en) => self.insert_enum(tree, en),
        }
    }

    pub fn finish(self) -> DeclNode {
        self.root
    }

    fn insert_function(&mut self, tree: &SourceTree<'_>, func: &FunctionConstruct<'_>) -> Result<()> {
        let path = resolve_path(tree, func.node)?;
        let params = func
            .declared_params(tree)
            .into_iter()
            .map(|p| ParamSig {
                ty: p.name.as_deref().and_then(|n| func.param_type(n)),
                name: p.label,
            })
            .collect();
        let return_type = func.return_type();

        debug!(path = %path.join("."), "function");
        self.insert_leaf(&path, true, |name, method| Leaf::Function {
            name,
            params,
            return_type,
            method,
        })
    }

    fn insert_enum(&mut self, tree: &SourceTree<'_>, en: &EnumConstruct<'_>) -> Result<()> {
        let path = resolve_path(tree, en.node)?;
        debug!(path = %path.join("."), values = en.values.len(), "enum");
        self.insert_leaf(&path, false, |name, _| Leaf::Enum {
            name,
            values: en.values.clone(),
            source_text: en.source_text.clone(),
            value_type: en.value_type(),
        })
    }

    /// Walk (creating as needed) to the node for `path` and set its leaf.
    /// `make_leaf` receives the terminal name and whether a `prototype`
    /// segment flagged an owner on the way.
    fn insert_leaf<F>(&mut self, path: &[String], honor_prototype: bool, make_leaf: F) -> Result<()>
    where
        F: FnOnce(String, bool) -> Leaf,
    {
        if let Some(bad) = path.iter().find(|s| !is_identifier(s)) {
            debug!(path = %path.join("."), segment = %bad, "skipping non-identifier name");
            return Ok(());
        }
        if path.iter().any(|s| s == RESERVED_SEGMENT) {
            return Err(Error::ReservedSegmentCollision {
                path: path.join("."),
            });
        }
        let Some((last, owners)) = path.split_last() else {
            return Ok(());
        };

        let mut node = &mut self.root;
        let mut depth = 0;
        let mut method = false;
        for segment in owners {
            if honor_prototype && segment == PROTOTYPE {
                // The root is top-level scope, never a class.
                if depth > 0 {
                    node.is_class = true;
                    method = true;
                }
                continue;
            }
            node = node.children.entry(segment.clone()).or_default();
            depth += 1;
        }

        let leaf = make_leaf(last.clone(), method);
        node.children.entry(last.clone()).or_default().leaf = Some(leaf);
        Ok(())
    }
}

/// Whether `segment` can be used as a declared name.
fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
