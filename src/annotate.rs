//! Inline annotator: rewrites documented functions in place with
//! `/* : T*/` type comments. Enums are left alone.

use crate::error::Result;
use crate::locate::{locate, DeclaredParam};
use crate::model::{Construct, FunctionConstruct};
use crate::parser::source::{SourceEdits, SourceTree};
use tracing::debug;

/// Annotate every documented function of `tree`, returning the whole source.
pub fn annotate_source(tree: &SourceTree<'_>) -> Result<String> {
    let mut edits = SourceEdits::default();
    tree.for_each_node(|node| {
        if let Some(Construct::Function(func)) = locate(tree, node) {
            annotate_function(tree, &func, &mut edits);
        }
        Ok(())
    })?;
    if edits.is_empty() {
        return Ok(tree.source().to_string());
    }
    Ok(edits.apply(tree.source()))
}

fn annotate_function(tree: &SourceTree<'_>, func: &FunctionConstruct<'_>, edits: &mut SourceEdits) {
    for param in func.declared_params(tree) {
        let Some(ty) = param.name.as_deref().and_then(|n| func.param_type(n)) else {
            continue;
        };
        edits.insert(param_end(&param), type_comment(&ty));
    }

    match (func.return_type(), func.node.child_by_field_name("body")) {
        (Some(ty), Some(body)) => {
            edits.insert(body.start_byte() + 1, format!("{} ", type_comment(&ty)));
        }
        (Some(_), None) => debug!(line = tree.line(func.node), "return type without a body"),
        _ => {}
    }
}

/// Insertion point right after the parameter's name, before any default.
fn param_end(param: &DeclaredParam<'_>) -> usize {
    match param.node.kind() {
        "assignment_pattern" => param
            .node
            .child_by_field_name("left")
            .unwrap_or(param.node)
            .end_byte(),
        _ => param.node.end_byte(),
    }
}

fn type_comment(ty: &str) -> String {
    format!("/* : {ty}*/")
}
