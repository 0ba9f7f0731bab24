//! Name path resolution: derive a construct's dotted name from where it
//! sits in the syntax tree.
//!
//! Resolution only reads the node and its ancestors (plus the left-hand
//! sides of assignments it passes through), so it is a pure function of
//! the tree.

use crate::error::{Error, Result};
use crate::parser::source::SourceTree;
use tree_sitter::Node;

/// Dot-joined name of a construct node.
pub fn resolve_name(tree: &SourceTree<'_>, node: Node<'_>) -> Result<String> {
    Ok(resolve_path(tree, node)?.join("."))
}

/// Name path segments of a construct node.
///
/// Fails with [`Error::UnresolvableName`] when the walk reaches the top of
/// the tree without producing a name.
pub fn resolve_path(tree: &SourceTree<'_>, node: Node<'_>) -> Result<Vec<String>> {
    owner_path(tree, node)
        .filter(|path| !path.is_empty())
        .ok_or_else(|| Error::UnresolvableName {
            kind: node.kind().to_string(),
            line: tree.line(node),
        })
}

fn owner_path(tree: &SourceTree<'_>, node: Node<'_>) -> Option<Vec<String>> {
    match node.kind() {
        "identifier" | "property_identifier" | "member_expression" | "subscript_expression" => {
            target_path(tree, node)
        }
        "assignment_expression" => target_path(tree, node.child_by_field_name("left")?),
        "variable_declarator" => target_path(tree, node.child_by_field_name("name")?),
        "function_declaration" | "generator_function_declaration" | "class_declaration" => {
            let name = tree.text(node.child_by_field_name("name")?).to_string();
            let mut path = enclosing_scope(tree, node).unwrap_or_default();
            path.push(name);
            Some(path)
        }
        "method_definition" => method_path(tree, node),
        "pair" => {
            let key = key_name(tree, node.child_by_field_name("key")?)?;
            let mut path = owner_path(tree, node.parent()?)?;
            path.push(key);
            Some(path)
        }
        _ => owner_path(tree, node.parent()?),
    }
}

/// Path named by an assignment target or member chain. `this` and other
/// unnamed objects contribute nothing.
fn target_path(tree: &SourceTree<'_>, node: Node<'_>) -> Option<Vec<String>> {
    match node.kind() {
        "identifier" | "property_identifier" | "private_property_identifier" => {
            Some(vec![tree.text(node).to_string()])
        }
        "this" | "super" => Some(Vec::new()),
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner = node.named_children(&mut cursor).next();
            target_path(tree, inner?)
        }
        "member_expression" => {
            let mut path = node
                .child_by_field_name("object")
                .and_then(|o| target_path(tree, o))
                .unwrap_or_default();
            path.push(tree.text(node.child_by_field_name("property")?).to_string());
            Some(path)
        }
        "subscript_expression" => {
            let index = node.child_by_field_name("index")?;
            if index.kind() != "string" {
                return None;
            }
            let mut path = node
                .child_by_field_name("object")
                .and_then(|o| target_path(tree, o))
                .unwrap_or_default();
            path.push(unquote(tree.text(index)));
            Some(path)
        }
        _ => None,
    }
}

/// Path of the nearest enclosing function or class, if it has one.
fn enclosing_scope(tree: &SourceTree<'_>, node: Node<'_>) -> Option<Vec<String>> {
    let mut current = node.parent();
    while let Some(n) = current {
        match n.kind() {
            "program" => return None,
            "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "generator_function"
            | "arrow_function"
            | "method_definition"
            | "class_declaration"
            | "class" => return owner_path(tree, n),
            _ => current = n.parent(),
        }
    }
    None
}

/// Class methods land under `prototype` unless static; the constructor
/// is the class itself. Object-literal methods behave like properties.
fn method_path(tree: &SourceTree<'_>, node: Node<'_>) -> Option<Vec<String>> {
    let name = key_name(tree, node.child_by_field_name("name")?)?;
    let container = node.parent()?;
    let mut path = match container.kind() {
        "class_body" => owner_path(tree, container.parent()?)?,
        _ => owner_path(tree, container)?,
    };
    if container.kind() == "class_body" {
        if name == "constructor" {
            return Some(path);
        }
        if !is_static(node) {
            path.push("prototype".to_string());
        }
    }
    path.push(name);
    Some(path)
}

fn is_static(method: Node<'_>) -> bool {
    let mut cursor = method.walk();
    let found = method
        .children(&mut cursor)
        .any(|c| c.kind() == "static" || c.kind() == "static get");
    found
}

fn key_name(tree: &SourceTree<'_>, key: Node<'_>) -> Option<String> {
    match key.kind() {
        "property_identifier" | "identifier" | "private_property_identifier" | "number" => {
            Some(tree.text(key).to_string())
        }
        "string" => Some(unquote(tree.text(key))),
        _ => None,
    }
}

fn unquote(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}
