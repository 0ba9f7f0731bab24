//! Construct locator: decides whether a syntax node carries a documented
//! function or `@enum` object literal.
//!
//! Only a fixed set of statement shapes is considered. Any other node,
//! or a shape whose payload is not a function / object literal, yields
//! `None`.

use crate::model::{
    Construct, DocTag, EnumConstruct, FunctionConstruct, Tag, TagLocation,
};
use crate::parser::jsdoc;
use crate::parser::source::{CommentKind, SourceTree};
use crate::translate::translate;
use tracing::debug;
use tree_sitter::Node;

/// Node kinds that count as functions once a shape's candidate is extracted.
const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "generator_function",
    "method_definition",
];

/// Statement shapes that may carry a documented construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `function f() {}`
    FunctionDeclaration,
    /// `a.b = <value>;`
    AssignmentStatement,
    /// `var a = <value>;`
    VariableDeclaration,
    /// `class { m() {} }` / `{ m() {} }`
    MethodDefinition,
    /// `{ key: <value> }`
    ObjectProperty,
    /// `return <value>;`
    ReturnStatement,
}

impl Shape {
    fn of(node: Node<'_>) -> Option<Self> {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                Some(Shape::FunctionDeclaration)
            }
            "expression_statement" => Some(Shape::AssignmentStatement),
            "variable_declaration" | "lexical_declaration" => Some(Shape::VariableDeclaration),
            "method_definition" => Some(Shape::MethodDefinition),
            "pair" => Some(Shape::ObjectProperty),
            "return_statement" => Some(Shape::ReturnStatement),
            _ => None,
        }
    }

    /// The node holding the construct's value, parentheses removed.
    fn candidate<'t>(self, node: Node<'t>) -> Option<Node<'t>> {
        let value = match self {
            Shape::FunctionDeclaration | Shape::MethodDefinition => Some(node),
            Shape::AssignmentStatement => first_named(node)
                .filter(|n| n.kind() == "assignment_expression")
                .and_then(|n| n.child_by_field_name("right")),
            Shape::VariableDeclaration => first_named(node)
                .filter(|n| n.kind() == "variable_declarator")
                .and_then(|n| n.child_by_field_name("value")),
            Shape::ObjectProperty => node.child_by_field_name("value"),
            Shape::ReturnStatement => first_named(node),
        }?;
        Some(unparenthesize(value))
    }

    fn admits_enum(self) -> bool {
        matches!(self, Shape::AssignmentStatement | Shape::VariableDeclaration)
    }
}

/// Locate a documented construct at `node`.
pub fn locate<'t>(tree: &SourceTree<'_>, node: Node<'t>) -> Option<Construct<'t>> {
    let shape = Shape::of(node)?;
    let candidate = shape.candidate(node)?;
    if FUNCTION_KINDS.contains(&candidate.kind()) {
        return locate_function(tree, node, candidate).map(Construct::Function);
    }
    if shape.admits_enum() && candidate.kind() == "object" {
        return locate_enum(tree, node, candidate).map(Construct::Enum);
    }
    None
}

fn locate_function<'t>(
    tree: &SourceTree<'_>,
    node: Node<'t>,
    func: Node<'t>,
) -> Option<FunctionConstruct<'t>> {
    let comment = tree
        .leading_comments(node)
        .into_iter()
        .find(|c| c.kind == CommentKind::Block)?;
    let tags = parse_tags(tree, node, comment.text)?;
    let (params, returns) = fold_tags(&tags);
    Some(FunctionConstruct {
        node: func,
        params,
        returns,
    })
}

fn locate_enum<'t>(
    tree: &SourceTree<'_>,
    node: Node<'t>,
    object: Node<'t>,
) -> Option<EnumConstruct<'t>> {
    let comment = tree
        .leading_comments(node)
        .into_iter()
        .find(|c| c.kind == CommentKind::Block && c.text.contains("@enum"))?;
    let tags = parse_tags(tree, node, comment.text)?;
    let (_, returns) = fold_tags(&tags);

    let mut values = Vec::new();
    let mut cursor = object.walk();
    for prop in object.named_children(&mut cursor) {
        if prop.kind() != "pair" {
            continue;
        }
        match prop.child_by_field_name("value") {
            Some(value) if is_literal(tree, value) => values.push(tree.text(value).to_string()),
            _ => debug!(line = tree.line(prop), "skipping non-literal enum value"),
        }
    }

    Some(EnumConstruct {
        node: object,
        values,
        source_text: tree.text(object).to_string(),
        returns,
    })
}

fn parse_tags(tree: &SourceTree<'_>, node: Node<'_>, text: &str) -> Option<Vec<Tag>> {
    match jsdoc::parse_comment(text) {
        Ok(tags) => Some(tags),
        Err(e) => {
            debug!(line = tree.line(node), error = %e, "treating construct as undocumented");
            None
        }
    }
}

/// Split tags into param and return entries; other titles are dropped.
fn fold_tags(tags: &[Tag]) -> (Vec<DocTag>, Vec<DocTag>) {
    let mut params = Vec::new();
    let mut returns = Vec::new();
    for tag in tags {
        match tag.title.as_str() {
            "param" | "arg" | "argument" => params.push(DocTag {
                location: TagLocation::Param,
                name: tag.name.clone(),
                ty: tag.ty.clone(),
            }),
            "return" | "returns" | "enum" => returns.push(DocTag {
                location: TagLocation::Return,
                name: None,
                ty: tag.ty.clone(),
            }),
            _ => {}
        }
    }
    (params, returns)
}

fn is_literal(tree: &SourceTree<'_>, node: Node<'_>) -> bool {
    match node.kind() {
        "number" | "string" | "true" | "false" | "null" | "undefined" => true,
        "template_string" => {
            let mut cursor = node.walk();
            let plain = !node
                .named_children(&mut cursor)
                .any(|c| c.kind() == "template_substitution");
            plain
        }
        "unary_expression" => {
            let op = node.child_by_field_name("operator").map(|o| tree.text(o));
            let arg = node.child_by_field_name("argument");
            matches!(op, Some("-" | "+")) && arg.is_some_and(|a| a.kind() == "number")
        }
        _ => false,
    }
}

fn first_named(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment");
    found
}

fn unparenthesize(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        match first_named(node) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// A parameter as declared in source.
#[derive(Debug, Clone)]
pub struct DeclaredParam<'t> {
    pub node: Node<'t>,
    /// Identifier used to match `@param` tags; `None` for patterns
    pub name: Option<String>,
    /// Text rendered in a signature: `a`, `...rest`, `{x, y}`
    pub label: String,
}

impl<'t> FunctionConstruct<'t> {
    /// Declared parameters, in order.
    pub fn declared_params(&self, tree: &SourceTree<'_>) -> Vec<DeclaredParam<'t>> {
        let Some(params) = self.node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut cursor = params.walk();
        let children: Vec<Node<'t>> = params
            .named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .collect();
        children
            .into_iter()
            .map(|node| declared_param(tree, node))
            .collect()
    }

    /// Translated type of the first `@param` tag named `name` that has one.
    pub fn param_type(&self, name: &str) -> Option<String> {
        self.params
            .iter()
            .filter(|t| t.name.as_deref() == Some(name))
            .find_map(|t| t.ty.as_ref().and_then(translate))
    }

    /// Translated type of the first return tag.
    pub fn return_type(&self) -> Option<String> {
        self.returns.first()?.ty.as_ref().and_then(translate)
    }
}

fn declared_param<'t>(tree: &SourceTree<'_>, node: Node<'t>) -> DeclaredParam<'t> {
    let text = tree.text(node).to_string();
    let name = match node.kind() {
        "identifier" => Some(text.clone()),
        "assignment_pattern" => node
            .child_by_field_name("left")
            .filter(|l| l.kind() == "identifier")
            .map(|l| tree.text(l).to_string()),
        "rest_pattern" => first_named(node)
            .filter(|n| n.kind() == "identifier")
            .map(|n| tree.text(n).to_string()),
        _ => None,
    };
    let label = match (node.kind(), &name) {
        ("rest_pattern", Some(n)) => format!("...{n}"),
        (_, Some(n)) => n.clone(),
        (_, None) => text,
    };
    DeclaredParam { node, name, label }
}

impl<'t> EnumConstruct<'t> {
    /// Translated type from the `@enum {T}` tag, if any.
    pub fn value_type(&self) -> Option<String> {
        self.returns
            .iter()
            .find_map(|t| t.ty.as_ref().and_then(translate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeExpr;

    fn locate_all(src: &str) -> Vec<(String, &'static str)> {
        let tree = SourceTree::parse(src).unwrap();
        let mut found = Vec::new();
        tree.for_each_node(|node| {
            match locate(&tree, node) {
                Some(Construct::Function(f)) => found.push((f.node.kind().to_string(), "function")),
                Some(Construct::Enum(e)) => found.push((e.node.kind().to_string(), "enum")),
                None => {}
            }
            Ok(())
        })
        .unwrap();
        found
    }

    #[test]
    fn every_function_shape_is_found() {
        let src = r#"
/** @param {string} a */
function decl(a) {}
/** @param {string} a */
ns.assigned = function (a) {};
/** @param {string} a */
var initialized = function (a) {};
var obj = {
    /** @param {string} a */
    prop: function (a) {},
    /** @param {string} a */
    shorthand(a) {}
};
class K {
    /** @param {string} a */
    method(a) {}
}
function factory() {
    /** @return {number} */
    return function () {};
}
"#;
        let found = locate_all(src);
        let kinds: Vec<&str> = found.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                "function_declaration",
                "function_expression",
                "function_expression",
                "function_expression",
                "method_definition",
                "method_definition",
                "function_expression",
            ]
        );
    }

    #[test]
    fn undocumented_and_non_function_values_are_skipped() {
        assert!(locate_all("function g(x) {}").is_empty());
        assert!(locate_all("// @param {string} x\nfunction g(x) {}").is_empty());
        assert!(locate_all("/** nothing here */\nfunction g(x) {}").is_empty());
        assert!(locate_all("/** @param {string} x */\nvar v = 1;").is_empty());
        assert!(locate_all("/** @param {string} x */\nvar f = (x) => x;").is_empty());
    }

    #[test]
    fn enums_collect_literal_values() {
        let src = "/** @enum {number} */\nvar Color = { RED: 1, BLUE: -2, DYN: f(), NAME: 'n' };";
        let tree = SourceTree::parse(src).unwrap();
        let stmt = tree.root().named_child(1).unwrap();
        let Some(Construct::Enum(e)) = locate(&tree, stmt) else {
            panic!("expected enum");
        };
        assert_eq!(e.values, vec!["1", "-2", "'n'"]);
        assert_eq!(e.source_text, "{ RED: 1, BLUE: -2, DYN: f(), NAME: 'n' }");
        assert_eq!(e.value_type().as_deref(), Some("number"));
        assert_eq!(e.returns[0].ty, Some(TypeExpr::Name("number".into())));
    }

    #[test]
    fn enum_requires_marker() {
        assert!(locate_all("/** @type {Object} */\nvar Color = { RED: 1 };").is_empty());
        assert_eq!(locate_all("/** @enum */\nColor = { RED: 1 };").len(), 1);
        assert!(locate_all("var o = {\n  /** @enum */\n  k: { A: 1 }\n};").is_empty());
    }

    #[test]
    fn declared_params_and_types() {
        let src = "/**\n * @param {string} a\n * @param {number} b\n * @param {?} c\n * @return {Array.<string>}\n */\nfunction f(a, b = 2, c, ...d) {}";
        let tree = SourceTree::parse(src).unwrap();
        let node = tree.root().named_child(1).unwrap();
        let Some(Construct::Function(f)) = locate(&tree, node) else {
            panic!("expected function");
        };
        let labels: Vec<String> = f.declared_params(&tree).into_iter().map(|p| p.label).collect();
        assert_eq!(labels, vec!["a", "b", "c", "...d"]);
        assert_eq!(f.param_type("a").as_deref(), Some("string"));
        assert_eq!(f.param_type("b").as_deref(), Some("number"));
        assert_eq!(f.param_type("c"), None);
        assert_eq!(f.param_type("d"), None);
        assert_eq!(f.return_type().as_deref(), Some("Array<string>"));
    }
}
