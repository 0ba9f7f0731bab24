//! Data model shared by the declaration pipeline. Format-agnostic.

use indexmap::IndexMap;
use tree_sitter::Node;

/// Structured doc-comment type expression, as produced by
/// [`crate::parser::type_expr::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `string`, `Foo.Bar`
    Name(String),
    /// `Array<string>`, `Object.<string, number>`
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    /// `(A|B)`
    Union(Vec<TypeExpr>),
    /// `?T` / `T?`
    Nullable(Box<TypeExpr>),
    /// `T=` or a bracketed `[name]`
    Optional(Box<TypeExpr>),
    /// `*`
    Any,
    /// `?` on its own
    Unknown,
    /// `!T`
    NonNullable(Box<TypeExpr>),
    /// `function(A, B): R`
    Function {
        params: Vec<TypeExpr>,
        result: Option<Box<TypeExpr>>,
    },
    /// `{a: T, b}`
    Record(Vec<(String, Option<TypeExpr>)>),
    /// `[A, B]`
    Tuple(Vec<TypeExpr>),
    /// `...T`
    Rest(Box<TypeExpr>),
    /// `"foo"`, `42`
    Literal(String),
}

/// One raw tag from a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name without the `@`, e.g. `param`
    pub title: String,
    pub name: Option<String>,
    pub ty: Option<TypeExpr>,
}

/// Where a [`DocTag`] contributes its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLocation {
    Param,
    Return,
}

/// A doc tag folded down to what the pipeline consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    pub location: TagLocation,
    /// Absent for return tags
    pub name: Option<String>,
    pub ty: Option<TypeExpr>,
}

/// A documented function (declaration, expression or method).
#[derive(Debug, Clone)]
pub struct FunctionConstruct<'tree> {
    /// The function-like node: carries `parameters` and `body` fields
    pub node: Node<'tree>,
    pub params: Vec<DocTag>,
    /// Only the first entry is honored
    pub returns: Vec<DocTag>,
}

/// A documented `@enum` object literal.
#[derive(Debug, Clone)]
pub struct EnumConstruct<'tree> {
    /// The `object` node
    pub node: Node<'tree>,
    /// Verbatim source text of each literal value, in declaration order
    pub values: Vec<String>,
    /// Verbatim text of the object literal
    pub source_text: String,
    pub returns: Vec<DocTag>,
}

#[derive(Debug, Clone)]
pub enum Construct<'tree> {
    Function(FunctionConstruct<'tree>),
    Enum(EnumConstruct<'tree>),
}

/// Terminal payload of a [`DeclNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    Function {
        name: String,
        params: Vec<ParamSig>,
        return_type: Option<String>,
        /// Set when a `prototype` segment was seen on the path
        method: bool,
    },
    Enum {
        name: String,
        values: Vec<String>,
        source_text: String,
        value_type: Option<String>,
    },
}

/// One parameter of a rendered signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSig {
    /// `a`, `...rest`, or a verbatim destructuring pattern
    pub name: String,
    pub ty: Option<String>,
}

impl std::fmt::Display for ParamSig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.ty {
            Some(ty) => write!(f, "{}: {}", self.name, ty),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Rendered kind of a [`DeclNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Namespace,
    Class,
    Function,
    Method,
    Enum,
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Namespace => "namespace",
            DeclKind::Class => "class",
            DeclKind::Function => "function",
            DeclKind::Method => "method",
            DeclKind::Enum => "enum",
        }
    }
}

/// One node of the declaration tree, keyed by name-path segment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeclNode {
    /// Children in first-seen order
    pub children: IndexMap<String, DeclNode>,
    pub is_class: bool,
    pub leaf: Option<Leaf>,
}

impl DeclNode {
    /// Effective kind, or `None` for an empty node.
    pub fn kind(&self) -> Option<DeclKind> {
        if self.is_class {
            return Some(DeclKind::Class);
        }
        match &self.leaf {
            Some(Leaf::Function { method: true, .. }) => Some(DeclKind::Method),
            Some(Leaf::Function { .. }) => Some(DeclKind::Function),
            Some(Leaf::Enum { .. }) => Some(DeclKind::Enum),
            None if !self.children.is_empty() => Some(DeclKind::Namespace),
            None => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.leaf.is_none() && !self.is_class
    }
}
