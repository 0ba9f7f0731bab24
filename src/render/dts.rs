//! Ambient declaration renderer.
//!
//! Walks the tree depth-first. The root is top-level scope (depth -1), so
//! its children render at depth 0 with a `declare` prefix; anything nested
//! is already ambient and gets none. Every depth indents by four spaces.

use crate::error::Result;
use crate::model::{DeclKind, DeclNode, Leaf, ParamSig};
use crate::render::Renderer;
use regex::{Captures, Regex};

const INDENT: &str = "    ";

pub struct DtsRenderer;

impl Renderer for DtsRenderer {
    fn render(&self, root: &DeclNode) -> Result<String> {
        let mut ctx = RenderContext::default();
        for (name, child) in &root.children {
            render_node(&mut ctx, name, child, 0, false);
        }
        retarget_enum_types(ctx.out, &ctx.enums)
    }

    fn file_extension(&self) -> &str {
        "d.ts"
    }
}

/// State for one render pass.
#[derive(Default)]
struct RenderContext {
    out: String,
    /// Full path of the node being rendered
    path: Vec<String>,
    /// Full paths of the enclosing namespaces, innermost last
    namespaces: Vec<Vec<String>>,
    /// Full paths of every enum emitted so far
    enums: Vec<Vec<String>>,
}

impl RenderContext {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Drop a leading qualifier naming the innermost namespace or one of
    /// its ancestors, longest first.
    fn strip_qualifier(&self, ty: &str) -> String {
        if let Some(ns) = self.namespaces.last() {
            for len in (1..=ns.len()).rev() {
                let prefix = format!("{}.", ns[..len].join("."));
                if let Some(rest) = ty.strip_prefix(prefix.as_str()) {
                    return rest.to_string();
                }
            }
        }
        ty.to_string()
    }

    fn param_list(&self, params: &[ParamSig]) -> String {
        params
            .iter()
            .map(|p| match &p.ty {
                Some(ty) => format!("{}: {}", p.name, self.strip_qualifier(ty)),
                None => p.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn declare(depth: usize) -> &'static str {
    if depth == 0 {
        "declare "
    } else {
        ""
    }
}

fn render_node(ctx: &mut RenderContext, name: &str, node: &DeclNode, depth: usize, in_class: bool) {
    let Some(kind) = node.kind() else {
        return;
    };
    ctx.path.push(name.to_string());
    match kind {
        DeclKind::Namespace => render_namespace(ctx, name, node, depth),
        DeclKind::Class => render_class(ctx, name, node, depth),
        DeclKind::Function | DeclKind::Method | DeclKind::Enum => {
            if let Some(leaf) = &node.leaf {
                render_leaf(ctx, leaf, depth, in_class);
            }
            // Members hung off a function or enum merge into a same-named module.
            if !node.children.is_empty() {
                render_namespace(ctx, name, node, depth);
            }
        }
    }
    ctx.path.pop();
}

fn render_namespace(ctx: &mut RenderContext, name: &str, node: &DeclNode, depth: usize) {
    ctx.line(depth, &format!("{}module {} {{", declare(depth), name));
    ctx.namespaces.push(ctx.path.clone());
    for (child_name, child) in &node.children {
        render_node(ctx, child_name, child, depth + 1, false);
    }
    ctx.namespaces.pop();
    ctx.line(depth, "}");
}

fn render_class(ctx: &mut RenderContext, name: &str, node: &DeclNode, depth: usize) {
    ctx.line(depth, &format!("{}class {} {{", declare(depth), name));
    if let Some(Leaf::Function { params, .. }) = &node.leaf {
        let params = ctx.param_list(params);
        ctx.line(depth + 1, &format!("constructor({params});"));
    }
    for (child_name, child) in &node.children {
        render_node(ctx, child_name, child, depth + 1, true);
    }
    ctx.line(depth, "}");
    if let Some(leaf @ Leaf::Enum { .. }) = &node.leaf {
        render_leaf(ctx, leaf, depth, false);
    }
}

fn render_leaf(ctx: &mut RenderContext, leaf: &Leaf, depth: usize, in_class: bool) {
    match leaf {
        Leaf::Function {
            name,
            params,
            return_type,
            method,
        } => {
            let params = ctx.param_list(params);
            let ret = return_type
                .as_deref()
                .map(|t| ctx.strip_qualifier(t))
                .unwrap_or_else(|| "void".to_string());
            let head = if *method {
                String::new()
            } else if in_class {
                "static ".to_string()
            } else {
                format!("{}function ", declare(depth))
            };
            ctx.line(depth, &format!("{head}{name}({params}): {ret};"));
        }
        Leaf::Enum {
            name,
            values,
            source_text,
            value_type,
        } => {
            let body = reindent(source_text, depth);
            ctx.line(depth, &format!("{}var {name}: {body};", declare(depth)));
            let alias = if values.is_empty() {
                value_type.clone().unwrap_or_else(|| "any".to_string())
            } else {
                values.join("|")
            };
            ctx.line(depth, &format!("{}type {name}Value = {alias};", declare(depth)));
            ctx.enums.push(ctx.path.clone());
        }
    }
}

/// Re-indent continuation lines of a multi-line literal: their common
/// leading whitespace is replaced by the current indentation.
fn reindent(text: &str, depth: usize) -> String {
    let mut lines = text.lines();
    let Some(first) = lines.next() else {
        return String::new();
    };
    let rest: Vec<&str> = lines.collect();
    let leading = |l: &str| l.len() - l.trim_start_matches([' ', '\t']).len();
    let base = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| leading(l))
        .min()
        .unwrap_or(0);
    let indent = INDENT.repeat(depth);

    let mut out = first.to_string();
    for line in rest {
        out.push('\n');
        if line.trim().is_empty() {
            continue;
        }
        out.push_str(&indent);
        out.push_str(&line[base.min(leading(line))..]);
    }
    out
}

/// Point type annotations that name an enum at its value alias:
/// `: Color` / `: ?Color` / `: ns.Color` become `...Value`. Other
/// occurrences of the name are left alone.
fn retarget_enum_types(out: String, enums: &[Vec<String>]) -> Result<String> {
    let mut names: Vec<String> = Vec::new();
    for path in enums {
        names.push(path.join("."));
        if let (true, Some(last)) = (path.len() > 1, path.last()) {
            names.push(last.clone());
        }
    }
    if names.is_empty() {
        return Ok(out);
    }
    // Alternation is leftmost-first: dotted paths must precede bare names.
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    names.dedup();

    let alternation = names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    let re = Regex::new(&format!(r"(:\s*\??)({alternation})([^\w.$]|$)"))?;
    let replaced = re.replace_all(&out, |caps: &Captures| {
        format!("{}{}Value{}", &caps[1], &caps[2], &caps[3])
    });
    Ok(replaced.into_owned())
}
