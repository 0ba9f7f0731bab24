//! JavaScript source layer on top of tree-sitter.
//!
//! Provides what the declaration pipeline needs from a syntax tree:
//! parent links (tree-sitter's `parent()`), contiguous leading comments
//! for any node, a pre-order traversal, and byte-offset insertions that
//! leave every other byte of the source untouched.

use crate::error::{Error, Result};
use tree_sitter::{Node, Parser, Tree};

/// A parsed unit of JavaScript source.
pub struct SourceTree<'src> {
    src: &'src str,
    tree: Tree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `/* ... */` and `/** ... */`
    Block,
    /// `// ...`
    Line,
}

#[derive(Debug, Clone, Copy)]
pub struct Comment<'src> {
    pub kind: CommentKind,
    /// Raw text including delimiters
    pub text: &'src str,
}

impl<'src> SourceTree<'src> {
    pub fn parse(src: &'src str) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_javascript::LANGUAGE.into())?;
        let tree = parser.parse(src, None).ok_or(Error::ParseFailed)?;
        Ok(Self { src, tree })
    }

    pub fn source(&self) -> &'src str {
        self.src
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Verbatim source text of a node.
    pub fn text(&self, node: Node<'_>) -> &'src str {
        &self.src[node.byte_range()]
    }

    /// 1-based line a node starts on.
    pub fn line(&self, node: Node<'_>) -> usize {
        node.start_position().row + 1
    }

    /// Comments immediately preceding `node` among its siblings, in source order.
    pub fn leading_comments(&self, node: Node<'_>) -> Vec<Comment<'src>> {
        let mut comments = Vec::new();
        let mut prev = node.prev_sibling();
        while let Some(sibling) = prev {
            if sibling.kind() != "comment" {
                break;
            }
            let text = self.text(sibling);
            let kind = if text.starts_with("/*") {
                CommentKind::Block
            } else {
                CommentKind::Line
            };
            comments.push(Comment { kind, text });
            prev = sibling.prev_sibling();
        }
        comments.reverse();
        comments
    }

    /// Visit every node in pre-order (file order). Stops at the first error.
    pub fn for_each_node<'t, F>(&'t self, mut visit: F) -> Result<()>
    where
        F: FnMut(Node<'t>) -> Result<()>,
    {
        let mut cursor = self.tree.walk();
        loop {
            visit(cursor.node())?;
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(());
                }
            }
        }
    }
}

/// Pending text insertions against one source string.
#[derive(Debug, Default)]
pub struct SourceEdits {
    inserts: Vec<(usize, String)>,
}

impl SourceEdits {
    /// Queue `text` for insertion at byte offset `at`.
    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.inserts.push((at, text.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
    }

    /// Apply all insertions. Insertions at the same offset keep queue order.
    pub fn apply(mut self, src: &str) -> String {
        self.inserts.sort_by_key(|(at, _)| *at);
        let extra: usize = self.inserts.iter().map(|(_, t)| t.len()).sum();
        let mut out = String::with_capacity(src.len() + extra);
        let mut last = 0;
        for (at, text) in &self.inserts {
            let at = (*at).clamp(last, src.len());
            out.push_str(&src[last..at]);
            out.push_str(text);
            last = at;
        }
        out.push_str(&src[last..]);
        out
    }
}
