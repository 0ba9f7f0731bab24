//! Doc-comment tag parser.
//!
//! Turns a raw `/** ... */` comment into an ordered list of [`Tag`]s.
//! A tag starts at an `@` that opens the comment body or follows
//! whitespace, so one-line comments such as
//! `/** @param {string} name @return {number} */` yield two tags.

use crate::model::{Tag, TypeExpr};
use crate::parser::type_expr;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Leading ` * ` gutter on continuation lines.
static RE_GUTTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[[:blank:]]*\*?[[:blank:]]?").unwrap());

/// Tags whose first word after the type is a name.
const NAMED_TAGS: &[&str] = &[
    "param", "arg", "argument", "property", "prop", "typedef", "callback",
];

/// Why a comment produced no usable tags.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocError {
    #[error("comment has no tags")]
    NoTags,
    #[error("unterminated type expression in @{title}")]
    UnterminatedType { title: String },
}

/// Parse a raw block comment (delimiters included or already stripped).
pub fn parse_comment(raw: &str) -> Result<Vec<Tag>, DocError> {
    let body = unwrap_comment(raw);
    let mut tags = Vec::new();
    for chunk in split_tags(&body) {
        tags.push(parse_tag(chunk)?);
    }
    if tags.is_empty() {
        return Err(DocError::NoTags);
    }
    Ok(tags)
}

/// Strip `/**`, `*/` and the per-line `*` gutter.
fn unwrap_comment(raw: &str) -> String {
    let inner = raw.trim();
    let inner = inner
        .strip_prefix("/**")
        .or_else(|| inner.strip_prefix("/*"))
        .unwrap_or(inner);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);
    RE_GUTTER.replace_all(inner, "").into_owned()
}

/// Split the comment body into tag chunks, each starting after its `@`.
fn split_tags(body: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    let mut prev: Option<char> = None;
    let mut brace_depth = 0usize;
    for (i, c) in body.char_indices() {
        match c {
            '{' => brace_depth += 1,
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '@' if brace_depth == 0 && prev.map_or(true, char::is_whitespace) => {
                let next = body[i + 1..].chars().next();
                if next.is_some_and(char::is_alphabetic) {
                    starts.push(i);
                }
            }
            _ => {}
        }
        prev = Some(c);
    }

    let mut chunks = Vec::with_capacity(starts.len());
    for (n, &start) in starts.iter().enumerate() {
        let end = starts.get(n + 1).copied().unwrap_or(body.len());
        chunks.push(&body[start + 1..end]);
    }
    chunks
}

fn parse_tag(chunk: &str) -> Result<Tag, DocError> {
    let title_len = chunk
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(chunk.len());
    let title = chunk[..title_len].to_string();
    let mut rest = chunk[title_len..].trim_start();

    let mut ty = None;
    if rest.starts_with('{') {
        let close = matching_brace(rest).ok_or_else(|| DocError::UnterminatedType {
            title: title.clone(),
        })?;
        let expr = &rest[1..close];
        match type_expr::parse(expr) {
            Ok(parsed) => ty = Some(parsed),
            Err(e) => debug!(tag = %title, expr, error = %e, "ignoring unparsable type"),
        }
        rest = rest[close + 1..].trim_start();
    }

    let mut name = None;
    if NAMED_TAGS.contains(&title.as_str()) && !rest.is_empty() {
        let (parsed, optional) = split_name(rest);
        if optional {
            ty = ty.map(|t| match t {
                TypeExpr::Optional(_) => t,
                t => TypeExpr::Optional(Box::new(t)),
            });
        }
        name = parsed;
    }

    Ok(Tag { title, name, ty })
}

/// Byte offset of the `}` closing the `{` at offset 0.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Leading `name`, `[name]` or `[name=default]`; the rest of the tag text
/// is free description. Also returns whether the name was bracketed.
fn split_name(text: &str) -> (Option<String>, bool) {
    if let Some(inner) = text.strip_prefix('[') {
        if let Some(close) = inner.find(']') {
            let decl = &inner[..close];
            let name = decl.split('=').next().unwrap_or(decl).trim();
            return ((!name.is_empty()).then(|| name.to_string()), true);
        }
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    (Some(text[..end].to_string()), false)
}
