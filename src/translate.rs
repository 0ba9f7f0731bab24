//! Doc-comment type expression -> declaration type syntax.

use crate::model::TypeExpr;

/// Translate a type expression, or `None` when the shape has no
/// declaration form. `None` means "omit the annotation", never an error.
pub fn translate(expr: &TypeExpr) -> Option<String> {
    match expr {
        TypeExpr::Name(name) => Some(name.clone()),
        TypeExpr::Generic { base, args } => {
            // Only the first type argument is representable.
            let base = translate(base)?;
            let arg = translate(args.first()?)?;
            Some(format!("{base}<{arg}>"))
        }
        // Members that fail to translate are dropped from the join.
        TypeExpr::Union(members) => Some(
            members
                .iter()
                .filter_map(translate)
                .collect::<Vec<_>>()
                .join(" | "),
        ),
        TypeExpr::Nullable(inner) | TypeExpr::Optional(inner) => {
            translate(inner).map(|t| format!("?{t}"))
        }
        TypeExpr::Any => Some("any".to_string()),
        TypeExpr::Unknown
        | TypeExpr::NonNullable(_)
        | TypeExpr::Function { .. }
        | TypeExpr::Record(_)
        | TypeExpr::Tuple(_)
        | TypeExpr::Rest(_)
        | TypeExpr::Literal(_) => None,
    }
}
