//! Recursive-descent parser for doc-comment type expressions.
//!
//! Accepts the Closure/JSDoc type grammar found between the braces of a
//! tag: `string`, `Array.<string>`, `Array<string>`, `(A|B)`, `?T`, `!T`,
//! `T=`, `T[]`, `...T`, `*`, `function(A): R`, `{a: T}`, `[A, B]`.

use crate::model::TypeExpr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unexpected end of type expression")]
    UnexpectedEnd,
}

/// Parse a complete type expression (without the surrounding braces).
pub fn parse(input: &str) -> Result<TypeExpr, TypeError> {
    let mut p = TypeParser { src: input, pos: 0 };
    let expr = p.union()?;
    p.skip_ws();
    match p.peek() {
        Some(c) => Err(p.unexpected(c)),
        None => Ok(expr),
    }
}

struct TypeParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        self.skip_ws();
        if self.src[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), TypeError> {
        if self.eat(c) {
            return Ok(());
        }
        match self.peek() {
            Some(found) => Err(self.unexpected(found)),
            None => Err(TypeError::UnexpectedEnd),
        }
    }

    fn unexpected(&self, found: char) -> TypeError {
        TypeError::Unexpected {
            found,
            offset: self.pos,
        }
    }

    /// True when the next token ends the current type.
    fn at_delimiter(&mut self) -> bool {
        self.skip_ws();
        matches!(
            self.peek(),
            None | Some(',' | '|' | ')' | '>' | ']' | '}' | '=')
        )
    }

    fn union(&mut self) -> Result<TypeExpr, TypeError> {
        let mut members = vec![self.postfix()?];
        while self.eat('|') {
            members.push(self.postfix()?);
        }
        if members.len() == 1 {
            Ok(members.swap_remove(0))
        } else {
            Ok(TypeExpr::Union(members))
        }
    }

    fn postfix(&mut self) -> Result<TypeExpr, TypeError> {
        let mut expr = self.prefix()?;
        loop {
            if self.eat_str("[]") {
                expr = TypeExpr::Generic {
                    base: Box::new(TypeExpr::Name("Array".to_string())),
                    args: vec![expr],
                };
            } else if self.eat('=') {
                expr = TypeExpr::Optional(Box::new(expr));
            } else if self.eat('?') {
                expr = TypeExpr::Nullable(Box::new(expr));
            } else {
                return Ok(expr);
            }
        }
    }

    fn prefix(&mut self) -> Result<TypeExpr, TypeError> {
        if self.eat_str("...") {
            return Ok(TypeExpr::Rest(Box::new(self.prefix()?)));
        }
        if self.eat('?') {
            if self.at_delimiter() {
                return Ok(TypeExpr::Unknown);
            }
            return Ok(TypeExpr::Nullable(Box::new(self.prefix()?)));
        }
        if self.eat('!') {
            return Ok(TypeExpr::NonNullable(Box::new(self.prefix()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<TypeExpr, TypeError> {
        self.skip_ws();
        match self.peek() {
            None => Err(TypeError::UnexpectedEnd),
            Some('*') => {
                self.bump();
                Ok(TypeExpr::Any)
            }
            Some('(') => {
                self.bump();
                let inner = self.union()?;
                self.expect(')')?;
                Ok(inner)
            }
            Some('{') => {
                self.bump();
                self.record()
            }
            Some('[') => {
                self.bump();
                let items = self.list(']')?;
                Ok(TypeExpr::Tuple(items))
            }
            Some(q @ ('"' | '\'')) => self.string_literal(q),
            Some(c) if c.is_ascii_digit() || c == '-' => self.number_literal(),
            Some(c) if is_name_start(c) => {
                let name = self.name();
                if name == "function" && self.eat('(') {
                    return self.function_type();
                }
                if self.eat_str(".<") || self.eat('<') {
                    let args = self.list('>')?;
                    return Ok(TypeExpr::Generic {
                        base: Box::new(TypeExpr::Name(name)),
                        args,
                    });
                }
                Ok(TypeExpr::Name(name))
            }
            Some(c) => Err(self.unexpected(c)),
        }
    }

    /// Dotted name; stops before a `.<` generic opener.
    fn name(&mut self) -> String {
        let start = self.pos;
        loop {
            while self.peek().is_some_and(is_name_char) {
                self.bump();
            }
            let rest = &self.src[self.pos..];
            let continues = rest.starts_with('.')
                && rest[1..].chars().next().is_some_and(is_name_start);
            if !continues {
                break;
            }
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }

    /// Comma-separated types up to and including `close`.
    fn list(&mut self, close: char) -> Result<Vec<TypeExpr>, TypeError> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.union()?);
            if self.eat(close) {
                return Ok(items);
            }
            self.expect(',')?;
        }
    }

    fn function_type(&mut self) -> Result<TypeExpr, TypeError> {
        let mut params = Vec::new();
        if !self.eat(')') {
            loop {
                // `this:` and `new:` bind the receiver, not a parameter
                let save = self.pos;
                if !(self.eat_str("this") || self.eat_str("new")) || !self.eat(':') {
                    self.pos = save;
                }
                params.push(self.union()?);
                if self.eat(')') {
                    break;
                }
                self.expect(',')?;
            }
        }
        let result = if self.eat(':') {
            Some(Box::new(self.postfix()?))
        } else {
            None
        };
        Ok(TypeExpr::Function { params, result })
    }

    fn record(&mut self) -> Result<TypeExpr, TypeError> {
        let mut fields = Vec::new();
        if self.eat('}') {
            return Ok(TypeExpr::Record(fields));
        }
        loop {
            self.skip_ws();
            let key = match self.peek() {
                Some(q @ ('"' | '\'')) => match self.string_literal(q)? {
                    TypeExpr::Literal(text) => text.trim_matches(q).to_string(),
                    _ => return Err(TypeError::UnexpectedEnd),
                },
                Some(c) if is_name_start(c) => self.name(),
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(TypeError::UnexpectedEnd),
            };
            let ty = if self.eat(':') {
                Some(self.union()?)
            } else {
                None
            };
            fields.push((key, ty));
            if self.eat('}') {
                return Ok(TypeExpr::Record(fields));
            }
            self.expect(',')?;
        }
    }

    fn string_literal(&mut self, quote: char) -> Result<TypeExpr, TypeError> {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                None => return Err(TypeError::UnexpectedEnd),
                Some('\\') => {
                    self.bump();
                }
                Some(c) if c == quote => break,
                Some(_) => {}
            }
        }
        Ok(TypeExpr::Literal(self.src[start..self.pos].to_string()))
    }

    fn number_literal(&mut self) -> Result<TypeExpr, TypeError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        if text == "-" {
            return match self.peek() {
                Some(c) => Err(self.unexpected(c)),
                None => Err(TypeError::UnexpectedEnd),
            };
        }
        Ok(TypeExpr::Literal(text.to_string()))
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> TypeExpr {
        TypeExpr::Name(n.to_string())
    }

    fn generic(base: &str, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Generic {
            base: Box::new(name(base)),
            args,
        }
    }

    #[test]
    fn dotted_names() {
        assert_eq!(parse("string").unwrap(), name("string"));
        assert_eq!(parse(" ns.Foo ").unwrap(), name("ns.Foo"));
    }

    #[test]
    fn both_generic_spellings() {
        let expected = generic("Array", vec![name("string")]);
        assert_eq!(parse("Array.<string>").unwrap(), expected);
        assert_eq!(parse("Array<string>").unwrap(), expected);
        assert_eq!(parse("string[]").unwrap(), expected);
        assert_eq!(
            parse("Object.<string, number>").unwrap(),
            generic("Object", vec![name("string"), name("number")])
        );
    }

    #[test]
    fn unions_with_and_without_parens() {
        let expected = TypeExpr::Union(vec![name("Object"), name("string")]);
        assert_eq!(parse("(Object|string)").unwrap(), expected);
        assert_eq!(parse("Object | string").unwrap(), expected);
        assert_eq!(parse("(string)").unwrap(), name("string"));
    }

    #[test]
    fn modifiers() {
        assert_eq!(
            parse("?string").unwrap(),
            TypeExpr::Nullable(Box::new(name("string")))
        );
        assert_eq!(
            parse("string?").unwrap(),
            TypeExpr::Nullable(Box::new(name("string")))
        );
        assert_eq!(
            parse("!Object").unwrap(),
            TypeExpr::NonNullable(Box::new(name("Object")))
        );
        assert_eq!(
            parse("number=").unwrap(),
            TypeExpr::Optional(Box::new(name("number")))
        );
        assert_eq!(
            parse("...number").unwrap(),
            TypeExpr::Rest(Box::new(name("number")))
        );
        assert_eq!(parse("*").unwrap(), TypeExpr::Any);
        assert_eq!(parse("?").unwrap(), TypeExpr::Unknown);
    }

    #[test]
    fn function_types() {
        assert_eq!(
            parse("function(this:Foo, string): number").unwrap(),
            TypeExpr::Function {
                params: vec![name("Foo"), name("string")],
                result: Some(Box::new(name("number"))),
            }
        );
        assert_eq!(
            parse("function()").unwrap(),
            TypeExpr::Function {
                params: vec![],
                result: None,
            }
        );
    }

    #[test]
    fn records_tuples_and_literals() {
        assert_eq!(
            parse("{a: number, b}").unwrap(),
            TypeExpr::Record(vec![
                ("a".to_string(), Some(name("number"))),
                ("b".to_string(), None),
            ])
        );
        assert_eq!(
            parse("[string, number]").unwrap(),
            TypeExpr::Tuple(vec![name("string"), name("number")])
        );
        assert_eq!(
            parse("'on'|-1").unwrap(),
            TypeExpr::Union(vec![
                TypeExpr::Literal("'on'".to_string()),
                TypeExpr::Literal("-1".to_string()),
            ])
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse(""), Err(TypeError::UnexpectedEnd));
        assert_eq!(parse("Array<string"), Err(TypeError::UnexpectedEnd));
        assert!(matches!(
            parse("string )"),
            Err(TypeError::Unexpected { found: ')', .. })
        ));
    }
}
