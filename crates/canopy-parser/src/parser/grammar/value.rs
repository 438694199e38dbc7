use canopy_tree::{StringId, ValueId, ValueKind};

use crate::error::{Error, ErrorKind};
use crate::lexer::TokenKind;
use crate::parser::Parser;

/// See: https://tools.ietf.org/html/rfc8259#section-2
///
/// ```txt
/// JSON-text = ws value ws
/// ```
///
/// The top-level value must consume the entire document.
pub(crate) fn document(p: &mut Parser<'_>) -> Result<ValueId, Error> {
    let root = value(p, None)?;
    if let Some(index) = p.rest() {
        return Err(Error::new(
            ErrorKind::Grammar,
            "parser did not match the entire document",
            index,
        ));
    }
    Ok(root)
}

/// See: https://tools.ietf.org/html/rfc8259#section-3
///
/// ```txt
/// value = false / null / true / object / array / number / string
/// ```
///
/// `key` is the member key when this value is a direct child of an
/// object; the closed value is pushed into the tree under construction
/// and its id handed back to the enclosing production.
pub(crate) fn value(p: &mut Parser<'_>, key: Option<StringId>) -> Result<ValueId, Error> {
    p.recursion_limit.consume();
    if p.recursion_limit.limited() {
        let index = p.peek()?.index;
        return Err(Error::new(
            ErrorKind::RecursionLimit,
            "parser recursion limit exceeded",
            index,
        ));
    }
    let token = p.bump()?;
    let id = match token.kind {
        TokenKind::LBrace => object(p, key)?,
        TokenKind::LBracket => array(p, key)?,
        TokenKind::String(s) => {
            let string = p.builder.intern(&s);
            p.builder.push_string_value(key, string)
        }
        TokenKind::Number(number) => p.builder.push_number_value(key, number),
        TokenKind::True => p.builder.push_literal(key, ValueKind::True),
        TokenKind::False => p.builder.push_literal(key, ValueKind::False),
        TokenKind::Null => p.builder.push_literal(key, ValueKind::Null),
        other => {
            return Err(Error::new(
                ErrorKind::Grammar,
                format!("expected a value, got {}", other.describe()),
                token.index,
            ))
        }
    };
    p.recursion_limit.release();
    Ok(id)
}

/// See: https://tools.ietf.org/html/rfc8259#section-4
///
/// ```txt
/// object = begin-object [ member *( value-separator member ) ] end-object
/// member = string name-separator value
/// ```
///
/// The opening `{` is already consumed. Trailing commas are rejected at
/// the comma's position; a missing `}` is a missing terminator.
fn object(p: &mut Parser<'_>, key: Option<StringId>) -> Result<ValueId, Error> {
    let mut children = Vec::new();
    if p.peek()?.kind == TokenKind::RBrace {
        p.bump()?;
        return Ok(p.builder.push_container(key, ValueKind::Object, &children));
    }
    loop {
        let token = p.bump()?;
        let member_key = match token.kind {
            TokenKind::String(s) => p.builder.intern(&s),
            TokenKind::Eof => {
                return Err(Error::new(
                    ErrorKind::MissingTerminator,
                    "expected closing object brace `}`",
                    token.index,
                ))
            }
            other => {
                return Err(Error::new(
                    ErrorKind::Grammar,
                    format!("expected an object member key, got {}", other.describe()),
                    token.index,
                ))
            }
        };
        p.expect_colon()?;
        children.push(value(p, Some(member_key))?);

        let token = p.bump()?;
        match token.kind {
            TokenKind::Comma => {
                if p.peek()?.kind == TokenKind::RBrace {
                    return Err(Error::new(
                        ErrorKind::TrailingComma,
                        "trailing comma is not allowed in objects",
                        token.index,
                    ));
                }
            }
            TokenKind::RBrace => break,
            _ => {
                return Err(Error::new(
                    ErrorKind::MissingTerminator,
                    "expected closing object brace `}`",
                    token.index,
                ))
            }
        }
    }
    Ok(p.builder.push_container(key, ValueKind::Object, &children))
}

/// See: https://tools.ietf.org/html/rfc8259#section-5
///
/// ```txt
/// array = begin-array [ value *( value-separator value ) ] end-array
/// ```
fn array(p: &mut Parser<'_>, key: Option<StringId>) -> Result<ValueId, Error> {
    let mut children = Vec::new();
    if p.peek()?.kind == TokenKind::RBracket {
        p.bump()?;
        return Ok(p.builder.push_container(key, ValueKind::Array, &children));
    }
    loop {
        children.push(value(p, None)?);

        let token = p.bump()?;
        match token.kind {
            TokenKind::Comma => {
                if p.peek()?.kind == TokenKind::RBracket {
                    return Err(Error::new(
                        ErrorKind::TrailingComma,
                        "trailing comma is not allowed in arrays",
                        token.index,
                    ));
                }
            }
            TokenKind::RBracket => break,
            _ => {
                return Err(Error::new(
                    ErrorKind::MissingTerminator,
                    "expected closing array bracket `]`",
                    token.index,
                ))
            }
        }
    }
    Ok(p.builder.push_container(key, ValueKind::Array, &children))
}
