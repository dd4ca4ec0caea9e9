use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Separator, Token},
        parser::core::ParseResult,
        value::types::Type,
    },
};

/// Returns the character a closing separator is written as.
const fn closing_char(separator: Separator) -> char {
    match separator {
        Separator::RParen => ')',
        Separator::RBracket => ']',
        Separator::RBrace => '}',
        Separator::LParen => '(',
        Separator::LBracket => '[',
        Separator::LBrace => '{',
        Separator::Comma => ',',
        Separator::Semicolon => ';',
    }
}

/// Parses a comma-separated list of items until a closing separator.
///
/// An immediately encountered closing separator produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The separator that terminates the list.
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse or if the list is not
/// terminated by `closing`.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: Separator)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();
    if peek_separator(tokens, closing) {
        tokens.next();
        return Ok(items);
    }

    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some(token) if token.is_separator(Separator::Comma) => {},
            Some(token) if token.is_separator(closing) => break,
            Some(token) => return Err(ParseError::UnexpectedToken { token: token.text.clone() }),
            None => {
                return Err(ParseError::ExpectedClosing { delimiter: closing_char(closing) });
            },
        }
    }

    Ok(items)
}

/// Returns `true` if the next token is the given separator, without
/// consuming it.
pub(in crate::interpreter::parser) fn peek_separator<'a, I>(tokens: &mut Peekable<I>,
                                                            separator: Separator)
                                                            -> bool
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().is_some_and(|t| t.is_separator(separator))
}

/// Consumes the given separator.
///
/// # Errors
/// Returns `ExpectedClosing` if the next token is anything else.
pub(in crate::interpreter::parser) fn expect_separator<'a, I>(tokens: &mut Peekable<I>,
                                                              separator: Separator)
                                                              -> ParseResult<()>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) if token.is_separator(separator) => Ok(()),
        _ => Err(ParseError::ExpectedClosing { delimiter: closing_char(separator) }),
    }
}

/// Consumes a plain (not leading-dot) identifier and returns it.
///
/// # Errors
/// Returns `ExpectedIdentifier` for any other token.
pub(in crate::interpreter::parser) fn expect_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                               -> ParseResult<String>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) => match token.identifier() {
            Some(name) if !name.starts_with('.') => Ok(name.to_string()),
            _ => Err(ParseError::ExpectedIdentifier { found: token.text.clone() }),
        },
        None => Err(ParseError::UnexpectedEndOfInput),
    }
}

/// Wraps `base` into one array level per `[]` that follows.
///
/// A `[` not immediately closed by `]` is left alone, so `a[0]` is not
/// mistaken for a type.
pub(in crate::interpreter::parser) fn parse_type_suffix<'a, I>(tokens: &mut Peekable<I>,
                                                               base: Type)
                                                               -> Type
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut ty = base;

    loop {
        let mut ahead = tokens.clone();
        let opened = ahead.next().is_some_and(|t| t.is_separator(Separator::LBracket));
        let closed = ahead.next().is_some_and(|t| t.is_separator(Separator::RBracket));
        if !(opened && closed) {
            return ty;
        }
        *tokens = ahead;
        ty = Type::array_of(ty);
    }
}

/// Parses a type: a type keyword or class name plus any `[]` suffixes.
///
/// # Errors
/// Returns `ExpectedIdentifier` if the next token is not a name.
pub(in crate::interpreter::parser) fn parse_type<'a, I>(tokens: &mut Peekable<I>)
                                                        -> ParseResult<Type>
    where I: Iterator<Item = &'a Token> + Clone
{
    let name = expect_identifier(tokens)?;
    let base = Type::from_keyword(&name).unwrap_or(Type::Object(name));
    Ok(parse_type_suffix(tokens, base))
}
