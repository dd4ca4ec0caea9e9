use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{lexer::Token, parser::binary::parse_binary},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// Parsing stops at the first token that can neither continue an operand
/// nor start a binary operator; the caller decides whether that token is
/// legal there.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first token of the
///   expression.
///
/// # Returns
/// The parsed expression tree.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_binary(tokens)
}

/// Parses a token slice that must hold exactly one expression.
///
/// # Errors
/// Returns `UnexpectedTrailingTokens` if tokens remain after the
/// expression, plus any error from parsing it.
///
/// # Example
/// ```
/// use pile::{
///     ast::{Expr, Literal, Operator},
///     interpreter::{lexer::tokenize, parser::core::parse_tokens},
/// };
///
/// let tokens = tokenize("1 + 2 * 3").unwrap().tokens;
/// let expr = parse_tokens(&tokens).unwrap();
///
/// let product = Expr::binary(Operator::Multiply,
///                            Expr::Literal(Literal::Int(2)),
///                            Expr::Literal(Literal::Int(3)));
/// assert_eq!(expr, Expr::binary(Operator::Add, Expr::Literal(Literal::Int(1)), product));
/// ```
pub fn parse_tokens(tokens: &[Token]) -> ParseResult<Expr> {
    let mut iter = tokens.iter().peekable();
    let expr = parse_expression(&mut iter)?;

    match iter.next() {
        Some(token) => Err(ParseError::UnexpectedTrailingTokens { token: token.text.clone() }),
        None => Ok(expr),
    }
}
