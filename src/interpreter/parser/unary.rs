use std::iter::Peekable;

use crate::{
    ast::{Expr, Operator},
    error::ParseError,
    interpreter::{
        lexer::{Separator, Token, TokenKind, Variable},
        parser::{
            core::{ParseResult, parse_expression},
            utils::{expect_separator, parse_comma_separated, parse_type_suffix, peek_separator},
        },
        value::types::Type,
    },
};

/// Parses an operand followed by any number of postfix forms.
///
/// Grammar:
/// ```text
///     postfix := primary ( "(" arguments ")" | "[" expression "]" | "." identifier )*
/// ```
///
/// Indexing becomes an `ArrayAccess` binary node; calls and member access
/// get their own nodes. Postfix forms bind tighter than every operator, so
/// `obj.method(x)` calls the member and `-a[0]` negates the element.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the operand.
///
/// # Returns
/// The operand expression.
pub fn parse_postfix<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut expr = parse_primary(tokens)?;

    loop {
        let Some(&token) = tokens.peek() else { break };

        match &token.kind {
            TokenKind::Separator(Separator::LParen) => {
                tokens.next();
                let arguments = parse_arguments(tokens)?;
                expr = Expr::Call { callee: Box::new(expr),
                                    arguments };
            },
            TokenKind::Separator(Separator::LBracket) => {
                tokens.next();
                let index = parse_expression(tokens)?;
                expect_separator(tokens, Separator::RBracket)?;
                expr = Expr::binary(Operator::ArrayAccess, expr, index);
            },
            TokenKind::Operator(Operator::Member) => {
                tokens.next();
                let name = match tokens.next() {
                    Some(Token { kind: TokenKind::Variable(Variable::Identifier(name)),
                                 .. }) if !name.starts_with('.') => name.clone(),
                    Some(other) => {
                        return Err(ParseError::ExpectedIdentifier { found: other.text.clone() });
                    },
                    None => return Err(ParseError::UnexpectedEndOfInput),
                };
                expr = Expr::Member { object: Box::new(expr),
                                      name };
            },
            _ => break,
        }
    }

    Ok(expr)
}

/// Parses a single operand.
///
/// Handles literals, parenthesized expressions, array literals and every
/// form that starts with an identifier:
/// - `T name`, `T[] name` and `Class name` declarations,
/// - `T(x)` casts for the type keywords,
/// - `.name`, the member of the current method's receiver,
/// - plain names, resolved at evaluation time.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(token) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput);
    };

    match &token.kind {
        TokenKind::Variable(Variable::Literal(literal)) => Ok(Expr::Literal(literal.clone())),
        TokenKind::Variable(Variable::Identifier(name)) => parse_identifier(tokens, name),
        TokenKind::Separator(Separator::LParen) => {
            let inner = parse_expression(tokens)?;
            expect_separator(tokens, Separator::RParen)?;
            Ok(inner)
        },
        TokenKind::Separator(Separator::LBracket) => {
            let elements = parse_comma_separated(tokens, parse_expression, Separator::RBracket)?;
            Ok(Expr::ArrayLiteral(elements))
        },
        _ => Err(ParseError::UnexpectedToken { token: token.text.clone() }),
    }
}

/// Parses the forms that begin with an identifier.
fn parse_identifier<'a, I>(tokens: &mut Peekable<I>, name: &str) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    if let Some(member) = name.strip_prefix('.') {
        return Ok(Expr::ThisMember(member.to_string()));
    }

    let keyword = Type::from_keyword(name);

    if let Some(ty) = &keyword
       && peek_separator(tokens, Separator::LParen)
    {
        tokens.next();
        let arguments = parse_arguments(tokens)?;
        return Ok(Expr::Cast { ty: ty.clone(),
                               arguments });
    }

    // A declaration needs a declared name after the (possibly array) type.
    let mut ahead = tokens.clone();
    let base = keyword.unwrap_or_else(|| Type::Object(name.to_string()));
    let ty = parse_type_suffix(&mut ahead, base);

    if let Some(&next) = ahead.peek()
       && let Some(declared) = next.identifier()
       && !declared.starts_with('.')
    {
        ahead.next();
        *tokens = ahead;
        return Ok(Expr::Declare { ty,
                                  name: declared.to_string() });
    }

    if matches!(ty, Type::Array(_)) {
        return Err(ParseError::UnexpectedTypeName { name: ty.to_string() });
    }

    Ok(Expr::Identifier(name.to_string()))
}

/// Parses call arguments after the opening parenthesis, through the closing
/// one.
///
/// Each argument must be a complete expression followed by `,` or `)`;
/// anything else is reported against the argument's position.
fn parse_arguments<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Expr>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut arguments = Vec::new();

    if peek_separator(tokens, Separator::RParen) {
        tokens.next();
        return Ok(arguments);
    }

    loop {
        let index = arguments.len() + 1;
        let argument =
            parse_expression(tokens).map_err(|_| ParseError::InvalidArgument { index })?;
        arguments.push(argument);

        match tokens.next() {
            Some(token) if token.is_separator(Separator::Comma) => {},
            Some(token) if token.is_separator(Separator::RParen) => break,
            Some(_) => return Err(ParseError::InvalidArgument { index }),
            None => return Err(ParseError::ExpectedClosing { delimiter: ')' }),
        }
    }

    Ok(arguments)
}
