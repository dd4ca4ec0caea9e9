use std::iter::Peekable;

use crate::{
    ast::{Expr, Operator},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{core::ParseResult, unary::parse_postfix},
    },
};

/// Parses operands joined by binary operators into a single tree.
///
/// Operands and operators are collected left to right. Before an incoming
/// binary operator is pushed, every waiting operator that binds at least as
/// tightly (respecting right associativity on ties) is applied to the
/// operands below it. Prefix `-` and `!` wait on the same stack, so they
/// bind tighter than every binary operator. Whatever is left is applied
/// at the end.
///
/// `a + b * c + d` therefore becomes `(a + (b * c)) + d`, and
/// `a = b = c` becomes `a = (b = c)`.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first operand.
///
/// # Returns
/// The expression tree.
pub fn parse_binary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut operands = Vec::new();
    let mut operators: Vec<Operator> = Vec::new();

    loop {
        while let Some(op) = tokens.peek().and_then(|t| prefix_operator(t)) {
            tokens.next();
            operators.push(op);
        }

        operands.push(parse_postfix(tokens)?);

        let Some(op) = tokens.peek().and_then(|t| binary_operator(t)) else {
            break;
        };
        tokens.next();

        while let Some(&pending) = operators.last()
              && pending.reduces_before(op)
        {
            operators.pop();
            apply(pending, &mut operands)?;
        }
        operators.push(op);
    }

    while let Some(op) = operators.pop() {
        apply(op, &mut operands)?;
    }

    operands.pop().ok_or(ParseError::UnexpectedEndOfInput)
}

/// Maps a token in operand position to a prefix operator.
const fn prefix_operator(token: &Token) -> Option<Operator> {
    match token.kind {
        TokenKind::Operator(Operator::Subtract | Operator::Negate) => Some(Operator::Negate),
        TokenKind::Operator(Operator::Not) => Some(Operator::Not),
        _ => None,
    }
}

/// Maps a token after an operand to a binary operator.
const fn binary_operator(token: &Token) -> Option<Operator> {
    match token.kind {
        TokenKind::Operator(op) if op.is_binary() => Some(op),
        _ => None,
    }
}

/// Pops the operands of `op` and pushes the combined node.
fn apply(op: Operator, operands: &mut Vec<Expr>) -> ParseResult<()> {
    let right = operands.pop().ok_or(ParseError::UnexpectedEndOfInput)?;

    let node = if op.is_binary() {
        let left = operands.pop().ok_or(ParseError::UnexpectedEndOfInput)?;
        Expr::binary(op, left, right)
    } else {
        Expr::Unary { op,
                      operand: Box::new(right) }
    };

    operands.push(node);
    Ok(())
}
