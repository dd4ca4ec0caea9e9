/// Statement splitting.
///
/// Cuts the tokens of a logical line into units: conditions, `else`, braces,
/// `return` and plain statements.
pub mod block;

/// Binary expression parsing.
///
/// Resolves operator precedence and associativity with an explicit operator
/// stack.
pub mod binary;

/// Entry point for expression parsing.
pub mod core;

/// Operand parsing.
///
/// Literals, identifiers, declarations, casts, array literals, parenthesized
/// expressions and the postfix forms (calls, indexing, member access).
pub mod unary;

/// Shared parsing helpers.
pub mod utils;

/// Statement parsing.
///
/// Turns one statement unit into an expression, a function signature or a
/// class/procedure header.
pub mod statement;
