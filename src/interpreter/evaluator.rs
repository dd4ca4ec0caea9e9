/// Binary operator evaluation logic.
///
/// Handles arithmetic, concatenation, comparisons, bitwise and logical
/// operators, and the assignment family.
pub mod binary;

/// Class registration and object instantiation.
///
/// Builds class templates from declaration bodies, registers them, and stamps
/// out objects with zero-valued fields.
pub mod class;

/// Core interpreter state.
///
/// Contains the `Interpreter` itself, its options, the statement flow markers
/// and identifier resolution.
pub mod core;

/// Line-by-line execution.
///
/// Drives files, includes and function bodies through the lexer, statement
/// splitting, conditional scopes and declaration body capture.
pub mod driver;

/// Expression tree evaluation.
///
/// Walks an expression tree and produces operands: references to storage
/// slots or temporaries.
pub mod expression;

/// Function evaluation.
///
/// Handles built-in, native and user-defined function calls, argument
/// binding and return value checks.
pub mod function;

/// The scope chain.
///
/// Lexical environments, their isolation and conditional flags.
pub mod scope;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;

/// Utility functions for evaluation.
///
/// Argument extraction for built-ins and script-relative path resolution.
pub mod utils;
