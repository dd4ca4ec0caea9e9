/// Escape-sequence translation.
///
/// Shared by the lexer, which translates escapes inside quoted strings and
/// rejects unknown ones, and by the printing built-ins, which translate
/// escapes found in the text they are given and keep unknown ones verbatim.
pub mod escape;
/// Numeric conversion helpers.
///
/// This module provides checked conversions between Eve's 32-bit numeric
/// types and the host's integer types, so casts and indexing never silently
/// wrap or truncate out-of-range values.
pub mod num;
/// Stack growth for nested script execution.
///
/// Function calls and includes recurse through the line driver; this module
/// grows the native stack on demand so the configured depth limits, not the
/// thread's stack size, decide how deep a script may go.
pub mod stack;
