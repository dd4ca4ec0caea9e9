/// The evaluator module runs Eve programs.
///
/// The evaluator drives source lines through statement splitting, keeps the
/// scope chain and the `if`/`else` state, evaluates expression trees, and
/// runs built-in, native and user-defined functions. It is the core
/// execution engine of the interpreter.
///
/// # Responsibilities
/// - Executes files, included files and function bodies line by line.
/// - Handles variables, classes, objects, functions and control flow.
/// - Reports every error at its file and line and keeps going.
pub mod evaluator;
/// The file system collaborator.
///
/// Everything a script reads or changes on disk goes through the
/// [`io::FileSystem`] trait.
pub mod io;
/// The lexer module tokenizes one source line at a time.
///
/// The lexer reads a physical line and produces tokens for literals,
/// identifiers, operators, separators and keywords, keeping the source text of
/// each token. Comments are dropped and the `...` continuation marker is
/// reported separately.
///
/// # Responsibilities
/// - Converts a line into tokens.
/// - Translates escapes inside string literals.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// Where script output and diagnostics go.
pub mod output;
/// The parser module turns tokens into statements and expression trees.
///
/// The parser splits a logical line into units, recognizes declaration
/// headers, and builds expression trees with operator precedence resolved.
///
/// # Responsibilities
/// - Splits lines into `if`, `else`, brace, `return` and statement units.
/// - Parses function signatures and `class`/`procedure` headers.
/// - Validates expression syntax.
pub mod parser;
/// The value module defines the runtime data of Eve.
///
/// This module declares every value type used during execution, such as
/// booleans, integers, floats, strings, macros, arrays, lists, functions,
/// classes and objects. It also provides the conversion table and the copy
/// semantics of assignment.
///
/// # Responsibilities
/// - Defines the `Value` enum, type tags and storage slots.
/// - Implements conversion between types.
/// - Defines classes, objects and function values.
pub mod value;
