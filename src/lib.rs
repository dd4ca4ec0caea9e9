//! # pile
//!
//! pile is a build tool whose configuration files are programs in Eve, a
//! small scripting language whose values carry their type at run time;
//! every operation checks the types it is given. This crate holds the Eve
//! interpreter: it lexes, parses and evaluates a build script line by line
//! and leaves the script's results (`OUTPUT`, `SOURCES`, `CFLAGS`, ...) in
//! its global scope for the driver to read.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::path::Path;

use crate::interpreter::{evaluator::core::Interpreter, output::CaptureOutputter};

pub use crate::interpreter::output::Captured;

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` enum and related types that represent the
/// syntactic structure of a statement as a tree. The tree is built by the
/// parser and walked by the evaluator.
///
/// # Responsibilities
/// - Defines literals, operators, expressions and statements.
/// - Carries operator precedence and associativity.
/// - Describes function signatures and parameters.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing or
/// evaluating a statement. The interpreter reports them through its output
/// sink at the statement boundary.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of script execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, output and file system access to provide a complete
/// runtime for Eve scripts.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for running files, source text and single lines.
/// - Exposes the collaborators an embedding application can replace.
pub mod interpreter;
/// General utilities for escape sequences and safe numeric conversion.
///
/// # Responsibilities
/// - Translate escape sequences the same way everywhere.
/// - Safely convert between `i32`, `f32`, `usize` and `u64` without silent
///   data loss.
pub mod util;

/// Runs Eve source text in a fresh interpreter and captures what it prints.
///
/// # Returns
/// Whether the script ran without errors, the captured output and
/// diagnostics, and the interpreter for reading globals back.
///
/// # Examples
/// ```
/// use pile::run_source;
///
/// let (ok, captured, _) = run_source("demo", "println(1 + 2 * 3)");
/// assert!(ok);
/// assert_eq!(captured.output, "7\n");
///
/// // Unknown names are reported with file and line.
/// let (ok, captured, _) = run_source("demo", "int y\ny = x + 1");
/// assert!(!ok);
/// assert_eq!(captured.errors, ["demo:2: 'x' is not declared"]);
/// ```
#[must_use]
pub fn run_source(name: &str, source: &str) -> (bool, Captured, Interpreter) {
    let capture = CaptureOutputter::default();
    let mut interpreter = Interpreter::new().with_outputter(capture.clone());
    let ok = interpreter.read_source(name, source);
    (ok, capture.captured(), interpreter)
}

/// Runs an Eve file in a fresh interpreter and captures what it prints.
///
/// A file that cannot be read is reported like any other error.
#[must_use]
pub fn run_file(path: impl AsRef<Path>) -> (bool, Captured, Interpreter) {
    let capture = CaptureOutputter::default();
    let mut interpreter = Interpreter::new().with_outputter(capture.clone());
    let ok = interpreter.read_file(path);
    (ok, capture.captured(), interpreter)
}
