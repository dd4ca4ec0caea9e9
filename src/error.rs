/// Lexical and syntax errors.
///
/// Defines all error types that can occur while tokenizing a source line or
/// while turning a token run into statements and expression trees. These
/// errors are detected before anything in the statement is evaluated.
pub mod parse_error;
/// Semantic errors.
///
/// Contains all error types that can be raised while evaluating a statement:
/// type mismatches, undeclared names, bad calls, out-of-range indices and
/// failures reported by the file system collaborator.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any error a statement can fail with.
///
/// Internal interpreter functions return this type and propagate it with `?`
/// up to the statement boundary, where the interpreter reports it through the
/// output sink and carries on with the next statement.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A lexical or syntax error.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A semantic error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Returns the runtime error, if this is one.
    #[must_use]
    pub const fn as_runtime(&self) -> Option<&RuntimeError> {
        match self {
            Self::Runtime(e) => Some(e),
            Self::Parse(_) => None,
        }
    }

    /// Returns `true` for errors that abort the whole call chain instead of
    /// just the current statement.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self,
                 Self::Runtime(RuntimeError::CallDepthExceeded { .. }
                               | RuntimeError::IncludeDepthExceeded { .. }))
    }
}
