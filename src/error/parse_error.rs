/// Represents all errors that can occur during lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A character that does not start any token.
    #[error("unexpected character '{text}'")]
    UnexpectedCharacter {
        /// The offending source text.
        text: String,
    },
    /// A string literal without its closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A backslash followed by a character with no escape meaning.
    #[error("unknown escape sequence '\\{escape}'")]
    UnknownEscape {
        /// The character after the backslash.
        escape: char,
    },
    /// A numeric literal with more than one decimal point.
    #[error("malformed number '{text}'")]
    MalformedNumber {
        /// The literal as written.
        text: String,
    },
    /// An integer literal that does not fit in 32 bits.
    #[error("integer literal '{text}' is out of range")]
    IntegerOutOfRange {
        /// The literal as written.
        text: String,
    },
    /// A `.` that is neither member access, a float nor a continuation.
    #[error("unexpected '.'")]
    StrayDot,
    /// A continuation marker that is not the last token on the line.
    #[error("'...' must be the last token on a line")]
    MisplacedContinuation,
    /// Found an unexpected token while parsing.
    #[error("unexpected token '{token}'")]
    UnexpectedToken {
        /// The token encountered.
        token: String,
    },
    /// Reached the end of the statement unexpectedly.
    #[error("unexpected end of statement")]
    UnexpectedEndOfInput,
    /// An opening delimiter without its closing counterpart.
    #[error("expected closing '{delimiter}'")]
    ExpectedClosing {
        /// The missing delimiter.
        delimiter: char,
    },
    /// An identifier was required.
    #[error("expected identifier, found '{found}'")]
    ExpectedIdentifier {
        /// What was found instead.
        found: String,
    },
    /// A function signature that could not be parsed.
    #[error("invalid function declaration: {details}")]
    InvalidFunctionDeclaration {
        /// What was wrong with it.
        details: String,
    },
    /// A call argument that is empty or not a complete expression.
    #[error("invalid argument {index}")]
    InvalidArgument {
        /// One-based argument position.
        index: usize,
    },
    /// `if` not followed by a parenthesized condition.
    #[error("expected '(' after 'if'")]
    MissingCondition,
    /// A type name where a value was expected.
    #[error("unexpected type name '{name}'")]
    UnexpectedTypeName {
        /// The type as written.
        name: String,
    },
    /// A declaration whose body never opens with `{`.
    #[error("expected '{{' to begin the body of '{name}'")]
    ExpectedBody {
        /// The declared name.
        name: String,
    },
    /// A declaration body whose braces never balance.
    #[error("unterminated body of '{name}'")]
    UnterminatedBody {
        /// The declared name.
        name: String,
    },
    /// Found extra tokens after parsing should have completed.
    #[error("extra tokens after statement: '{token}'")]
    UnexpectedTrailingTokens {
        /// The first extra token.
        token: String,
    },
    /// A statement inside a class body that is neither a field nor a method.
    #[error("class bodies may only contain field and method declarations")]
    InvalidClassMember,
}
