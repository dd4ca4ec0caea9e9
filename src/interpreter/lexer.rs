use logos::Logos;

use crate::{
    ast::{Literal, Operator},
    error::ParseError,
    util::escape::unescape,
};

/// Failure kinds raised inside the logos callbacks; turned into
/// [`ParseError`] once the offending slice is known.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexError {
    /// No token starts here.
    #[default]
    Unexpected,
    /// A string literal without closing quote.
    Unterminated,
    /// An unknown escape sequence inside a string literal.
    Escape(char),
    /// A number with more than one `.`.
    Malformed,
    /// An integer that does not fit in 32 bits.
    OutOfRange,
}

/// Raw lexemes recognized by logos.
///
/// These are cooked into [`Token`]s by [`tokenize`], which resolves the
/// context-dependent cases (leading dots, keywords, the continuation marker).
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\f\v]+")]
enum RawToken {
    /// `// ...` runs to the end of the line.
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// A double-quoted string; the callback consumes up to the closing quote.
    #[token("\"", lex_string)]
    Str(String),
    /// Float literals such as `3.14`, `2.` or `.5`.
    #[regex(r"[0-9]+\.[0-9]*", lex_float)]
    #[regex(r"\.[0-9]+", lex_float)]
    #[regex(r"[0-9]+\.[0-9]+\.[0-9.]*", lex_malformed)]
    Float(f32),
    /// Integer literals such as `42`; up to 2^31 so `-2147483648` can be
    /// folded.
    #[regex(r"[0-9]+", lex_integer)]
    Int(i64),
    /// Names and keywords.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,
    /// `...`
    #[token("...")]
    Ellipsis,
    /// `..`
    #[token("..")]
    DotDot,
    /// `.`
    #[token(".")]
    Dot,
    #[token("**=")]
    PowerAssign,
    #[token("**")]
    Power,
    #[token("*=")]
    MultiplyAssign,
    #[token("*")]
    Star,
    #[token("/=")]
    DivideAssign,
    #[token("/")]
    Slash,
    #[token("%=")]
    ModuloAssign,
    #[token("%")]
    Percent,
    #[token("+=")]
    AddAssign,
    #[token("+")]
    Plus,
    #[token("-=")]
    SubtractAssign,
    #[token("-")]
    Minus,
    #[token("==")]
    EqualEqual,
    #[token("=")]
    Equals,
    #[token("!=")]
    BangEqual,
    #[token("!")]
    Bang,
    #[token("<=")]
    LessEqual,
    #[token("<")]
    Less,
    #[token(">=")]
    GreaterEqual,
    #[token(">")]
    Greater,
    #[token("&&")]
    AndAnd,
    #[token("&")]
    Ampersand,
    #[token("||")]
    PipePipe,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
}

/// Consumes a string literal after its opening quote.
///
/// Stops at the first quote not preceded by a backslash and translates the
/// escapes in between.
fn lex_string(lex: &mut logos::Lexer<RawToken>) -> Result<String, LexError> {
    let rest = lex.remainder();
    let mut escaped = false;
    let mut end = None;

    for (index, c) in rest.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            end = Some(index);
            break;
        }
    }

    match end {
        Some(index) => {
            let body = rest[..index].to_string();
            lex.bump(index + 1);
            unescape(&body).map_err(LexError::Escape)
        },
        None => {
            let len = rest.len();
            lex.bump(len);
            Err(LexError::Unterminated)
        },
    }
}

/// Parses a floating-point literal from the current token slice.
fn lex_float(lex: &mut logos::Lexer<RawToken>) -> Result<f32, LexError> {
    lex.slice().parse().map_err(|_| LexError::Malformed)
}

/// Rejects a number with a second `.`.
fn lex_malformed(_: &mut logos::Lexer<RawToken>) -> Result<f32, LexError> {
    Err(LexError::Malformed)
}

/// Parses the magnitude of an integer literal from the current token slice.
///
/// The magnitude may be one past `i32::MAX`; only a unary minus in front
/// makes that a valid literal, which [`tokenize`] checks.
fn lex_integer(lex: &mut logos::Lexer<RawToken>) -> Result<i64, LexError> {
    lex.slice()
       .parse::<i64>()
       .ok()
       .filter(|magnitude| *magnitude <= MIN_INT_MAGNITUDE)
       .ok_or(LexError::OutOfRange)
}

/// Magnitude of `i32::MIN`.
const MIN_INT_MAGNITUDE: i64 = 1 << 31;

/// Grouping and list punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
}

/// Reserved words that steer statements rather than name values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `if`
    If,
    /// `else`
    Else,
    /// `return`
    Return,
    /// `class`
    Class,
    /// `procedure`
    Procedure,
}

impl Keyword {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "if" => Some(Self::If),
            "else" => Some(Self::Else),
            "return" => Some(Self::Return),
            "class" => Some(Self::Class),
            "procedure" => Some(Self::Procedure),
            _ => None,
        }
    }
}

/// Something that stands for a value: a literal, or a name resolved later.
#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    /// A literal written in the source.
    Literal(Literal),
    /// A name; `.name` keeps its leading dot.
    Identifier(String),
}

/// The classification of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Literals and identifiers.
    Variable(Variable),
    /// Operators, with precedence fixed by the operator itself.
    Operator(Operator),
    /// Grouping and list punctuation.
    Separator(Separator),
    /// Reserved words.
    Keyword(Keyword),
}

/// A lexical token of one source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token is.
    pub kind:   TokenKind,
    /// The source text it was lexed from.
    pub text:   String,
    /// Whether whitespace (or the start of the line) preceded it.
    pub spaced: bool,
}

impl Token {
    /// Returns `true` if the token is the given separator.
    #[must_use]
    pub fn is_separator(&self, separator: Separator) -> bool {
        self.kind == TokenKind::Separator(separator)
    }

    /// Returns `true` if the token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    /// Returns the identifier text, if the token is an identifier.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Variable(Variable::Identifier(name)) => Some(name),
            _ => None,
        }
    }
}

/// The tokens of one physical line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lexed {
    /// Tokens in source order, without the continuation marker.
    pub tokens:       Vec<Token>,
    /// The line ended in `...` and continues on the next physical line.
    pub continuation: bool,
}

/// Tokenizes a single source line.
///
/// Comments are dropped, string escapes translated, and a trailing `...`
/// reported through [`Lexed::continuation`] instead of being returned as a
/// token. A `.` directly followed by a letter is the member operator when it
/// is glued to the previous token and the start of a `.name` identifier when
/// whitespace precedes it.
///
/// # Errors
/// Returns a [`ParseError`] for unknown characters, unterminated strings,
/// unknown escapes, malformed or out-of-range numbers and stray dots.
///
/// # Example
/// ```
/// use pile::interpreter::lexer::tokenize;
///
/// let lexed = tokenize("int x = 3 + ... // more below").unwrap();
/// assert_eq!(lexed.tokens.len(), 5);
/// assert!(lexed.continuation);
/// ```
pub fn tokenize(line: &str) -> Result<Lexed, ParseError> {
    let mut raw = Vec::new();
    let mut lexer = RawToken::lexer(line);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = &line[span.clone()];
        match result {
            Ok(token) => raw.push((token, span)),
            Err(e) => return Err(lex_error(e, text)),
        }
    }

    let mut lexed = Lexed::default();
    let mut index = 0;

    while index < raw.len() {
        let (token, span) = &raw[index];
        let text = &line[span.clone()];
        let spaced = span.start == 0 || line[..span.start].ends_with(char::is_whitespace);

        let kind = match token {
            RawToken::Ellipsis => {
                if index + 1 != raw.len() {
                    return Err(ParseError::MisplacedContinuation);
                }
                lexed.continuation = true;
                index += 1;
                continue;
            },
            RawToken::DotDot => return Err(ParseError::StrayDot),
            RawToken::Dot => {
                let glued_word = raw.get(index + 1)
                                    .filter(|(next, next_span)| {
                                        *next == RawToken::Word && next_span.start == span.end
                                    })
                                    .map(|(_, next_span)| next_span.clone());
                match glued_word {
                    Some(word) if spaced => {
                        let name = &line[span.start..word.end];
                        lexed.tokens.push(Token { kind:   TokenKind::Variable(Variable::Identifier(name.to_string())),
                                                  text:   name.to_string(),
                                                  spaced: true, });
                        index += 2;
                        continue;
                    },
                    Some(_) => TokenKind::Operator(Operator::Member),
                    None => return Err(ParseError::StrayDot),
                }
            },
            RawToken::Word => word_kind(text),
            RawToken::Str(s) => TokenKind::Variable(Variable::Literal(Literal::String(s.clone()))),
            RawToken::Float(f) => TokenKind::Variable(Variable::Literal(Literal::Float(*f))),
            RawToken::Int(magnitude) => match i32::try_from(*magnitude) {
                Ok(i) => TokenKind::Variable(Variable::Literal(Literal::Int(i))),
                Err(_) => {
                    fold_int_min(&mut lexed.tokens, text)?;
                    index += 1;
                    continue;
                },
            },
            other => symbol_kind(other),
        };

        lexed.tokens.push(Token { kind,
                                  text: text.to_string(),
                                  spaced });
        index += 1;
    }

    Ok(lexed)
}

/// Renders tokens back to source text that lexes to the same tokens.
///
/// # Example
/// ```
/// use pile::interpreter::lexer::{render, tokenize};
///
/// let tokens = tokenize("a.b  +  .c").unwrap().tokens;
/// assert_eq!(render(&tokens), "a.b + .c");
/// ```
#[must_use]
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (index, token) in tokens.iter().enumerate() {
        if index > 0 && token.spaced {
            out.push(' ');
        }
        out.push_str(&token.text);
    }
    out
}

/// Replaces a unary minus followed by `2147483648` with `i32::MIN`.
///
/// # Errors
/// `IntegerOutOfRange` when the minus is missing or binary.
fn fold_int_min(tokens: &mut Vec<Token>, magnitude: &str) -> Result<(), ParseError> {
    let out_of_range = || ParseError::IntegerOutOfRange { text: magnitude.to_string() };
    let Some(minus) = tokens.last()
                            .filter(|token| token.kind == TokenKind::Operator(Operator::Subtract))
    else {
        return Err(out_of_range());
    };
    let unary = match tokens.len().checked_sub(2).map(|before| &tokens[before].kind) {
        None | Some(TokenKind::Operator(_) | TokenKind::Keyword(_)) => true,
        Some(TokenKind::Separator(separator)) => {
            !matches!(separator, Separator::RParen | Separator::RBracket)
        },
        Some(TokenKind::Variable(_)) => false,
    };
    if !unary {
        return Err(out_of_range());
    }

    let spaced = minus.spaced;
    tokens.pop();
    tokens.push(Token { kind: TokenKind::Variable(Variable::Literal(Literal::Int(i32::MIN))),
                        text: format!("-{magnitude}"),
                        spaced });
    Ok(())
}

fn lex_error(error: LexError, text: &str) -> ParseError {
    match error {
        LexError::Unexpected => ParseError::UnexpectedCharacter { text: text.to_string() },
        LexError::Unterminated => ParseError::UnterminatedString,
        LexError::Escape(escape) => ParseError::UnknownEscape { escape },
        LexError::Malformed => ParseError::MalformedNumber { text: text.to_string() },
        LexError::OutOfRange => ParseError::IntegerOutOfRange { text: text.to_string() },
    }
}

fn word_kind(word: &str) -> TokenKind {
    match word {
        "true" => TokenKind::Variable(Variable::Literal(Literal::Bool(true))),
        "false" => TokenKind::Variable(Variable::Literal(Literal::Bool(false))),
        _ => Keyword::from_word(word).map_or_else(|| {
                                                      TokenKind::Variable(Variable::Identifier(word.to_string()))
                                                  },
                                                  TokenKind::Keyword),
    }
}

fn symbol_kind(token: &RawToken) -> TokenKind {
    use TokenKind::{Operator as Op, Separator as Sep};

    match token {
        RawToken::PowerAssign => Op(Operator::PowerAssign),
        RawToken::Power => Op(Operator::Power),
        RawToken::MultiplyAssign => Op(Operator::MultiplyAssign),
        RawToken::Star => Op(Operator::Multiply),
        RawToken::DivideAssign => Op(Operator::DivideAssign),
        RawToken::Slash => Op(Operator::Divide),
        RawToken::ModuloAssign => Op(Operator::ModuloAssign),
        RawToken::Percent => Op(Operator::Modulo),
        RawToken::AddAssign => Op(Operator::AddAssign),
        RawToken::Plus => Op(Operator::Add),
        RawToken::SubtractAssign => Op(Operator::SubtractAssign),
        RawToken::Minus => Op(Operator::Subtract),
        RawToken::EqualEqual => Op(Operator::Equal),
        RawToken::Equals => Op(Operator::Assign),
        RawToken::BangEqual => Op(Operator::NotEqual),
        RawToken::Bang => Op(Operator::Not),
        RawToken::LessEqual => Op(Operator::LessEqual),
        RawToken::Less => Op(Operator::Less),
        RawToken::GreaterEqual => Op(Operator::GreaterEqual),
        RawToken::Greater => Op(Operator::Greater),
        RawToken::AndAnd => Op(Operator::And),
        RawToken::Ampersand => Op(Operator::BitAnd),
        RawToken::PipePipe => Op(Operator::Or),
        RawToken::Pipe => Op(Operator::BitOr),
        RawToken::Caret => Op(Operator::BitXor),
        RawToken::LParen => Sep(Separator::LParen),
        RawToken::RParen => Sep(Separator::RParen),
        RawToken::LBracket => Sep(Separator::LBracket),
        RawToken::RBracket => Sep(Separator::RBracket),
        RawToken::LBrace => Sep(Separator::LBrace),
        RawToken::RBrace => Sep(Separator::RBrace),
        RawToken::Comma => Sep(Separator::Comma),
        RawToken::Semicolon => Sep(Separator::Semicolon),
        // Cooked by `tokenize` before reaching here.
        RawToken::Comment
        | RawToken::Str(_)
        | RawToken::Float(_)
        | RawToken::Int(_)
        | RawToken::Word
        | RawToken::Ellipsis
        | RawToken::DotDot
        | RawToken::Dot => unreachable!("cooked token {token:?} reached symbol_kind"),
    }
}
