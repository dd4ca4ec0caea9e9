use crate::{
    error::ParseError,
    interpreter::lexer::{Keyword, Separator, Token, TokenKind},
};

/// One piece of a logical line, as the driver executes it.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitKind {
    /// `if (cond)`, holding the condition's tokens.
    If(Vec<Token>),
    /// `else`
    Else,
    /// `{`
    Open,
    /// `}`
    Close,
    /// `return` with the tokens of its (possibly empty) expression.
    Return(Vec<Token>),
    /// Any other statement.
    Statement(Vec<Token>),
    /// A malformed `if`; the rest of the line is dropped.
    Invalid(ParseError),
}

/// A unit together with the index of its first token in the line.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// What the unit is.
    pub kind:   UnitKind,
    /// Index of the unit's first token.
    pub offset: usize,
}

/// Tracks the statement being collected while splitting.
struct Pending {
    tokens:    Vec<Token>,
    offset:    usize,
    is_return: bool,
}

impl Pending {
    const fn new() -> Self {
        Self { tokens:    Vec::new(),
               offset:    0,
               is_return: false, }
    }

    fn flush(&mut self, units: &mut Vec<Unit>) {
        let tokens = std::mem::take(&mut self.tokens);
        if self.is_return {
            units.push(Unit { kind:   UnitKind::Return(tokens),
                              offset: self.offset, });
        } else if !tokens.is_empty() {
            units.push(Unit { kind:   UnitKind::Statement(tokens),
                              offset: self.offset, });
        }
        self.is_return = false;
    }

    fn push(&mut self, index: usize, token: &Token) {
        if self.tokens.is_empty() && !self.is_return {
            self.offset = index;
        }
        self.tokens.push(token.clone());
    }
}

/// Splits the tokens of a logical line into units.
///
/// Outside of parentheses and brackets, `;` ends a statement, `{`, `}` and
/// `else` stand alone, `if` takes the parenthesized condition that must
/// follow it, and `return` takes everything up to the end of its statement.
/// Empty statements vanish.
///
/// # Example
/// ```
/// use pile::interpreter::{
///     lexer::tokenize,
///     parser::block::{UnitKind, split_units},
/// };
///
/// let tokens = tokenize("if (a) { x = 1 } else x = 2; y = 3").unwrap().tokens;
/// let kinds: Vec<_> = split_units(&tokens).into_iter().map(|u| u.kind).collect();
///
/// assert!(matches!(kinds[0], UnitKind::If(_)));
/// assert_eq!(kinds[1], UnitKind::Open);
/// assert!(matches!(kinds[2], UnitKind::Statement(_)));
/// assert_eq!(kinds[3], UnitKind::Close);
/// assert_eq!(kinds[4], UnitKind::Else);
/// assert_eq!(kinds.len(), 7);
/// ```
#[must_use]
pub fn split_units(tokens: &[Token]) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut pending = Pending::new();
    let mut depth = 0usize;
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];

        if depth == 0 {
            let alone = match &token.kind {
                TokenKind::Separator(Separator::Semicolon) => Some(None),
                TokenKind::Separator(Separator::LBrace) => Some(Some(UnitKind::Open)),
                TokenKind::Separator(Separator::RBrace) => Some(Some(UnitKind::Close)),
                TokenKind::Keyword(Keyword::Else) => Some(Some(UnitKind::Else)),
                _ => None,
            };

            if let Some(unit) = alone {
                pending.flush(&mut units);
                if let Some(kind) = unit {
                    units.push(Unit { kind,
                                      offset: index });
                }
                index += 1;
                continue;
            }

            if token.is_keyword(Keyword::If) {
                pending.flush(&mut units);
                match condition_end(tokens, index + 1) {
                    Ok(close) => {
                        units.push(Unit { kind:   UnitKind::If(tokens[index + 2..close].to_vec()),
                                          offset: index, });
                        index = close + 1;
                        continue;
                    },
                    Err(e) => {
                        units.push(Unit { kind:   UnitKind::Invalid(e),
                                          offset: index, });
                        return units;
                    },
                }
            }

            if token.is_keyword(Keyword::Return) {
                pending.flush(&mut units);
                pending.is_return = true;
                pending.offset = index;
                index += 1;
                continue;
            }
        }

        match token.kind {
            TokenKind::Separator(Separator::LParen | Separator::LBracket) => depth += 1,
            TokenKind::Separator(Separator::RParen | Separator::RBracket) => {
                depth = depth.saturating_sub(1);
            },
            _ => {},
        }
        pending.push(index, token);
        index += 1;
    }

    pending.flush(&mut units);
    units
}

/// Finds the `)` closing the condition whose `(` is at `open`.
fn condition_end(tokens: &[Token], open: usize) -> Result<usize, ParseError> {
    if !tokens.get(open).is_some_and(|t| t.is_separator(Separator::LParen)) {
        return Err(ParseError::MissingCondition);
    }

    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::Separator(Separator::LParen) => depth += 1,
            TokenKind::Separator(Separator::RParen) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(index);
                }
            },
            _ => {},
        }
    }

    Err(ParseError::ExpectedClosing { delimiter: ')' })
}
