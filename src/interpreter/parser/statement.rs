use crate::{
    ast::{Operator, Parameter, Signature, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Keyword, Separator, Token, TokenKind},
        parser::{
            core::{ParseResult, parse_tokens},
            utils::{expect_identifier, parse_type, peek_separator},
        },
    },
};

/// Parses the tokens of one statement unit.
///
/// Recognizes, in order:
/// - `class Name` and `procedure name` headers,
/// - function headers `T name(T a, T &b)`, where `T` is a type keyword or a
///   class name with optional `[]` suffixes,
/// - anything else as an expression, declarations included.
///
/// Bodies are not part of the unit; the driver captures them from the `{`
/// that follows.
///
/// # Parameters
/// - `tokens`: The unit's tokens.
///
/// # Returns
/// The parsed statement.
///
/// # Example
/// ```
/// use pile::{
///     ast::Statement,
///     interpreter::{lexer::tokenize, parser::statement::parse_statement, value::types::Type},
/// };
///
/// let tokens = tokenize("string join(string[] parts, string &sep)").unwrap().tokens;
/// let Statement::Function(signature) = parse_statement(&tokens).unwrap() else {
///     panic!("expected a function header");
/// };
/// assert_eq!(signature.name, "join");
/// assert_eq!(signature.params[0].ty, Type::array_of(Type::String));
/// assert!(signature.params[1].by_ref);
/// ```
pub fn parse_statement(tokens: &[Token]) -> ParseResult<Statement> {
    match tokens.first().map(|t| &t.kind) {
        Some(TokenKind::Keyword(Keyword::Class)) => {
            parse_header(&tokens[1..]).map(Statement::Class)
        },
        Some(TokenKind::Keyword(Keyword::Procedure)) => {
            parse_header(&tokens[1..]).map(Statement::Procedure)
        },
        _ if is_signature(tokens) => parse_signature(tokens).map(Statement::Function),
        _ => parse_tokens(tokens).map(Statement::Expression),
    }
}

/// Parses the single name of a `class` or `procedure` header.
fn parse_header(tokens: &[Token]) -> ParseResult<String> {
    let mut iter = tokens.iter().peekable();
    let name = expect_identifier(&mut iter)?;

    match iter.next() {
        Some(token) => Err(ParseError::UnexpectedTrailingTokens { token: token.text.clone() }),
        None => Ok(name),
    }
}

/// Returns `true` if the tokens start like `T name(`.
fn is_signature(tokens: &[Token]) -> bool {
    let mut iter = tokens.iter().peekable();

    if parse_type(&mut iter).is_err() || expect_identifier(&mut iter).is_err() {
        return false;
    }
    peek_separator(&mut iter, Separator::LParen)
}

/// Parses a function header.
///
/// Grammar:
/// ```text
///     signature := type name "(" ( param ( "," param )* )? ")"
///     param     := type "&"? name
/// ```
fn parse_signature(tokens: &[Token]) -> ParseResult<Signature> {
    let invalid = |details: &str| ParseError::InvalidFunctionDeclaration { details: details.to_string() };

    let mut iter = tokens.iter().peekable();
    let return_type = parse_type(&mut iter)?;
    let name = expect_identifier(&mut iter)?;
    iter.next();

    let mut params = Vec::new();

    if peek_separator(&mut iter, Separator::RParen) {
        iter.next();
    } else {
        loop {
            let ty = parse_type(&mut iter).map_err(|_| invalid("expected a parameter type"))?;
            let by_ref = iter.next_if(|t| t.kind == TokenKind::Operator(Operator::BitAnd))
                             .is_some();
            let param = expect_identifier(&mut iter).map_err(|_| invalid("expected a parameter name"))?;
            params.push(Parameter { ty,
                                    name: param,
                                    by_ref });

            match iter.next() {
                Some(token) if token.is_separator(Separator::Comma) => {},
                Some(token) if token.is_separator(Separator::RParen) => break,
                _ => return Err(invalid("expected ',' or ')' after a parameter")),
            }
        }
    }

    if let Some(token) = iter.next() {
        return Err(ParseError::UnexpectedTrailingTokens { token: token.text.clone() });
    }

    Ok(Signature { name,
                   return_type,
                   params })
}
