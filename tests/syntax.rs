use pile::{
    ast::{Expr, Literal, Operator, Parameter, Signature, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Keyword, Separator, TokenKind, Variable, render, tokenize},
        parser::{
            block::{UnitKind, split_units},
            core::parse_tokens,
            statement::parse_statement,
        },
        value::types::Type,
    },
};
use pretty_assertions::assert_eq;

fn parse(src: &str) -> Result<Expr, ParseError> {
    parse_tokens(&tokenize(src).unwrap().tokens)
}

fn statement(src: &str) -> Result<Statement, ParseError> {
    parse_statement(&tokenize(src).unwrap().tokens)
}

fn lit(value: impl Into<Literal>) -> Expr {
    Expr::Literal(value.into())
}

fn ident(name: &str) -> Expr {
    Expr::Identifier(name.to_string())
}

#[test]
fn tokens_carry_their_kind_and_text() {
    let tokens = tokenize("if (x >= 2.5) return \"a\\n\"").unwrap().tokens;
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();

    assert_eq!(kinds,
               vec![TokenKind::Keyword(Keyword::If),
                    TokenKind::Separator(Separator::LParen),
                    TokenKind::Variable(Variable::Identifier("x".to_string())),
                    TokenKind::Operator(Operator::GreaterEqual),
                    TokenKind::Variable(Variable::Literal(Literal::Float(2.5))),
                    TokenKind::Separator(Separator::RParen),
                    TokenKind::Keyword(Keyword::Return),
                    TokenKind::Variable(Variable::Literal(Literal::String("a\n".to_string())))]);
    assert_eq!(tokens[2].text, "x");
}

#[test]
fn numbers() {
    let tokens = tokenize("42 3.25 2. .5").unwrap().tokens;
    let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds,
               vec![TokenKind::Variable(Variable::Literal(Literal::Int(42))),
                    TokenKind::Variable(Variable::Literal(Literal::Float(3.25))),
                    TokenKind::Variable(Variable::Literal(Literal::Float(2.0))),
                    TokenKind::Variable(Variable::Literal(Literal::Float(0.5)))]);
}

#[test]
fn leading_dots_name_members_of_this() {
    let tokens = tokenize("a.b .c").unwrap().tokens;
    assert_eq!(tokens[1].kind, TokenKind::Operator(Operator::Member));
    assert_eq!(tokens[3].identifier(), Some(".c"));
    assert_eq!(render(&tokens), "a.b .c");
}

#[test]
fn continuation_marker() {
    let lexed = tokenize("x = 1 + ...").unwrap();
    assert!(lexed.continuation);
    assert_eq!(lexed.tokens.len(), 4);
    assert!(!tokenize("x = 1").unwrap().continuation);
    assert_eq!(tokenize("x ... y"), Err(ParseError::MisplacedContinuation));
}

#[test]
fn lexical_errors() {
    assert_eq!(tokenize("\"open"), Err(ParseError::UnterminatedString));
    assert_eq!(tokenize("\"\\q\""), Err(ParseError::UnknownEscape { escape: 'q' }));
    assert_eq!(tokenize("1.2.3"), Err(ParseError::MalformedNumber { text: "1.2.3".to_string() }));
    assert_eq!(tokenize("4294967296"),
               Err(ParseError::IntegerOutOfRange { text: "4294967296".to_string() }));
    assert_eq!(tokenize("a .. b"), Err(ParseError::StrayDot));
    assert_eq!(tokenize("a @ b"), Err(ParseError::UnexpectedCharacter { text: "@".to_string() }));
}

#[test]
fn the_smallest_int_folds_its_minus_sign() {
    let tokens = tokenize("x = -2147483648").unwrap().tokens;
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[2].kind, TokenKind::Variable(Variable::Literal(Literal::Int(i32::MIN))));
    assert_eq!(render(&tokens), "x = -2147483648");

    assert_eq!(tokenize("(-2147483648)").unwrap().tokens[1].text, "-2147483648");
    assert_eq!(tokenize("2147483648"),
               Err(ParseError::IntegerOutOfRange { text: "2147483648".to_string() }));
    assert_eq!(tokenize("x -2147483648"),
               Err(ParseError::IntegerOutOfRange { text: "2147483648".to_string() }));
    assert_eq!(tokenize("-2147483649"),
               Err(ParseError::IntegerOutOfRange { text: "2147483649".to_string() }));
}

#[test]
fn comments_produce_no_tokens() {
    assert!(tokenize("// nothing here").unwrap().tokens.is_empty());
    assert_eq!(tokenize("x // y").unwrap().tokens.len(), 1);
}

#[test]
fn precedence_builds_the_expected_tree() {
    assert_eq!(parse("1 + 2 * 3").unwrap(),
               Expr::binary(Operator::Add, lit(1), Expr::binary(Operator::Multiply, lit(2), lit(3))));
    assert_eq!(parse("2 ** 3 ** 2").unwrap(),
               Expr::binary(Operator::Power, lit(2), Expr::binary(Operator::Power, lit(3), lit(2))));
    assert_eq!(parse("a = b = 3").unwrap(),
               Expr::binary(Operator::Assign,
                            ident("a"),
                            Expr::binary(Operator::Assign, ident("b"), lit(3))));
}

#[test]
fn declarations_casts_and_members() {
    assert_eq!(parse("int x").unwrap(),
               Expr::Declare { ty:   Type::Int,
                               name: "x".to_string(), });
    assert_eq!(parse("string[] names").unwrap(),
               Expr::Declare { ty:   Type::array_of(Type::String),
                               name: "names".to_string(), });
    assert_eq!(parse("Target app").unwrap(),
               Expr::Declare { ty:   Type::Object("Target".to_string()),
                               name: "app".to_string(), });
    assert_eq!(parse("float(3)").unwrap(),
               Expr::Cast { ty:        Type::Float,
                            arguments: vec![lit(3)], });
    assert_eq!(parse(".x").unwrap(), Expr::ThisMember("x".to_string()));
    assert_eq!(parse("a.b(1)").unwrap(),
               Expr::Call { callee:    Box::new(Expr::Member { object: Box::new(ident("a")),
                                                               name:   "b".to_string(), }),
                            arguments: vec![lit(1)], });
    assert_eq!(parse("[1, 2]").unwrap(), Expr::ArrayLiteral(vec![lit(1), lit(2)]));
}

#[test]
fn syntax_errors() {
    assert!(parse("1 +").is_err());
    assert!(parse("(1 + 2").is_err());
    assert!(parse("f(1,").is_err());
    assert!(parse("1 2").is_err());
}

#[test]
fn function_signatures() {
    assert_eq!(statement("void build(string name, int &count)").unwrap(),
               Statement::Function(Signature { name:        "build".to_string(),
                                               return_type: Type::Void,
                                               params:      vec![Parameter { ty:     Type::String,
                                                                             name:   "name".to_string(),
                                                                             by_ref: false, },
                                                                 Parameter { ty:     Type::Int,
                                                                             name:   "count".to_string(),
                                                                             by_ref: true, }], }));
    assert_eq!(statement("string[] list_all()").unwrap(),
               Statement::Function(Signature { name:        "list_all".to_string(),
                                               return_type: Type::array_of(Type::String),
                                               params:      Vec::new(), }));
    assert!(matches!(statement("int f(int a b)"),
                     Err(ParseError::InvalidFunctionDeclaration { .. })));
}

#[test]
fn class_and_procedure_headers() {
    assert_eq!(statement("class Target").unwrap(), Statement::Class("Target".to_string()));
    assert_eq!(statement("procedure clean").unwrap(), Statement::Procedure("clean".to_string()));
    assert_eq!(statement("class A B"),
               Err(ParseError::UnexpectedTrailingTokens { token: "B".to_string() }));
}

#[test]
fn lines_split_into_units() {
    let tokens = tokenize("if (a) { b = 1 } else c; d").unwrap().tokens;
    let kinds: Vec<_> = split_units(&tokens).into_iter()
                                            .map(|unit| match unit.kind {
                                                UnitKind::If(_) => "if",
                                                UnitKind::Else => "else",
                                                UnitKind::Open => "{",
                                                UnitKind::Close => "}",
                                                UnitKind::Return(_) => "return",
                                                UnitKind::Statement(_) => "statement",
                                                UnitKind::Invalid(_) => "invalid",
                                            })
                                            .collect();
    assert_eq!(kinds, ["if", "{", "statement", "}", "else", "statement", "statement"]);
}

#[test]
fn unit_offsets_point_into_the_line() {
    let tokens = tokenize("int f() { return 1 }").unwrap().tokens;
    let units = split_units(&tokens);

    assert_eq!(units[0].offset, 0);
    assert!(matches!(&units[0].kind, UnitKind::Statement(t) if t.len() == 4));
    assert_eq!(units[1].kind, UnitKind::Open);
    assert_eq!(units[1].offset, 4);
    assert!(matches!(&units[2].kind, UnitKind::Return(t) if t.len() == 1));
}
