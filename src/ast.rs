use crate::interpreter::value::types::Type;

/// Represents a literal value written in Eve source.
///
/// Literals are produced by the lexer and carried unchanged into the
/// expression tree; evaluating one yields a temporary value flagged as
/// literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `true` or `false`.
    Bool(bool),
    /// A 32-bit signed integer literal.
    Int(i32),
    /// A 32-bit floating-point literal.
    Float(f32),
    /// A quoted string, escapes already translated.
    String(String),
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for Literal {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Whether an operator groups to the left or to the right when it meets an
/// operator of the same precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a - b - c` is `(a - b) - c`.
    Left,
    /// `a = b = c` is `a = (b = c)`.
    Right,
}

/// Every operator Eve knows.
///
/// Precedence and associativity are attributes of the operator itself and
/// never change after the lexer produced it. A lower precedence number binds
/// tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `.`
    Member,
    /// `a[i]`, applied after the bracketed index was parsed.
    ArrayAccess,
    /// Prefix `!`.
    Not,
    /// Prefix `-`.
    Negate,
    /// `**`
    Power,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// `+`
    Add,
    /// Infix `-`.
    Subtract,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `&`
    BitAnd,
    /// `^`
    BitXor,
    /// `|`
    BitOr,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubtractAssign,
    /// `*=`
    MultiplyAssign,
    /// `/=`
    DivideAssign,
    /// `%=`
    ModuloAssign,
    /// `**=`
    PowerAssign,
}

impl Operator {
    /// Returns the binding strength, 1 (tightest) to 16 (loosest).
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Member | Self::ArrayAccess => 1,
            Self::Not | Self::Negate => 2,
            Self::Power => 3,
            Self::Multiply | Self::Divide | Self::Modulo => 4,
            Self::Add | Self::Subtract => 5,
            Self::Less | Self::LessEqual | Self::Greater | Self::GreaterEqual => 7,
            Self::Equal | Self::NotEqual => 8,
            Self::BitAnd => 9,
            Self::BitXor => 10,
            Self::BitOr => 11,
            Self::And => 12,
            Self::Or => 13,
            Self::Assign
            | Self::AddAssign
            | Self::SubtractAssign
            | Self::MultiplyAssign
            | Self::DivideAssign
            | Self::ModuloAssign
            | Self::PowerAssign => 15,
        }
    }

    /// Returns how the operator groups with itself.
    #[must_use]
    pub const fn associativity(self) -> Associativity {
        match self {
            Self::Not | Self::Negate | Self::Power => Associativity::Right,
            _ if self.is_assignment() => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Returns `true` when an operator already waiting on the stack must be
    /// applied before `incoming` is pushed.
    ///
    /// # Example
    /// ```
    /// use pile::ast::Operator;
    ///
    /// assert!(Operator::Multiply.reduces_before(Operator::Add));
    /// assert!(Operator::Subtract.reduces_before(Operator::Add));
    /// assert!(!Operator::Power.reduces_before(Operator::Power));
    /// assert!(!Operator::Add.reduces_before(Operator::Multiply));
    /// ```
    #[must_use]
    pub const fn reduces_before(self, incoming: Self) -> bool {
        let (pending, next) = (self.precedence(), incoming.precedence());
        pending < next
        || (pending == next && matches!(incoming.associativity(), Associativity::Left))
    }

    /// Returns `true` for `=` and the compound assignments.
    #[must_use]
    pub const fn is_assignment(self) -> bool {
        matches!(self,
                 Self::Assign
                 | Self::AddAssign
                 | Self::SubtractAssign
                 | Self::MultiplyAssign
                 | Self::DivideAssign
                 | Self::ModuloAssign
                 | Self::PowerAssign)
    }

    /// Returns the arithmetic operator a compound assignment applies before
    /// storing, e.g. `Add` for `+=`.
    #[must_use]
    pub const fn compound_base(self) -> Option<Self> {
        match self {
            Self::AddAssign => Some(Self::Add),
            Self::SubtractAssign => Some(Self::Subtract),
            Self::MultiplyAssign => Some(Self::Multiply),
            Self::DivideAssign => Some(Self::Divide),
            Self::ModuloAssign => Some(Self::Modulo),
            Self::PowerAssign => Some(Self::Power),
            _ => None,
        }
    }

    /// Returns `true` for operators that sit between two operands.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        !matches!(self, Self::Not | Self::Negate | Self::Member | Self::ArrayAccess)
    }

    /// Returns the operator as written in source.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Member => ".",
            Self::ArrayAccess => "[]",
            Self::Not => "!",
            Self::Negate | Self::Subtract => "-",
            Self::Power => "**",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Add => "+",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::And => "&&",
            Self::Or => "||",
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubtractAssign => "-=",
            Self::MultiplyAssign => "*=",
            Self::DivideAssign => "/=",
            Self::ModuloAssign => "%=",
            Self::PowerAssign => "**=",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An expression tree for one statement.
///
/// The parser builds the tree with operator precedence already resolved, so
/// evaluation is a plain recursive walk.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),
    /// A name to be resolved against the scope chain.
    Identifier(String),
    /// `.name`: the member `name` of the current method's `this`.
    ThisMember(String),
    /// `T name`: declares `name` in the innermost scope.
    Declare {
        /// Declared type.
        ty:   Type,
        /// Declared name.
        name: String,
    },
    /// `[a, b, c]`
    ArrayLiteral(Vec<Self>),
    /// A prefix operation (`!x`, `-x`).
    Unary {
        /// The operator.
        op:      Operator,
        /// The operand.
        operand: Box<Self>,
    },
    /// An infix operation, including assignments and array access.
    Binary {
        /// The operator.
        op:    Operator,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// `object.name`
    Member {
        /// The value whose member is taken.
        object: Box<Self>,
        /// Member name.
        name:   String,
    },
    /// `callee(arguments...)`
    Call {
        /// The function expression.
        callee:    Box<Self>,
        /// Argument expressions in order.
        arguments: Vec<Self>,
    },
    /// `int(x)`, `string(x)` and friends.
    Cast {
        /// Target type keyword.
        ty:        Type,
        /// Argument expressions in order.
        arguments: Vec<Self>,
    },
}

impl Expr {
    /// Builds a binary node.
    #[must_use]
    pub fn binary(op: Operator, left: Self, right: Self) -> Self {
        Self::Binary { op,
                       left: Box::new(left),
                       right: Box::new(right) }
    }
}

/// A declared function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Declared type; `void` accepts anything.
    pub ty:     Type,
    /// Parameter name.
    pub name:   String,
    /// Declared with `&`: the argument slot is aliased, not copied.
    pub by_ref: bool,
}

/// The header of a function declaration, `T name(T a, T &b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    /// Function name.
    pub name:        String,
    /// Declared return type.
    pub return_type: Type,
    /// Parameters in order.
    pub params:      Vec<Parameter>,
}

/// One parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An expression, possibly starting with a declaration.
    Expression(Expr),
    /// A function header; the body follows in `{ }`.
    Function(Signature),
    /// `class Name`; fields and methods follow in `{ }`.
    Class(String),
    /// `procedure name`; the body follows in `{ }`.
    Procedure(String),
}
