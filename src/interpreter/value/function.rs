use std::{
    fmt,
    path::PathBuf,
    rc::{Rc, Weak},
};

use crate::{
    ast::Parameter,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            function::core::BuiltinId,
        },
        value::{class::Object, core::Value, operand::Operand, types::Type},
    },
};

/// The highest arity a native callback may declare.
pub const MAX_NATIVE_ARITY: usize = 5;

/// One physical line of Eve source with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// Line number in the defining file.
    pub number: usize,
    /// Raw text of the line.
    pub text:   String,
}

impl SourceLine {
    /// Splits source text into numbered lines.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::value::function::SourceLine;
    ///
    /// let lines = SourceLine::split("int x\nx = 1");
    /// assert_eq!(lines[1].number, 2);
    /// assert_eq!(lines[1].text, "x = 1");
    /// ```
    #[must_use]
    pub fn split(source: &str) -> Vec<Self> {
        source.lines()
              .enumerate()
              .map(|(index, text)| Self { number: index + 1,
                                          text:   text.to_string(), })
              .collect()
    }
}

/// Signature of a callback registered by the embedding application.
///
/// The callback receives the interpreter and the raw argument operands; for a
/// method the receiver comes first.
pub type NativeCallback = Rc<dyn Fn(&mut Interpreter, &[Operand]) -> EvalResult<Value>>;

/// A function implemented in Rust by the embedding application.
pub struct NativeFunction {
    /// Name used in diagnostics.
    pub name:     String,
    /// Number of operands the callback expects, receiver included.
    pub arity:    usize,
    /// The implementation.
    pub callback: NativeCallback,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
         .field("name", &self.name)
         .field("arity", &self.arity)
         .finish_non_exhaustive()
    }
}

/// A function declared in Eve source.
#[derive(Debug)]
pub struct UserFunction {
    /// Declared name.
    pub name:        String,
    /// Declared parameters in order.
    pub params:      Vec<Parameter>,
    /// Declared return type.
    pub return_type: Type,
    /// Body lines between the braces.
    pub body:        Vec<SourceLine>,
    /// File the function was declared in.
    pub file:        PathBuf,
    /// Line of the declaration.
    pub line:        usize,
    /// Declared inside a class body; binds `this` when called.
    pub is_method:   bool,
}

/// A signature-less body, called with `name()`.
#[derive(Debug)]
pub struct Procedure {
    /// Declared name.
    pub name: String,
    /// Body lines between the braces.
    pub body: Vec<SourceLine>,
    /// File the procedure was declared in.
    pub file: PathBuf,
    /// Line of the declaration.
    pub line: usize,
}

/// What a function value runs when called.
#[derive(Debug, Clone)]
pub enum Callable {
    /// One of the interpreter's fixed built-ins.
    Builtin(BuiltinId),
    /// A callback registered by the embedding application.
    Native(Rc<NativeFunction>),
    /// A function declared in Eve source.
    User(Rc<UserFunction>),
}

impl Callable {
    /// Returns the function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(id) => id.name(),
            Self::Native(native) => &native.name,
            Self::User(user) => &user.name,
        }
    }

    /// Returns `true` if both refer to the same function.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            (Self::User(a), Self::User(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A function as an Eve value, optionally bound to a receiver object.
///
/// The receiver is a weak link: a bound method never keeps its object alive.
#[derive(Debug, Clone)]
pub struct FunctionValue {
    /// What to run.
    pub callable: Callable,
    /// The object the function was looked up on, for methods.
    pub receiver: Option<Weak<Object>>,
}

impl FunctionValue {
    /// Wraps an unbound callable.
    #[must_use]
    pub const fn unbound(callable: Callable) -> Self {
        Self { callable,
               receiver: None }
    }

    /// Binds a callable to its receiver.
    #[must_use]
    pub fn bound(callable: Callable, receiver: &Rc<Object>) -> Self {
        Self { callable,
               receiver: Some(Rc::downgrade(receiver)) }
    }
}
