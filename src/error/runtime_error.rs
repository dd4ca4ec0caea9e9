use crate::{ast::Operator, interpreter::value::types::Type};

/// Represents all errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// Used a name that no scope defines.
    #[error("'{name}' is not declared")]
    NotDeclared {
        /// The name as written.
        name: String,
    },
    /// Declared a name that the innermost scope already holds.
    #[error("'{name}' is redefined")]
    Redefined {
        /// The name of the variable.
        name: String,
    },
    /// Set a name that the innermost scope does not hold.
    #[error("'{name}' is not defined")]
    NotDefined {
        /// The name of the variable.
        name: String,
    },
    /// Used the result of a void call as a value.
    #[error("expression has no value")]
    NoValue,
    /// Assignment operator applied to a literal or temporary.
    #[error("assigning to non-reference '{target}'")]
    AssignToNonReference {
        /// The target as displayed.
        target: String,
    },
    /// A binary operator that has no rule for the operand types.
    #[error("operator '{op}' cannot be applied to {left} and {right}")]
    InvalidOperands {
        /// The operator.
        op:    Operator,
        /// Left operand type.
        left:  Type,
        /// Right operand type.
        right: Type,
    },
    /// A unary operator that has no rule for the operand type.
    #[error("operator '{op}' cannot be applied to {operand}")]
    InvalidOperand {
        /// The operator.
        op:      Operator,
        /// Operand type.
        operand: Type,
    },
    /// A value that cannot be converted to the required type.
    #[error("cannot convert {from} to {to}")]
    NotConvertible {
        /// Source type.
        from: Type,
        /// Destination type.
        to:   Type,
    },
    /// A type that cannot be used for a declaration.
    #[error("cannot declare '{name}' with type {ty}")]
    InvalidDeclaration {
        /// The declared name.
        name: String,
        /// The declared type.
        ty:   Type,
    },
    /// An array element whose type differs from the array's element type.
    #[error("array element type mismatch: expected {expected}, found {found}")]
    ArrayElementType {
        /// Element type of the array.
        expected: Type,
        /// Type of the offending element.
        found:    Type,
    },
    /// A user function called with the wrong number of arguments.
    #[error("'{name}' expects {expected} argument(s), found {found}")]
    ArgumentCount {
        /// Function name.
        name:     String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        found:    usize,
    },
    /// A user function argument whose type does not convert to the parameter.
    #[error("argument {index} of '{name}': expected {expected}, found {found}")]
    ArgumentType {
        /// Function name.
        name:     String,
        /// One-based argument position.
        index:    usize,
        /// Parameter type.
        expected: Type,
        /// Argument type.
        found:    Type,
    },
    /// A by-reference parameter given a literal or temporary.
    #[error("argument {index} of '{name}' must be a reference")]
    ReferenceRequired {
        /// Function name.
        name:  String,
        /// One-based argument position.
        index: usize,
    },
    /// Called something that is not a function.
    #[error("{ty} is not callable")]
    NotCallable {
        /// Type of the callee.
        ty: Type,
    },
    /// Named a class that was never registered.
    #[error("unknown class '{name}'")]
    UnknownClass {
        /// Class name.
        name: String,
    },
    /// Registered a class under a name already in use.
    #[error("class '{name}' is redefined")]
    ClassRedefined {
        /// Class name.
        name: String,
    },
    /// A class field whose type cannot hold a value.
    #[error("field '{field}' of class '{class}' has unsupported type {ty}")]
    UnsupportedFieldType {
        /// Class name.
        class: String,
        /// Field name.
        field: String,
        /// Field type.
        ty:    Type,
    },
    /// Accessed a member of an object whose class was never found.
    #[error("object of unknown class has no member '{member}'")]
    UninstantiatedObject {
        /// Member name.
        member: String,
    },
    /// Accessed a member the value does not have.
    #[error("{ty} has no member '{member}'")]
    NoSuchMember {
        /// Type of the value.
        ty:     Type,
        /// Member name.
        member: String,
    },
    /// Took a built-in method without calling it.
    #[error("method '{member}' must be called")]
    MethodNotCalled {
        /// Member name.
        member: String,
    },
    /// Tried to access an element outside the container.
    #[error("index {index} out of range for size {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: i64,
        /// The container size.
        len:   usize,
    },
    /// Indexed a value that is not indexable.
    #[error("{ty} cannot be indexed")]
    NotIndexable {
        /// Type of the value.
        ty: Type,
    },
    /// Arithmetic operation overflowed.
    #[error("integer overflow")]
    Overflow,
    /// Attempted division by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// A non-void function finished without returning a value.
    #[error("'{name}' must return {ty}")]
    MissingReturn {
        /// Function name.
        name: String,
        /// Declared return type.
        ty:   Type,
    },
    /// A function returned a value of the wrong type.
    #[error("'{name}' returns {expected}, found {found}")]
    ReturnType {
        /// Function name.
        name:     String,
        /// Declared return type.
        expected: Type,
        /// Type of the returned value.
        found:    Type,
    },
    /// `return` used where no function is running.
    #[error("'return' outside of a function")]
    ReturnOutsideFunction,
    /// `else` with no preceding `if` body.
    #[error("'else' without 'if'")]
    ElseWithoutIf,
    /// `}` with no open block.
    #[error("unmatched '}}'")]
    UnmatchedBrace,
    /// A block still open when its file or body ended.
    #[error("unterminated block")]
    UnterminatedBlock,
    /// Too many nested function calls.
    #[error("maximum call depth of {limit} exceeded")]
    CallDepthExceeded {
        /// Configured limit.
        limit: usize,
    },
    /// Too many nested includes.
    #[error("maximum include depth of {limit} exceeded")]
    IncludeDepthExceeded {
        /// Configured limit.
        limit: usize,
    },
    /// `this` or a `.member` shorthand outside of a method.
    #[error("'this' is only available inside methods")]
    ThisOutsideMethod,
    /// A bound method whose object no longer exists.
    #[error("method receiver no longer exists")]
    DanglingReceiver,
    /// Native functions take at most five arguments.
    #[error("native function '{name}' has arity {arity}, at most 5 is supported")]
    NativeArity {
        /// Function name.
        name:  String,
        /// Requested arity.
        arity: usize,
    },
    /// The file system collaborator failed.
    #[error("{path}: {message}")]
    Io {
        /// The path involved.
        path:    String,
        /// Description of the failure.
        message: String,
    },
}
