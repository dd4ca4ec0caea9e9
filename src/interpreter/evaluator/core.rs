use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    error::{Error, RuntimeError},
    interpreter::{
        evaluator::{class::builtin_classes, function::core::BuiltinId, scope::ScopeStack},
        io::{FileSystem, StdFileSystem},
        output::{ConsoleOutputter, Outputter},
        value::{
            class::Class,
            core::Value,
            function::{Callable, FunctionValue, MAX_NATIVE_ARITY, NativeFunction},
            operand::Operand,
            types::Type,
        },
    },
};

/// Result type used by the evaluator.
///
/// Evaluation fails with either a parse error (a body line that does not
/// parse) or a runtime error.
pub type EvalResult<T> = Result<T, Error>;

/// Default layout of a reported diagnostic.
pub const DEFAULT_ERROR_FORMAT: &str = "{file}:{line}: {message}";
/// Default bound on nested function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;
/// Default bound on nested `include`s.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 16;

/// Interpreter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Layout of diagnostics; `{file}`, `{line}` and `{message}` are
    /// replaced.
    pub error_format:      String,
    /// Maximum number of nested function calls.
    pub max_call_depth:    usize,
    /// Maximum number of nested includes.
    pub max_include_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { error_format:      DEFAULT_ERROR_FORMAT.to_string(),
               max_call_depth:    DEFAULT_MAX_CALL_DEPTH,
               max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH, }
    }
}

/// What executing a statement produced.
#[derive(Debug, PartialEq)]
pub enum Flow {
    /// A statement produced a value.
    Value(Value),
    /// Nothing to report: a declaration, a brace, a void call.
    Nothing,
    /// An `if` body ran; a following `else` is skipped.
    TrueIf,
    /// An `if` body was skipped; a following `else` runs.
    FalseIf,
    /// An `else` was entered.
    Else,
    /// A `return` was executed.
    Return(Option<Value>),
    /// An error was reported.
    Error,
}

/// Stores the state of a running Eve program.
///
/// The interpreter owns the scope stack, the registered classes, the current
/// file and line for diagnostics, and a sticky error flag that is raised by
/// every reported error and only cleared when a fresh file starts.
///
/// ## Usage
///
/// Create one interpreter, feed it a file with [`Interpreter::read_file`]
/// (or a string with [`Interpreter::read_source`]) and read the script's
/// results back with [`Interpreter::global`].
///
/// ```
/// use pile::interpreter::{evaluator::core::Interpreter, value::core::Value};
///
/// let mut interpreter = Interpreter::new();
/// assert!(interpreter.read_source("Pilefile", "string OUTPUT = \"app\""));
/// assert_eq!(interpreter.global("OUTPUT"), Some(Value::from("app")));
/// ```
pub struct Interpreter {
    pub(crate) scopes:        ScopeStack,
    pub(crate) classes:       Vec<Rc<Class>>,
    pub(crate) file:          PathBuf,
    pub(crate) line:          usize,
    pub(crate) error_flag:    bool,
    pub(crate) error_count:   usize,
    pub(crate) last_if:       Option<bool>,
    pub(crate) call_depth:    usize,
    pub(crate) include_depth: usize,
    pub(crate) options:       Options,
    pub(crate) outputter:     Box<dyn Outputter>,
    pub(crate) file_system:   Box<dyn FileSystem>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter writing to the console and using the real file
    /// system. The built-in classes `Array`, `List` and `String` are
    /// registered.
    #[must_use]
    pub fn new() -> Self {
        Self { scopes:        ScopeStack::new(),
               classes:       builtin_classes(),
               file:          PathBuf::new(),
               line:          0,
               error_flag:    false,
               error_count:   0,
               last_if:       None,
               call_depth:    0,
               include_depth: 0,
               options:       Options::default(),
               outputter:     Box::new(ConsoleOutputter),
               file_system:   Box::new(StdFileSystem), }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Replaces where output and diagnostics go.
    #[must_use]
    pub fn with_outputter(mut self, outputter: impl Outputter + 'static) -> Self {
        self.outputter = Box::new(outputter);
        self
    }

    /// Replaces the file system collaborator.
    #[must_use]
    pub fn with_file_system(mut self, file_system: impl FileSystem + 'static) -> Self {
        self.file_system = Box::new(file_system);
        self
    }

    /// The current settings.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// The file being executed.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The line being executed, 1-based.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns `true` if an error was reported since the current file
    /// started.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.error_flag
    }

    /// Total number of errors reported by this interpreter.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.error_count
    }

    /// Formats a message with the current file and line.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::evaluator::core::Interpreter;
    ///
    /// let interpreter = Interpreter::new();
    /// assert_eq!(interpreter.format_diagnostic("boom"), ":0: boom");
    /// ```
    #[must_use]
    pub fn format_diagnostic(&self, message: &str) -> String {
        self.options
            .error_format
            .replace("{file}", &self.file.display().to_string())
            .replace("{line}", &self.line.to_string())
            .replace("{message}", message)
    }

    /// Reports an error at the current file and line and raises the error
    /// flag. Execution goes on with the next statement.
    pub fn report(&mut self, error: &Error) {
        tracing::debug!(file = %self.file.display(), line = self.line, %error, "error reported");
        self.report_message(&error.to_string());
    }

    /// Reports a free-form error message, like the script's `error()` does.
    pub fn report_message(&mut self, message: &str) {
        let message = self.format_diagnostic(message);
        self.outputter.error(&message);
        self.error_flag = true;
        self.error_count += 1;
    }

    /// Reports a warning at the current file and line.
    pub fn warn(&mut self, message: &str) {
        let message = self.format_diagnostic(message);
        self.outputter.warning(&message);
    }

    /// Resolves an identifier.
    ///
    /// Type keywords become type values; bound names become references to
    /// their slot; built-in function and class names become temporaries.
    /// Anything else yields a `Void` placeholder carrying the name, so the
    /// use site can report it as not declared.
    #[must_use]
    pub fn resolve_identifier(&self, name: &str) -> Operand {
        if let Some(ty) = Type::from_keyword(name) {
            return Operand::temporary(Value::TypeName(ty));
        }
        if let Some(slot) = self.scopes.lookup(name) {
            return Operand::Reference(Rc::clone(slot));
        }
        if let Some(id) = BuiltinId::from_name(name) {
            return Operand::temporary(Value::Function(FunctionValue::unbound(Callable::Builtin(id))));
        }
        if let Some(class) = self.find_class(name) {
            return Operand::temporary(Value::Class(class));
        }
        Operand::temporary(Value::Void(name.to_string()))
    }

    /// Returns a copy of a global variable.
    #[must_use]
    pub fn global(&self, name: &str) -> Option<Value> {
        self.scopes.global().get(name).map(|slot| slot.borrow().copy())
    }

    /// Names of all global variables, sorted.
    #[must_use]
    pub fn global_names(&self) -> Vec<String> {
        self.scopes.global_names()
    }

    /// Defines a global variable.
    ///
    /// # Errors
    /// Returns `RuntimeError::Redefined` if the name is taken.
    pub fn define_global(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        self.scopes.define_global(name, value)
    }

    /// Registers a native function as a global.
    ///
    /// Native functions receive the raw argument operands and skip the type
    /// checks of user functions; only the argument count is checked.
    ///
    /// # Errors
    /// Returns `RuntimeError::NativeArity` for more than five parameters and
    /// `RuntimeError::Redefined` if the name is taken.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::{
    ///     evaluator::core::Interpreter,
    ///     output::CaptureOutputter,
    ///     value::core::Value,
    /// };
    ///
    /// let capture = CaptureOutputter::default();
    /// let mut interpreter = Interpreter::new().with_outputter(capture.clone());
    /// interpreter.register_native("answer", 0, |_, _| Ok(Value::Int(42))).unwrap();
    ///
    /// assert!(interpreter.read_source("demo", "println(string(answer()))"));
    /// assert_eq!(capture.output(), "42\n");
    /// ```
    pub fn register_native<F>(&mut self, name: &str, arity: usize, callback: F) -> Result<(), RuntimeError>
        where F: Fn(&mut Self, &[Operand]) -> EvalResult<Value> + 'static
    {
        if arity > MAX_NATIVE_ARITY {
            return Err(RuntimeError::NativeArity { name: name.to_string(),
                                                   arity });
        }
        let native = NativeFunction { name: name.to_string(),
                                      arity,
                                      callback: Rc::new(callback) };
        let value = Value::Function(FunctionValue::unbound(Callable::Native(Rc::new(native))));
        self.define_global(name, value)
    }

    /// Looks up a registered class.
    #[must_use]
    pub fn find_class(&self, name: &str) -> Option<Rc<Class>> {
        self.classes.iter().find(|c| c.name == name).cloned()
    }
}
