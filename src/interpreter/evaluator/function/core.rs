use std::rc::Rc;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            function::{builtin, cast, fs, print},
        },
        value::{
            class::Object,
            core::Value,
            function::{Callable, NativeFunction},
            operand::Operand,
            types::Type,
        },
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the interpreter and the argument operands exactly as
/// they were evaluated, references and unresolved names included, and
/// returns the call's value; `Value::Void` with an empty name means the
/// call produced nothing.
type BuiltinFn = fn(&mut Interpreter, &[Operand]) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
}

/// Defines builtin functions by generating an id enum and a lookup table.
///
/// Each entry provides:
/// - a string name and the id variant naming it,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinId` (one variant per builtin, in table order),
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => $id:ident {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// Identifies one of the interpreter's fixed built-in functions.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BuiltinId {
            $(
                #[doc = concat!("`", $name, "`")]
                $id,
            )*
        }
        struct BuiltinDef {
            id:    BuiltinId,
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { id: BuiltinId::$id, name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of all built-in functions.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "print"    => Print     { arity: Arity::Exact(1), func: print::print },
    "println"  => Println   { arity: Arity::OneOf(&[0, 1]), func: print::println },
    "warning"  => Warning   { arity: Arity::Exact(1), func: print::warning },
    "error"    => Error     { arity: Arity::Exact(1), func: print::error },
    "debug"    => Debug     { arity: Arity::Exact(1), func: print::debug },
    "type"     => TypeOf    { arity: Arity::Exact(1), func: builtin::type_of },
    "string"   => CastString { arity: Arity::Exact(1), func: cast::to_string },
    "bool"     => CastBool  { arity: Arity::Exact(1), func: cast::to_bool },
    "int"      => CastInt   { arity: Arity::Exact(1), func: cast::to_int },
    "float"    => CastFloat { arity: Arity::Exact(1), func: cast::to_float },
    "include"  => Include   { arity: Arity::Exact(1), func: fs::include },
    "ls"       => Ls        { arity: Arity::Exact(1), func: fs::ls },
    "defined"  => Defined   { arity: Arity::Exact(1), func: builtin::defined },
    "copy"     => CopyFile  { arity: Arity::Exact(2), func: fs::copy },
    "move"     => MoveFile  { arity: Arity::Exact(2), func: fs::rename },
    "delete"   => Delete    { arity: Arity::Exact(1), func: fs::delete },
    "mkdir"    => Mkdir     { arity: Arity::Exact(1), func: fs::mkdir },
    "mkpath"   => Mkpath    { arity: Arity::Exact(1), func: fs::mkpath },
    "mkfile"   => Mkfile    { arity: Arity::Exact(1), func: fs::mkfile },
    "chmod"    => Chmod     { arity: Arity::Exact(2), func: fs::chmod },
    "mod_time" => ModTime   { arity: Arity::Exact(1), func: fs::mod_time },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    ///
    /// Returns `true` if the count is permitted, `false` otherwise.
    fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => arr.contains(&n),
        }
    }

    /// The count reported when the check fails.
    fn expected(&self) -> usize {
        match self {
            Self::Exact(m) => *m,
            Self::OneOf(arr) => arr.iter().copied().max().unwrap_or_default(),
        }
    }
}

impl BuiltinId {
    fn def(self) -> &'static BuiltinDef {
        &BUILTIN_TABLE[self as usize]
    }

    /// Returns the name scripts call the builtin by.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Finds a builtin by name.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::evaluator::function::core::BuiltinId;
    ///
    /// assert_eq!(BuiltinId::from_name("println"), Some(BuiltinId::Println));
    /// assert_eq!(BuiltinId::from_name("mod_time").map(BuiltinId::name), Some("mod_time"));
    /// assert_eq!(BuiltinId::from_name("compile"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        BUILTIN_TABLE.iter()
                     .find(|builtin| builtin.name == name)
                     .map(|builtin| builtin.id)
    }
}

impl Interpreter {
    /// Evaluates a call expression.
    ///
    /// A callee of the form `value.name` is resolved as a method of `value`;
    /// `.name` inside a method calls a method of `this`. Any other callee is
    /// evaluated and must produce a function or a procedure.
    ///
    /// Arguments are evaluated left to right into operands; whether an
    /// argument must be a reference, must hold a value, or may even be an
    /// unresolved name is up to the callee.
    ///
    /// # Parameters
    /// - `callee`: The function expression.
    /// - `arguments`: Argument expressions.
    ///
    /// # Returns
    /// The call's result; a void call yields an operand without a value.
    pub(crate) fn eval_call(&mut self, callee: &Expr, arguments: &[Expr]) -> EvalResult<Operand> {
        match callee {
            Expr::Member { object, name } => {
                let target = self.eval_expr(object)?.require_value()?;
                self.call_method(target, name, arguments)
            },
            Expr::ThisMember(name) => {
                let this = self.this_operand()?;
                self.call_method(this, name, arguments)
            },
            _ => {
                let function = self.eval_expr(callee)?.require_value()?.into_value();
                let args = self.eval_arguments(arguments)?;
                self.call_value(&function, args)
            },
        }
    }

    fn eval_arguments(&mut self, arguments: &[Expr]) -> EvalResult<Vec<Operand>> {
        arguments.iter().map(|argument| self.eval_expr(argument)).collect()
    }

    /// Calls `name` on the value `target` holds.
    ///
    /// Objects are searched for a method first and then for a field holding
    /// a function. Other values use the built-in class named after their
    /// kind (`Array`, `List`, `String`), which receives the value as its first
    /// argument.
    fn call_method(&mut self, target: Operand, name: &str, arguments: &[Expr]) -> EvalResult<Operand> {
        let object = match &*target.value() {
            Value::Object(object) => Some(Rc::clone(object)),
            _ => None,
        };

        if let Some(object) = object {
            if !object.is_instantiated() {
                return Err(RuntimeError::UninstantiatedObject { member: name.to_string() }.into());
            }
            if let Some(method) = object.method(name).cloned() {
                let args = self.eval_arguments(arguments)?;
                return self.call_function(&method, Some(object), args);
            }
            if let Some(field) = object.field(name) {
                let function = field.borrow().copy();
                let args = self.eval_arguments(arguments)?;
                return self.call_value(&function, args);
            }
            return Err(RuntimeError::NoSuchMember { ty:     object.ty(),
                                                    member: name.to_string(), }.into());
        }

        let ty = target.ty();
        let method = ty.builtin_class()
                       .and_then(|class| self.find_class(class))
                       .and_then(|class| class.method(name).cloned());
        let Some(method) = method else {
            return Err(RuntimeError::NoSuchMember { ty,
                                                    member: name.to_string() }.into());
        };

        let mut args = vec![target];
        args.extend(self.eval_arguments(arguments)?);
        self.call_function(&method, None, args)
    }

    /// Calls a function or procedure value with evaluated arguments.
    ///
    /// # Errors
    /// `NotCallable` for any other value and `DanglingReceiver` for a bound
    /// method whose object is gone, plus whatever the call itself raises.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::{
    ///     evaluator::core::Interpreter,
    ///     output::CaptureOutputter,
    ///     value::{core::Value, operand::Operand},
    /// };
    ///
    /// let capture = CaptureOutputter::default();
    /// let mut interpreter = Interpreter::new().with_outputter(capture.clone());
    ///
    /// let println = interpreter.resolve_identifier("println").into_value();
    /// interpreter.call_value(&println, vec![Operand::literal(Value::from("done"))]).unwrap();
    /// assert_eq!(capture.output(), "done\n");
    /// ```
    pub fn call_value(&mut self, function: &Value, args: Vec<Operand>) -> EvalResult<Operand> {
        match function {
            Value::Function(function) => {
                let receiver = match &function.receiver {
                    Some(receiver) => Some(receiver.upgrade().ok_or(RuntimeError::DanglingReceiver)?),
                    None => None,
                };
                self.call_function(&function.callable, receiver, args)
            },
            Value::Procedure(procedure) => self.call_procedure(procedure, &args),
            other => Err(RuntimeError::NotCallable { ty: other.ty() }.into()),
        }
    }

    /// Dispatches a call to a builtin, a native callback or a user function.
    pub(crate) fn call_function(&mut self,
                                callable: &Callable,
                                receiver: Option<Rc<Object>>,
                                args: Vec<Operand>)
                                -> EvalResult<Operand> {
        match callable {
            Callable::Builtin(id) => self.call_builtin(*id, &args),
            Callable::Native(native) => self.call_native(native, receiver, args),
            Callable::User(function) => self.call_user(function, receiver, args),
        }
    }

    /// Evaluates a builtin call.
    ///
    /// Only the argument count is checked here; each builtin validates its
    /// own arguments.
    fn call_builtin(&mut self, id: BuiltinId, args: &[Operand]) -> EvalResult<Operand> {
        let builtin = id.def();
        if !builtin.arity.check(args.len()) {
            return Err(RuntimeError::ArgumentCount { name:     builtin.name.to_string(),
                                                     expected: builtin.arity.expected(),
                                                     found:    args.len(), }.into());
        }

        Ok(Operand::temporary((builtin.func)(self, args)?))
    }

    /// Evaluates a call of a callback registered by the embedding
    /// application. A bound receiver is passed as the first operand.
    fn call_native(&mut self,
                   native: &NativeFunction,
                   receiver: Option<Rc<Object>>,
                   mut args: Vec<Operand>)
                   -> EvalResult<Operand> {
        if let Some(object) = receiver {
            args.insert(0, Operand::temporary(Value::Object(object)));
        }
        if args.len() != native.arity {
            return Err(RuntimeError::ArgumentCount { name:     native.name.clone(),
                                                     expected: native.arity,
                                                     found:    args.len(), }.into());
        }

        let callback = Rc::clone(&native.callback);
        Ok(Operand::temporary(callback(self, &args)?))
    }

    /// Evaluates the cast syntax `int(x)`, `string(x)` and friends.
    pub(crate) fn eval_cast(&mut self, ty: &Type, arguments: &[Expr]) -> EvalResult<Operand> {
        let id = cast::builtin_for(ty).ok_or(RuntimeError::NotCallable { ty: Type::TypeName })?;
        let args = self.eval_arguments(arguments)?;
        self.call_builtin(id, &args)
    }
}
