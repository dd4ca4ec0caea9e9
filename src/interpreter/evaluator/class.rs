use std::rc::Rc;

use crate::{
    ast::{Expr, Statement},
    error::{ParseError, RuntimeError},
    interpreter::{
        evaluator::{
            core::{EvalResult, Flow, Interpreter},
            driver::{Source, Step},
        },
        lexer::Token,
        parser::{
            block::{UnitKind, split_units},
            statement::parse_statement,
        },
        value::{
            class::{Class, Object},
            core::{Array, Value, slot},
            function::{Callable, NativeFunction, SourceLine, UserFunction},
            operand::Operand,
            types::Type,
        },
    },
    util::num::usize_to_i32_checked,
};

/// Builds the classes every interpreter starts with.
///
/// `Array`, `List` and `String` hold the methods callable on values of those
/// kinds; each starts out with `size()`.
pub(crate) fn builtin_classes() -> Vec<Rc<Class>> {
    ["Array", "List", "String"].into_iter()
                               .map(|name| {
                                   let mut class = Class::new(name);
                                   let size = NativeFunction { name:     format!("{name}.size"),
                                                               arity:    1,
                                                               callback: Rc::new(size), };
                                   class.add_method("size", Callable::Native(Rc::new(size)));
                                   Rc::new(class)
                               })
                               .collect()
}

/// `value.size()`: elements of a container, characters of a string.
fn size(_: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let Some(arg) = args.first() else {
        return Err(RuntimeError::NoValue.into());
    };
    let value = arg.value();
    match value.size() {
        Some(size) => Ok(Value::Int(usize_to_i32_checked(size)?)),
        None => Err(RuntimeError::NoSuchMember { ty:     value.ty(),
                                                 member: "size".to_string(), }.into()),
    }
}

impl Interpreter {
    /// Registers a class so scripts can declare objects of it.
    ///
    /// # Errors
    /// Returns `RuntimeError::ClassRedefined` if the name is taken.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::{
    ///     evaluator::core::Interpreter,
    ///     value::{class::Class, core::Value, types::Type},
    /// };
    ///
    /// let mut target = Class::new("Target");
    /// target.add_field(Type::String, "name");
    ///
    /// let mut interpreter = Interpreter::new();
    /// interpreter.register_class(target).unwrap();
    /// assert!(interpreter.read_source("Pilefile", "Target app\napp.name = \"app\"\nstring NAME = app.name"));
    /// assert_eq!(interpreter.global("NAME"), Some(Value::from("app")));
    /// ```
    pub fn register_class(&mut self, class: Class) -> Result<(), RuntimeError> {
        if self.find_class(&class.name).is_some() {
            return Err(RuntimeError::ClassRedefined { name: class.name });
        }
        tracing::debug!(class = %class.name,
                        fields = class.fields.len(),
                        methods = class.methods.len(),
                        "class registered");
        self.classes.push(Rc::new(class));
        Ok(())
    }

    /// Adds a native method to a registered class, built-in classes
    /// included.
    ///
    /// Objects created afterwards see the method; values of the built-in
    /// kinds see it right away.
    ///
    /// # Errors
    /// `UnknownClass` if no such class is registered and `NativeArity` for
    /// more than five parameters, receiver included.
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
    /// interpreter.register_native_method("String", "shout", 1, |_, args: &[Operand]| {
    ///                Ok(Value::String((*args[0].value()).to_string().to_uppercase()))
    ///            })
    ///            .unwrap();
    ///
    /// assert!(interpreter.read_source("demo", "string s = \"hey\"\nprintln(s.shout())"));
    /// assert_eq!(capture.output(), "HEY\n");
    /// ```
    pub fn register_native_method<F>(&mut self,
                                     class: &str,
                                     name: &str,
                                     arity: usize,
                                     callback: F)
                                     -> Result<(), RuntimeError>
        where F: Fn(&mut Self, &[Operand]) -> EvalResult<Value> + 'static
    {
        let Some(entry) = self.classes.iter_mut().find(|c| c.name == class) else {
            return Err(RuntimeError::UnknownClass { name: class.to_string() });
        };
        Rc::make_mut(entry).add_native_method(name, arity, callback)
    }

    /// Creates an object of the named class with every field at its zero
    /// value.
    ///
    /// An unknown class is reported and yields the uninstantiated
    /// placeholder, whose members fail on first access. Fields whose type
    /// has no zero value are reported and left out.
    pub fn instantiate(&mut self, name: &str) -> Object {
        self.instantiate_nested(name, &mut Vec::new())
    }

    fn instantiate_nested(&mut self, name: &str, pending: &mut Vec<String>) -> Object {
        let Some(class) = self.find_class(name) else {
            self.report(&RuntimeError::UnknownClass { name: name.to_string() }.into());
            return Object::uninstantiated();
        };

        pending.push(class.name.clone());
        let mut fields = Vec::with_capacity(class.fields.len());
        for field in &class.fields {
            match self.zero_value_nested(&field.ty, pending) {
                Some(value) => fields.push((field.name.clone(), slot(value))),
                None => {
                    let error = RuntimeError::UnsupportedFieldType { class: class.name.clone(),
                                                                     field: field.name.clone(),
                                                                     ty:    field.ty.clone(), };
                    self.report(&error.into());
                },
            }
        }
        pending.pop();

        Object { class_name: class.name.clone(),
                 fields,
                 methods: class.methods
                               .iter()
                               .map(|method| (method.name.clone(), method.function.clone()))
                               .collect() }
    }

    /// Returns the value a fresh declaration of `ty` holds.
    ///
    /// Numbers start at zero, text and containers empty, objects with their
    /// fields at zero values. A `function` variable starts without a value
    /// and takes whatever function is assigned first. Returns `None` for
    /// types nothing can be declared with, and for a class that contains
    /// itself.
    pub(crate) fn zero_value(&mut self, ty: &Type) -> Option<Value> {
        self.zero_value_nested(ty, &mut Vec::new())
    }

    fn zero_value_nested(&mut self, ty: &Type, pending: &mut Vec<String>) -> Option<Value> {
        match ty {
            Type::Bool => Some(Value::Bool(false)),
            Type::Int => Some(Value::Int(0)),
            Type::Float => Some(Value::Float(0.0)),
            Type::String => Some(Value::String(String::new())),
            Type::Macro => Some(Value::Macro(String::new())),
            Type::List => Some(Value::List(Vec::new())),
            Type::Function => Some(Value::Void(String::new())),
            Type::Array(element) if **element != Type::Void => Some(Value::Array(Array::new((**element).clone()))),
            Type::Object(name) if !pending.contains(name) => {
                Some(Value::Object(Rc::new(self.instantiate_nested(name, pending))))
            },
            _ => None,
        }
    }

    /// Builds a class from the lines of its body.
    ///
    /// The body may hold field declarations `T name` and method
    /// declarations `T name(params) { ... }`. Anything else is reported and
    /// skipped; the class is built from what remains.
    pub(crate) fn build_class(&mut self, name: &str, body: &[SourceLine]) -> EvalResult<Class> {
        let line = self.line;
        let mut class = Class::new(name);
        let mut source = Source::new(body);

        while let Some((number, tokens)) = source.next_line() {
            self.line = number;
            match tokens {
                Ok(tokens) => self.class_line(&mut class, &tokens, &mut source)?,
                Err(e) => self.recover(e.into())?,
            }
        }

        self.line = line;
        Ok(class)
    }

    fn class_line(&mut self, class: &mut Class, tokens: &[Token], source: &mut Source<'_>) -> EvalResult<()> {
        let mut rest = tokens;
        'line: loop {
            for unit in split_units(rest) {
                let UnitKind::Statement(member) = unit.kind else {
                    self.recover(ParseError::InvalidClassMember.into())?;
                    continue;
                };

                let after = unit.offset + member.len();
                let step = match self.class_member(class, &member, &rest[after..], source) {
                    Ok(step) => step,
                    Err(e) => {
                        self.recover(e)?;
                        Step::Finish(Flow::Error)
                    },
                };
                match step {
                    Step::Next(_) => {},
                    Step::Resume { offset, .. } => {
                        rest = &rest[after + offset..];
                        continue 'line;
                    },
                    Step::Finish(_) => break 'line,
                }
            }
            break;
        }
        Ok(())
    }

    /// Adds one member to the class being built.
    fn class_member(&mut self,
                    class: &mut Class,
                    tokens: &[Token],
                    rest: &[Token],
                    source: &mut Source<'_>)
                    -> EvalResult<Step> {
        match parse_statement(tokens)? {
            Statement::Expression(Expr::Declare { ty, name }) => {
                class.add_field(ty, &name);
                Ok(Step::Next(Flow::Nothing))
            },
            Statement::Function(signature) => {
                let capture = source.capture_body(&signature.name, self.line, rest)?;
                tracing::debug!(class = %class.name, method = %signature.name, "method declared");
                let method = UserFunction { name:        signature.name.clone(),
                                            params:      signature.params,
                                            return_type: signature.return_type,
                                            body:        capture.body,
                                            file:        self.file.clone(),
                                            line:        self.line,
                                            is_method:   true, };
                class.add_method(&signature.name, Callable::User(Rc::new(method)));

                Ok(match capture.resume {
                    Some(offset) => Step::Resume { offset,
                                                   flow: Flow::Nothing },
                    None => Step::Finish(Flow::Nothing),
                })
            },
            _ => Err(ParseError::InvalidClassMember.into()),
        }
    }
}
