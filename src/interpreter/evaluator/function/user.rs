use std::{path::PathBuf, rc::Rc};

use crate::{
    ast::Parameter,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Flow, Interpreter},
            scope::Scope,
        },
        value::{
            class::{Object, object_value},
            convert::convert,
            core::{Slot, Value, slot},
            function::{Procedure, SourceLine, UserFunction},
            operand::Operand,
            types::{Type, is_convertible},
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// What the interpreter must restore once a body finishes.
struct Frame {
    file:    PathBuf,
    line:    usize,
    last_if: Option<bool>,
    depth:   usize,
}

impl Interpreter {
    /// Calls a function declared in Eve source.
    ///
    /// The body runs in a fresh isolated scope, so it sees its parameters,
    /// its own locals and the globals, never the caller's locals.
    ///
    /// # Parameters
    /// - `function`: The function to run.
    /// - `receiver`: The object bound to `this` for a method.
    /// - `args`: Evaluated arguments, one per parameter.
    ///
    /// # Returns
    /// The returned value, or an operand without a value for `void`
    /// functions.
    ///
    /// # Errors
    /// `CallDepthExceeded`, `ArgumentCount`, `ArgumentType` and
    /// `ReferenceRequired` before the body runs; `MissingReturn` and
    /// `ReturnType` after it. Errors inside the body are reported where they
    /// happen and do not abort the call.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %function.name))]
    pub(crate) fn call_user(&mut self,
                            function: &Rc<UserFunction>,
                            receiver: Option<Rc<Object>>,
                            args: Vec<Operand>)
                            -> EvalResult<Operand> {
        self.check_call_depth()?;
        if args.len() != function.params.len() {
            return Err(RuntimeError::ArgumentCount { name:     function.name.clone(),
                                                     expected: function.params.len(),
                                                     found:    args.len(), }.into());
        }

        let mut bound = Vec::with_capacity(args.len());
        for (index, (param, arg)) in function.params.iter().zip(args).enumerate() {
            let arg = arg.require_value()?;
            bound.push(bind_argument(&function.name, index, param, arg)?);
        }

        let frame = self.enter(function.file.clone());
        let flow = ensure_sufficient_stack(|| self.run_frame(receiver, &function.params, bound, &function.body));
        self.leave(frame);

        let returned = match flow? {
            Flow::Return(value) => value,
            _ => None,
        };
        check_return(function, returned).map(Operand::temporary)
    }

    /// Calls a procedure. Procedures take no arguments and return nothing.
    pub(crate) fn call_procedure(&mut self, procedure: &Rc<Procedure>, args: &[Operand]) -> EvalResult<Operand> {
        self.check_call_depth()?;
        if !args.is_empty() {
            return Err(RuntimeError::ArgumentCount { name:     procedure.name.clone(),
                                                     expected: 0,
                                                     found:    args.len(), }.into());
        }
        tracing::debug!(procedure = %procedure.name, "call");

        let frame = self.enter(procedure.file.clone());
        let flow = ensure_sufficient_stack(|| self.run_lines(&procedure.body, true));
        self.leave(frame);

        if let Flow::Return(Some(value)) = flow? {
            return Err(RuntimeError::ReturnType { name:     procedure.name.clone(),
                                                  expected: Type::Void,
                                                  found:    value.ty(), }.into());
        }
        Ok(Operand::nothing())
    }

    fn check_call_depth(&self) -> Result<(), RuntimeError> {
        if self.call_depth >= self.options.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded { limit: self.options.max_call_depth });
        }
        Ok(())
    }

    /// Switches to a body declared in `file` and opens its isolated scope.
    fn enter(&mut self, file: PathBuf) -> Frame {
        let frame = Frame { file:    std::mem::replace(&mut self.file, file),
                            line:    self.line,
                            last_if: self.last_if.take(),
                            depth:   self.scopes.depth(), };
        self.call_depth += 1;
        self.scopes.push(Scope::isolated());
        frame
    }

    fn leave(&mut self, frame: Frame) {
        self.scopes.truncate(frame.depth);
        self.call_depth -= 1;
        self.file = frame.file;
        self.line = frame.line;
        self.last_if = frame.last_if;
    }

    /// Binds `this` and the parameters, then runs the body.
    fn run_frame(&mut self,
                 receiver: Option<Rc<Object>>,
                 params: &[Parameter],
                 bound: Vec<Slot>,
                 body: &[SourceLine])
                 -> EvalResult<Flow> {
        if let Some(object) = receiver {
            self.scopes.define("this", object_value(&object))?;
        }
        for (param, slot) in params.iter().zip(bound) {
            self.scopes.bind(&param.name, slot)?;
        }
        self.run_lines(body, true)
    }
}

/// Turns an argument into the slot its parameter is bound to.
///
/// A by-reference parameter aliases the caller's slot and demands the exact
/// type. A by-value parameter gets a private copy converted to its type.
/// `void` parameters accept anything.
fn bind_argument(function: &str,
                 index: usize,
                 param: &Parameter,
                 arg: Operand)
                 -> EvalResult<Slot> {
    let found = arg.ty();
    let type_error = || RuntimeError::ArgumentType { name:     function.to_string(),
                                                     index:    index + 1,
                                                     expected: param.ty.clone(),
                                                     found:    found.clone(), };

    if param.by_ref {
        let Operand::Reference(target) = arg else {
            return Err(RuntimeError::ReferenceRequired { name:  function.to_string(),
                                                         index: index + 1, }.into());
        };
        if param.ty != Type::Void && param.ty != found {
            return Err(type_error().into());
        }
        return Ok(target);
    }

    if param.ty == Type::Void {
        return Ok(slot(arg.into_value()));
    }
    if !is_convertible(&found, &param.ty) {
        return Err(type_error().into());
    }
    Ok(slot(convert(&arg.value(), &param.ty)?))
}

/// Checks a returned value against the declared return type.
///
/// An untyped empty array satisfies any array return type and adopts it.
fn check_return(function: &UserFunction, returned: Option<Value>) -> EvalResult<Value> {
    let expected = &function.return_type;
    match (returned, expected) {
        (None, Type::Void) => Ok(Value::Void(String::new())),
        (Some(value), Type::Void) => Err(RuntimeError::ReturnType { name:     function.name.clone(),
                                                                    expected: Type::Void,
                                                                    found:    value.ty(), }.into()),
        (None, _) => Err(RuntimeError::MissingReturn { name: function.name.clone(),
                                                       ty:   expected.clone(), }.into()),
        (Some(value), _) if value.ty() == *expected => Ok(value),
        (Some(value), Type::Array(_)) if value.ty() == Type::array_of(Type::Void) => Ok(convert(&value, expected)?),
        (Some(value), _) => Err(RuntimeError::ReturnType { name:     function.name.clone(),
                                                           expected: expected.clone(),
                                                           found:    value.ty(), }.into()),
    }
}
