use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            function::core::BuiltinId,
            utils::value_arg,
        },
        value::{core::Value, operand::Operand},
    },
};

/// Returns the type name of a value as a string.
///
/// # Example
/// ```
/// use pile::interpreter::{
///     evaluator::{core::Interpreter, function::builtin::type_of},
///     value::{core::Value, operand::Operand},
/// };
///
/// let mut interpreter = Interpreter::new();
/// let ty = type_of(&mut interpreter, &[Operand::literal(Value::Float(1.5))]).unwrap();
/// assert_eq!(ty, Value::from("float"));
/// ```
pub fn type_of(_: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    Ok(Value::String(value_arg(args, 0)?.ty().to_string()))
}

/// Tells whether a name is bound.
///
/// Accepts a bare identifier, `defined(CFLAGS)`, or the name as a string,
/// `defined("CFLAGS")`. Built-in functions and registered classes count as
/// defined.
pub fn defined(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let Some(arg) = args.first() else {
        return Err(RuntimeError::NoValue.into());
    };
    if arg.is_reference() {
        return Ok(Value::Bool(true));
    }

    let defined = match &*arg.value() {
        Value::Void(name) if name.is_empty() => return Err(RuntimeError::NoValue.into()),
        Value::Void(_) => false,
        Value::String(name) => {
            interpreter.scopes.lookup(name).is_some()
            || BuiltinId::from_name(name).is_some()
            || interpreter.find_class(name).is_some()
        },
        _ => true,
    };
    Ok(Value::Bool(defined))
}
