use crate::interpreter::{
    evaluator::{
        core::{EvalResult, Interpreter},
        function::core::BuiltinId,
        utils::value_arg,
    },
    value::{convert::convert, core::Value, operand::Operand, types::Type},
};

/// Returns the builtin implementing the cast syntax for `ty`.
pub(crate) const fn builtin_for(ty: &Type) -> Option<BuiltinId> {
    match ty {
        Type::String => Some(BuiltinId::CastString),
        Type::Bool => Some(BuiltinId::CastBool),
        Type::Int => Some(BuiltinId::CastInt),
        Type::Float => Some(BuiltinId::CastFloat),
        _ => None,
    }
}

/// Renders any value as text, the way `print` shows it.
///
/// # Example
/// ```
/// use pile::interpreter::{
///     evaluator::{core::Interpreter, function::cast::to_string},
///     value::{core::Value, operand::Operand},
/// };
///
/// let mut interpreter = Interpreter::new();
/// let text = to_string(&mut interpreter, &[Operand::literal(Value::Int(7))]).unwrap();
/// assert_eq!(text, Value::from("7"));
/// ```
pub fn to_string(_: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    Ok(Value::String(value_arg(args, 0)?.to_string()))
}

/// Converts to `bool`; any non-zero number is `true`.
pub fn to_bool(_: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    Ok(convert(&value_arg(args, 0)?, &Type::Bool)?)
}

/// Converts to `int`, truncating floats toward zero.
pub fn to_int(_: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    Ok(convert(&value_arg(args, 0)?, &Type::Int)?)
}

/// Converts to `float`.
pub fn to_float(_: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    Ok(convert(&value_arg(args, 0)?, &Type::Float)?)
}
