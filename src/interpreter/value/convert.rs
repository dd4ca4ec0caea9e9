use crate::{
    error::RuntimeError,
    interpreter::value::{
        core::{Array, Value},
        types::{Type, is_convertible},
    },
    util::num::{f32_to_i32_checked, i32_to_f32},
};

/// Converts a value to the given type following the conversion table.
///
/// Numeric conversions truncate toward zero when going to `int`; any
/// non-zero number is `true`. A value already of the target type is copied.
///
/// # Errors
/// Returns `RuntimeError::NotConvertible` for pairs the table rejects and
/// `RuntimeError::Overflow` for floats that do not fit in an `int`.
///
/// # Example
/// ```
/// use pile::interpreter::value::{convert::convert, core::Value, types::Type};
///
/// assert_eq!(convert(&Value::Float(2.9), &Type::Int).unwrap(), Value::Int(2));
/// assert_eq!(convert(&Value::Int(0), &Type::Bool).unwrap(), Value::Bool(false));
/// assert!(convert(&Value::from("3"), &Type::Int).is_err());
/// ```
pub fn convert(value: &Value, to: &Type) -> Result<Value, RuntimeError> {
    let from = value.ty();
    if !is_convertible(&from, to) {
        return Err(RuntimeError::NotConvertible { from,
                                                  to: to.clone() });
    }

    Ok(match (value, to) {
        (Value::Bool(b), Type::Int) => Value::Int(i32::from(*b)),
        (Value::Bool(b), Type::Float) => Value::Float(if *b { 1.0 } else { 0.0 }),
        (Value::Int(i), Type::Bool) => Value::Bool(*i != 0),
        (Value::Int(i), Type::Float) => Value::Float(i32_to_f32(*i)),
        (Value::Float(x), Type::Bool) => Value::Bool(*x != 0.0),
        (Value::Float(x), Type::Int) => Value::Int(f32_to_i32_checked(*x)?),
        (Value::Array(array), Type::Array(element)) if array.items.is_empty() => {
            Value::Array(Array::new((**element).clone()))
        },
        _ => value.copy(),
    })
}

/// Interprets a value as a condition.
///
/// # Errors
/// Returns `RuntimeError::NotConvertible` for values that are not `bool`,
/// `int` or `float`.
pub fn as_bool(value: &Value) -> Result<bool, RuntimeError> {
    match convert(value, &Type::Bool)? {
        Value::Bool(b) => Ok(b),
        other => Err(RuntimeError::NotConvertible { from: other.ty(),
                                                    to:   Type::Bool, }),
    }
}

/// Interprets a value as an `int`, converting `bool` and `float`.
///
/// # Errors
/// Returns `RuntimeError::NotConvertible` for non-numeric values.
pub fn as_int(value: &Value) -> Result<i32, RuntimeError> {
    match convert(value, &Type::Int)? {
        Value::Int(i) => Ok(i),
        other => Err(RuntimeError::NotConvertible { from: other.ty(),
                                                    to:   Type::Int, }),
    }
}
