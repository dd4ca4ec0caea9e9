use crate::{
    ast::Operator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{convert::as_bool, core::Value},
    },
};

impl Interpreter {
    /// Evaluates a prefix operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: checked negation of `int`, negation of `float`; `bool` is
    ///   negated as an `int`.
    /// - `Not`: logical negation of anything convertible to `bool`.
    ///
    /// # Parameters
    /// - `op`: The prefix operator.
    /// - `value`: The operand.
    ///
    /// # Returns
    /// The computed `Value` wrapped in `EvalResult`.
    ///
    /// # Example
    /// ```
    /// use pile::{
    ///     ast::Operator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let v = Interpreter::eval_unary(Operator::Negate, &Value::Int(5)).unwrap();
    /// assert_eq!(v, Value::Int(-5));
    ///
    /// let v = Interpreter::eval_unary(Operator::Not, &Value::Int(0)).unwrap();
    /// assert_eq!(v, Value::Bool(true));
    ///
    /// assert!(Interpreter::eval_unary(Operator::Negate, &Value::Int(i32::MIN)).is_err());
    /// ```
    pub fn eval_unary(op: Operator, value: &Value) -> EvalResult<Value> {
        let invalid = || RuntimeError::InvalidOperand { op,
                                                        operand: value.ty() };

        match op {
            Operator::Negate => match value {
                Value::Int(i) => Ok(Value::Int(i.checked_neg().ok_or(RuntimeError::Overflow)?)),
                Value::Float(x) => Ok(Value::Float(-x)),
                Value::Bool(b) => Ok(Value::Int(-i32::from(*b))),
                _ => Err(invalid().into()),
            },
            Operator::Not if value.ty().is_numeric() => Ok(Value::Bool(!as_bool(value)?)),
            _ => Err(invalid().into()),
        }
    }
}
