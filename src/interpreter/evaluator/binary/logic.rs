use crate::{
    ast::Operator,
    interpreter::{
        evaluator::{
            binary::core::invalid_operands,
            core::{EvalResult, Interpreter},
        },
        value::{convert::as_bool, core::Value},
    },
};

impl Interpreter {
    /// Evaluates `&`, `|` or `^`.
    ///
    /// Two booleans give a boolean; otherwise both sides must be `int` or
    /// `bool` and the result is an `int`.
    ///
    /// # Example
    /// ```
    /// use pile::{
    ///     ast::Operator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let v = Interpreter::eval_bitwise(Operator::BitOr, &Value::Int(4), &Value::Int(1));
    /// assert_eq!(v.unwrap(), Value::Int(5));
    ///
    /// let v = Interpreter::eval_bitwise(Operator::BitXor, &Value::Bool(true), &Value::Bool(true));
    /// assert_eq!(v.unwrap(), Value::Bool(false));
    /// ```
    pub fn eval_bitwise(op: Operator, left: &Value, right: &Value) -> EvalResult<Value> {
        if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
            return Ok(Value::Bool(match op {
                                      Operator::BitAnd => a & b,
                                      Operator::BitOr => a | b,
                                      _ => a ^ b,
                                  }));
        }

        let integer = |value: &Value| match value {
            Value::Bool(b) => Some(i32::from(*b)),
            Value::Int(i) => Some(*i),
            _ => None,
        };

        match (integer(left), integer(right)) {
            (Some(a), Some(b)) => Ok(Value::Int(match op {
                                                    Operator::BitAnd => a & b,
                                                    Operator::BitOr => a | b,
                                                    _ => a ^ b,
                                                })),
            _ => Err(invalid_operands(op, left, right).into()),
        }
    }

    /// Evaluates `&&` or `||` on two already evaluated values.
    ///
    /// Both sides must convert to `bool`.
    pub fn eval_logic(op: Operator, left: &Value, right: &Value) -> EvalResult<Value> {
        let (a, b) = (as_bool(left)?, as_bool(right)?);
        Ok(Value::Bool(if op == Operator::And { a && b } else { a || b }))
    }
}
