use crate::{
    ast::Operator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::invalid_operands,
            core::{EvalResult, Interpreter},
        },
        value::core::Value,
    },
    util::num::i32_to_f32,
};

/// A numeric operand after `bool` promotion.
#[derive(Clone, Copy)]
pub(crate) enum Number {
    Int(i32),
    Float(f32),
}

impl Number {
    /// Reads a numeric operand; `bool` counts as `int`.
    pub(crate) fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Int(i32::from(*b))),
            Value::Int(i) => Some(Self::Int(*i)),
            Value::Float(x) => Some(Self::Float(*x)),
            _ => None,
        }
    }

    pub(crate) const fn as_f32(self) -> f32 {
        match self {
            Self::Int(i) => i32_to_f32(i),
            Self::Float(x) => x,
        }
    }
}

impl Interpreter {
    /// Evaluates an arithmetic operation on two numbers.
    ///
    /// Two integers (or booleans) stay integral and every operation is checked:
    /// overflow and integer division or modulo by zero are errors. As soon as
    /// one side is a `float`, both sides are promoted and the IEEE rules apply.
    /// An integer raised to a negative integer power yields a `float`.
    ///
    /// # Parameters
    /// - `op`: One of `+ - * / % **`.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the computed number.
    ///
    /// # Example
    /// ```
    /// use pile::{
    ///     ast::Operator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let v = Interpreter::eval_arithmetic(Operator::Power, &Value::Int(2), &Value::Int(10));
    /// assert_eq!(v.unwrap(), Value::Int(1024));
    ///
    /// let v = Interpreter::eval_arithmetic(Operator::Divide, &Value::Int(7), &Value::Float(2.0));
    /// assert_eq!(v.unwrap(), Value::Float(3.5));
    ///
    /// assert!(Interpreter::eval_arithmetic(Operator::Modulo, &Value::Int(7), &Value::Int(0)).is_err());
    /// ```
    pub fn eval_arithmetic(op: Operator, left: &Value, right: &Value) -> EvalResult<Value> {
        match (Number::of(left), Number::of(right)) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => Self::eval_int_op(op, a, b),
            (Some(a), Some(b)) => Self::eval_float_op(op, a.as_f32(), b.as_f32()),
            _ => Err(invalid_operands(op, left, right).into()),
        }
    }

    fn eval_int_op(op: Operator, a: i32, b: i32) -> EvalResult<Value> {
        let result = match op {
            Operator::Add => a.checked_add(b),
            Operator::Subtract => a.checked_sub(b),
            Operator::Multiply => a.checked_mul(b),
            Operator::Divide | Operator::Modulo if b == 0 => {
                return Err(RuntimeError::DivisionByZero.into());
            },
            Operator::Divide => a.checked_div(b),
            Operator::Modulo => a.checked_rem(b),
            Operator::Power => match u32::try_from(b) {
                Ok(exponent) => a.checked_pow(exponent),
                Err(_) => return Ok(Value::Float(i32_to_f32(a).powf(i32_to_f32(b)))),
            },
            _ => return Err(invalid_operands(op, &Value::Int(a), &Value::Int(b)).into()),
        };

        result.map(Value::Int).ok_or_else(|| RuntimeError::Overflow.into())
    }

    fn eval_float_op(op: Operator, a: f32, b: f32) -> EvalResult<Value> {
        let result = match op {
            Operator::Add => a + b,
            Operator::Subtract => a - b,
            Operator::Multiply => a * b,
            Operator::Divide => a / b,
            Operator::Modulo => a % b,
            Operator::Power => a.powf(b),
            _ => return Err(invalid_operands(op, &Value::Float(a), &Value::Float(b)).into()),
        };

        Ok(Value::Float(result))
    }
}
