use crate::{
    ast::Operator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

/// Builds the error for an operator that has no rule for its operands.
pub(crate) fn invalid_operands(op: Operator, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::InvalidOperands { op,
                                    left: left.ty(),
                                    right: right.ty() }
}

impl Interpreter {
    /// Evaluates a binary operation between two values.
    ///
    /// Routes the operation to a specialized handler depending on the operator
    /// and the operand types. `+` concatenates strings, arrays and lists and
    /// adds numbers; the other arithmetic operators work on numbers only.
    /// Relational and equality operators use `eval_ordering` and
    /// `eval_equality`, the bitwise family `eval_bitwise`. `&&` and `||` are
    /// evaluated eagerly here; the expression walker short-circuits them before
    /// they get this far.
    ///
    /// Assignments and array access need storage and are not handled here.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    ///
    /// # Example
    /// ```
    /// use pile::{
    ///     ast::Operator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let result = Interpreter::eval_binary(Operator::Add, &Value::Int(3), &Value::Int(4));
    /// assert_eq!(result.unwrap(), Value::Int(7));
    ///
    /// let result = Interpreter::eval_binary(Operator::Add, &Value::from("ab"), &Value::from("c"));
    /// assert_eq!(result.unwrap(), Value::from("abc"));
    /// ```
    pub fn eval_binary(op: Operator, left: &Value, right: &Value) -> EvalResult<Value> {
        use Operator::{
            Add, And, BitAnd, BitOr, BitXor, Divide, Equal, Greater, GreaterEqual, Less, LessEqual,
            Modulo, Multiply, NotEqual, Or, Power, Subtract,
        };

        match op {
            Add => match (left, right) {
                (Value::String(_) | Value::Macro(_), Value::String(_) | Value::Macro(_)) => {
                    Ok(Self::eval_text_concat(left, right))
                },
                (Value::Array(_) | Value::List(_), _) => Self::eval_container_add(left, right),
                _ => Self::eval_arithmetic(op, left, right),
            },

            Subtract | Multiply | Divide | Modulo | Power => Self::eval_arithmetic(op, left, right),

            Less | LessEqual | Greater | GreaterEqual => Self::eval_ordering(op, left, right),

            Equal | NotEqual => Self::eval_equality(op, left, right),

            BitAnd | BitOr | BitXor => Self::eval_bitwise(op, left, right),

            And | Or => Self::eval_logic(op, left, right),

            _ => Err(invalid_operands(op, left, right).into()),
        }
    }
}
