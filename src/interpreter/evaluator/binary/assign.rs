use crate::{
    ast::{Expr, Operator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{
            convert::convert,
            core::Value,
            operand::Operand,
            types::Type,
        },
    },
};

/// Converts `source` so it can be stored where `current` lives.
///
/// Numbers convert among each other, an untyped empty array adopts the
/// target's element type, and every other value must already have the
/// target's type.
fn stored_value(current: &Value, source: &Value) -> Result<Value, RuntimeError> {
    match current.ty() {
        Type::Void => Ok(source.copy()),
        target => convert(source, &target),
    }
}

impl Interpreter {
    /// Evaluates `=` and the compound assignments.
    ///
    /// `T name = value` declares and initializes in one step; the value is
    /// evaluated before the name exists. Otherwise the target is evaluated
    /// first and must be a reference; a compound operator applies its base
    /// operator to the current value before storing.
    ///
    /// # Returns
    /// The target reference, so assignments chain: `a = b = 3`.
    pub(crate) fn eval_assignment(&mut self, op: Operator, target: &Expr, value: &Expr) -> EvalResult<Operand> {
        if op == Operator::Assign
           && let Expr::Declare { ty, name } = target
        {
            let initial = self.eval_value(value)?;
            return self.declare(ty, name, Some(&initial));
        }

        // A `function` variable holds no value until its first assignment.
        let mut target = self.eval_expr(target)?;
        if !target.is_reference() {
            target = target.require_value()?;
        }
        let source = self.eval_value(value)?;

        let source = match op.compound_base() {
            Some(base) => Self::eval_binary(base, &target.to_value(), &source)?,
            None => source,
        };

        Self::assign(target, &source)
    }

    /// Stores a copy of `source` into the slot `target` refers to.
    ///
    /// # Errors
    /// - `AssignToNonReference` if `target` is a literal or temporary.
    /// - `NotConvertible` if the value cannot take the target's type.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::{
    ///     evaluator::core::Interpreter,
    ///     value::{core::{Value, slot}, operand::Operand},
    /// };
    ///
    /// let x = slot(Value::Int(0));
    ///
    /// Interpreter::assign(Operand::Reference(x.clone()), &Value::Float(2.5)).unwrap();
    /// assert_eq!(*x.borrow(), Value::Int(2));
    ///
    /// assert!(Interpreter::assign(Operand::literal(Value::Int(5)), &Value::Int(3)).is_err());
    /// ```
    pub fn assign(target: Operand, source: &Value) -> EvalResult<Operand> {
        let slot = match target {
            Operand::Reference(slot) => slot,
            Operand::Temporary { value, .. } => {
                return Err(RuntimeError::AssignToNonReference { target: value.to_string() }.into());
            },
        };

        let stored = stored_value(&slot.borrow(), source)?;
        *slot.borrow_mut() = stored;
        Ok(Operand::Reference(slot))
    }
}
