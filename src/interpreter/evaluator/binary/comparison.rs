use std::cmp::Ordering;

use crate::{
    ast::Operator,
    interpreter::{
        evaluator::{
            binary::{core::invalid_operands, scalar::Number},
            core::{EvalResult, Interpreter},
        },
        value::core::Value,
    },
};

/// Returns the text of a `string` or `macro`.
fn text(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) | Value::Macro(s) => Some(s),
        _ => None,
    }
}

/// Orders two numbers, comparing integers exactly.
fn compare_numbers(a: Number, b: Number) -> Option<Ordering> {
    match (a, b) {
        (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
        _ => a.as_f32().partial_cmp(&b.as_f32()),
    }
}

impl Interpreter {
    /// Evaluates `<`, `<=`, `>` or `>=`.
    ///
    /// Numbers are promoted before comparing; strings compare
    /// lexicographically. Any comparison involving NaN is `false`.
    ///
    /// # Example
    /// ```
    /// use pile::{
    ///     ast::Operator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let v = Interpreter::eval_ordering(Operator::Less, &Value::Int(1), &Value::Float(1.5));
    /// assert_eq!(v.unwrap(), Value::Bool(true));
    ///
    /// let v = Interpreter::eval_ordering(Operator::Greater, &Value::from("b"), &Value::from("a"));
    /// assert_eq!(v.unwrap(), Value::Bool(true));
    /// ```
    pub fn eval_ordering(op: Operator, left: &Value, right: &Value) -> EvalResult<Value> {
        let ordering = match (Number::of(left), Number::of(right)) {
            (Some(a), Some(b)) => compare_numbers(a, b),
            _ => match (text(left), text(right)) {
                (Some(a), Some(b)) => Some(a.cmp(b)),
                _ => return Err(invalid_operands(op, left, right).into()),
            },
        };

        let result = ordering.is_some_and(|ordering| match op {
                                 Operator::Less => ordering.is_lt(),
                                 Operator::LessEqual => ordering.is_le(),
                                 Operator::Greater => ordering.is_gt(),
                                 _ => ordering.is_ge(),
                             });
        Ok(Value::Bool(result))
    }

    /// Evaluates `==` or `!=`.
    ///
    /// Numbers compare after promotion, so `1 == 1.0` holds. Strings and
    /// macros compare by text. Other values must have the same type and
    /// compare structurally: arrays and lists element by element, objects
    /// field by field.
    pub fn eval_equality(op: Operator, left: &Value, right: &Value) -> EvalResult<Value> {
        let equal = match (Number::of(left), Number::of(right)) {
            (Some(a), Some(b)) => compare_numbers(a, b).is_some_and(Ordering::is_eq),
            _ => match (text(left), text(right)) {
                (Some(a), Some(b)) => a == b,
                _ if left.ty() == right.ty() => left == right,
                _ => return Err(invalid_operands(op, left, right).into()),
            },
        };

        Ok(Value::Bool(if op == Operator::NotEqual { !equal } else { equal }))
    }
}
