use crate::{
    ast::Operator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::invalid_operands,
            core::{EvalResult, Interpreter},
        },
        value::{
            convert::convert,
            core::{Array, Value, copy_slots, slot},
            types::{Type, is_convertible},
        },
    },
};

impl Interpreter {
    /// Concatenates two pieces of text.
    ///
    /// Two macros stay a macro; any other mix of `string` and `macro` gives a
    /// `string`.
    pub(crate) fn eval_text_concat(left: &Value, right: &Value) -> Value {
        match (left, right) {
            (Value::Macro(a), Value::Macro(b)) => Value::Macro(format!("{a}{b}")),
            (Value::String(a) | Value::Macro(a), Value::String(b) | Value::Macro(b)) => {
                Value::String(format!("{a}{b}"))
            },
            _ => Value::String(format!("{left}{right}")),
        }
    }

    /// Evaluates `+` with an array or a list on the left.
    ///
    /// - `T[] + T` appends a copy of the element; numbers are converted to
    ///   the element type.
    /// - `T[] + T[]` concatenates; an untyped empty array adopts the element
    ///   type of the other side.
    /// - `list + list` concatenates, `list + x` appends.
    ///
    /// The operands are never modified; the result holds copies.
    ///
    /// # Example
    /// ```
    /// use pile::{
    ///     ast::Operator,
    ///     interpreter::{
    ///         evaluator::core::Interpreter,
    ///         value::{core::{Array, Value}, types::Type},
    ///     },
    /// };
    ///
    /// let sources = Value::Array(Array::from_values(Type::String, vec![Value::from("main.c")]));
    /// let all = Interpreter::eval_binary(Operator::Add, &sources, &Value::from("util.c")).unwrap();
    ///
    /// assert_eq!(all.size(), Some(2));
    /// assert_eq!(all.to_string(), "[main.c, util.c]");
    /// ```
    pub fn eval_container_add(left: &Value, right: &Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::List(a), Value::List(b)) => {
                let mut items = copy_slots(a);
                items.extend(copy_slots(b));
                Ok(Value::List(items))
            },
            (Value::List(a), item) => {
                let mut items = copy_slots(a);
                items.push(slot(item.copy()));
                Ok(Value::List(items))
            },
            (Value::Array(a), item) if a.element != Type::Void && is_convertible(&item.ty(), &a.element) => {
                let mut array = a.copy();
                array.items.push(slot(convert(item, &a.element)?));
                Ok(Value::Array(array))
            },
            (Value::Array(a), Value::Array(b)) => Ok(Value::Array(Self::concat_arrays(a, b)?)),
            (Value::Array(a), item) if a.element == Type::Void => {
                Ok(Value::Array(Array::from_values(item.ty(), vec![item.copy()])))
            },
            (Value::Array(a), item) => Err(RuntimeError::ArrayElementType { expected: a.element.clone(),
                                                                            found:    item.ty(), }.into()),
            _ => Err(invalid_operands(Operator::Add, left, right).into()),
        }
    }

    fn concat_arrays(a: &Array, b: &Array) -> Result<Array, RuntimeError> {
        let element = match (&a.element, &b.element) {
            (Type::Void, other) | (other, Type::Void) => other.clone(),
            (x, y) if x == y => x.clone(),
            (x, y) => {
                return Err(RuntimeError::ArrayElementType { expected: Type::array_of(x.clone()),
                                                            found:    Type::array_of(y.clone()), });
            },
        };

        let mut items = copy_slots(&a.items);
        items.extend(copy_slots(&b.items));
        Ok(Array { element,
                   items })
    }
}
