use std::rc::Rc;

use crate::{
    ast::{Expr, Operator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{
            convert::{as_bool, as_int, convert},
            core::{Array, Value},
            function::FunctionValue,
            operand::Operand,
            types::Type,
        },
    },
    util::num::index_checked,
};

impl Interpreter {
    /// Evaluates an expression tree.
    ///
    /// Identifiers that name a variable, array elements, list elements and
    /// object fields evaluate to references; everything else evaluates to a
    /// temporary. Unresolved identifiers evaluate to a `Void` placeholder that
    /// carries the name, so the consumer decides whether that is an error.
    ///
    /// # Parameters
    /// - `expr`: The expression to evaluate.
    ///
    /// # Returns
    /// The resulting operand.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::{
    ///     evaluator::core::Interpreter,
    ///     lexer::tokenize,
    ///     parser::core::parse_tokens,
    ///     value::core::Value,
    /// };
    ///
    /// let mut interpreter = Interpreter::new();
    /// let tokens = tokenize("(1 + 2) * 3").unwrap().tokens;
    /// let expr = parse_tokens(&tokens).unwrap();
    ///
    /// let operand = interpreter.eval_expr(&expr).unwrap();
    /// assert_eq!(operand.into_value(), Value::Int(9));
    /// ```
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Operand> {
        match expr {
            Expr::Literal(literal) => Ok(Operand::literal(Value::from(literal.clone()))),
            Expr::Identifier(name) => Ok(self.resolve_identifier(name)),
            Expr::ThisMember(name) => {
                let this = self.this_operand()?;
                self.member_of(&this, name)
            },
            Expr::Declare { ty, name } => self.declare(ty, name, None),
            Expr::ArrayLiteral(elements) => self.eval_array_literal(elements),
            Expr::Unary { op, operand } => {
                let value = self.eval_value(operand)?;
                Ok(Operand::temporary(Self::eval_unary(*op, &value)?))
            },
            Expr::Binary { op, left, right } => self.eval_binary_expr(*op, left, right),
            Expr::Member { object, name } => {
                let target = self.eval_expr(object)?.require_value()?;
                self.member_of(&target, name)
            },
            Expr::Call { callee, arguments } => self.eval_call(callee, arguments),
            Expr::Cast { ty, arguments } => self.eval_cast(ty, arguments),
        }
    }

    /// Evaluates an expression that must produce a value and returns an
    /// independent copy of it.
    ///
    /// # Errors
    /// Besides evaluation errors, `NotDeclared` for an unresolved identifier
    /// and `NoValue` for the result of a void call.
    pub fn eval_value(&mut self, expr: &Expr) -> EvalResult<Value> {
        Ok(self.eval_expr(expr)?.require_value()?.into_value())
    }

    fn eval_binary_expr(&mut self, op: Operator, left: &Expr, right: &Expr) -> EvalResult<Operand> {
        match op {
            Operator::ArrayAccess => self.eval_index(left, right),
            Operator::And | Operator::Or => {
                let first = as_bool(&self.eval_value(left)?)?;
                if first == (op == Operator::Or) {
                    return Ok(Operand::temporary(Value::Bool(first)));
                }
                let second = as_bool(&self.eval_value(right)?)?;
                Ok(Operand::temporary(Value::Bool(second)))
            },
            _ if op.is_assignment() => self.eval_assignment(op, left, right),
            _ => {
                let left = self.eval_value(left)?;
                let right = self.eval_value(right)?;
                Ok(Operand::temporary(Self::eval_binary(op, &left, &right)?))
            },
        }
    }

    /// Declares `name` with type `ty` in the innermost scope.
    ///
    /// Without an initial value the variable starts at its type's zero value.
    /// With one, the value is converted to the declared type.
    ///
    /// # Errors
    /// - `InvalidDeclaration` for types without a zero value, such as
    ///   `void`.
    /// - `Redefined` if the innermost scope already holds `name`.
    pub(crate) fn declare(&mut self, ty: &Type, name: &str, initial: Option<&Value>) -> EvalResult<Operand> {
        let value = match initial {
            Some(value) => convert(value, ty)?,
            None => self.zero_value(ty).ok_or_else(|| RuntimeError::InvalidDeclaration { name: name.to_string(),
                                                                                       ty:   ty.clone(), })?,
        };

        let slot = self.scopes.define(name, value)?;
        Ok(Operand::Reference(slot))
    }

    /// Evaluates `[a, b, c]`.
    ///
    /// The first element decides the element type and every other element
    /// must have exactly that type. `[]` is an untyped empty array that adopts
    /// a type when it is assigned or concatenated.
    fn eval_array_literal(&mut self, elements: &[Expr]) -> EvalResult<Operand> {
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(self.eval_value(element)?);
        }

        let element = values.first().map_or(Type::Void, Value::ty);
        if let Some(mismatch) = values.iter().find(|v| v.ty() != element) {
            return Err(RuntimeError::ArrayElementType { expected: element,
                                                        found:    mismatch.ty(), }.into());
        }

        Ok(Operand::temporary(Value::Array(Array::from_values(element, values))))
    }

    /// Evaluates `target[index]`.
    ///
    /// Array and list elements come back as references, so they can be
    /// assigned; indexing a string yields a one-character string.
    fn eval_index(&mut self, target: &Expr, index: &Expr) -> EvalResult<Operand> {
        let container = self.eval_expr(target)?.require_value()?;
        let index = as_int(&self.eval_value(index)?)?;

        let value = container.value();
        match &*value {
            Value::Array(array) => {
                let i = index_checked(index, array.items.len())?;
                Ok(Operand::Reference(Rc::clone(&array.items[i])))
            },
            Value::List(items) => {
                let i = index_checked(index, items.len())?;
                Ok(Operand::Reference(Rc::clone(&items[i])))
            },
            Value::String(text) => {
                let len = text.chars().count();
                let i = index_checked(index, len)?;
                let c = text.chars().nth(i).map(String::from).unwrap_or_default();
                Ok(Operand::temporary(Value::String(c)))
            },
            other => Err(RuntimeError::NotIndexable { ty: other.ty() }.into()),
        }
    }

    /// Returns the `this` of the running method.
    ///
    /// # Errors
    /// `ThisOutsideMethod` when no method is running.
    pub(crate) fn this_operand(&self) -> EvalResult<Operand> {
        self.scopes
            .lookup("this")
            .map(|slot| Operand::Reference(Rc::clone(slot)))
            .ok_or_else(|| RuntimeError::ThisOutsideMethod.into())
    }

    /// Looks up `name` on the value `target` holds.
    ///
    /// Object fields come back as references. Object methods come back as
    /// function values bound to the object. Methods of the built-in classes
    /// must be called right away.
    pub(crate) fn member_of(&self, target: &Operand, name: &str) -> EvalResult<Operand> {
        let value = target.value();

        let Value::Object(object) = &*value else {
            let ty = value.ty();
            let is_method = ty.builtin_class()
                              .and_then(|class| self.find_class(class))
                              .is_some_and(|class| class.method(name).is_some());
            return Err(if is_method {
                           RuntimeError::MethodNotCalled { member: name.to_string() }
                       } else {
                           RuntimeError::NoSuchMember { ty,
                                                        member: name.to_string() }
                       }.into());
        };

        if !object.is_instantiated() {
            return Err(RuntimeError::UninstantiatedObject { member: name.to_string() }.into());
        }
        if let Some(field) = object.field(name) {
            return Ok(Operand::Reference(Rc::clone(field)));
        }
        if let Some(method) = object.method(name) {
            let function = FunctionValue::bound(method.clone(), object);
            return Ok(Operand::temporary(Value::Function(function)));
        }

        Err(RuntimeError::NoSuchMember { ty:     object.ty(),
                                         member: name.to_string(), }.into())
    }
}
