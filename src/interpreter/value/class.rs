use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{
            core::{Slot, Value, slot},
            function::{Callable, MAX_NATIVE_ARITY, NativeFunction},
            operand::Operand,
            types::Type,
        },
    },
};

/// A field record of a class template.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Declared type; determines the zero value an instance starts with.
    pub ty:   Type,
    /// Field name.
    pub name: String,
}

/// A method record of a class template.
#[derive(Debug, Clone)]
pub struct Method {
    /// Method name.
    pub name:     String,
    /// What the method runs.
    pub function: Callable,
}

/// A named class template.
///
/// Classes are registered once with the interpreter and never change
/// afterwards; objects are stamped out of them on declaration.
///
/// # Example
/// ```
/// use pile::interpreter::value::{class::Class, types::Type};
///
/// let mut class = Class::new("Target");
/// class.add_field(Type::String, "name");
/// class.add_field(Type::array_of(Type::String), "sources");
///
/// assert_eq!(class.fields.len(), 2);
/// assert!(class.method("build").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Class {
    /// Class name.
    pub name:    String,
    /// Fields in declaration order.
    pub fields:  Vec<Field>,
    /// Methods in declaration order.
    pub methods: Vec<Method>,
}

impl Class {
    /// Creates an empty class.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self { name:    name.to_string(),
               fields:  Vec::new(),
               methods: Vec::new(), }
    }

    /// Appends a field record.
    pub fn add_field(&mut self, ty: Type, name: &str) {
        self.fields.push(Field { ty,
                                 name: name.to_string() });
    }

    /// Appends a method record.
    pub fn add_method(&mut self, name: &str, function: Callable) {
        self.methods.push(Method { name: name.to_string(),
                                   function });
    }

    /// Appends a method implemented by a native callback.
    ///
    /// The callback receives the receiver as its first operand, so `arity`
    /// counts it.
    ///
    /// # Errors
    /// Returns `RuntimeError::NativeArity` if `arity` exceeds five.
    pub fn add_native_method<F>(&mut self, name: &str, arity: usize, callback: F) -> Result<(), RuntimeError>
        where F: Fn(&mut Interpreter, &[Operand]) -> EvalResult<Value> + 'static
    {
        if arity > MAX_NATIVE_ARITY {
            return Err(RuntimeError::NativeArity { name: name.to_string(),
                                                   arity });
        }
        let native = NativeFunction { name: format!("{}.{name}", self.name),
                                      arity,
                                      callback: Rc::new(callback) };
        self.add_method(name, Callable::Native(Rc::new(native)));
        Ok(())
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Callable> {
        self.methods
            .iter()
            .find(|m| m.name == name)
            .map(|m| &m.function)
    }
}

/// An instance of a class.
///
/// Every field lives in its own slot, so a reference to a field can be
/// handed out and assigned through. Methods are shared with the template.
#[derive(Debug)]
pub struct Object {
    /// Name of the class; empty if the class was never found.
    pub class_name: String,
    /// Fields in declaration order.
    pub fields:     Vec<(String, Slot)>,
    /// Methods in declaration order.
    pub methods:    Vec<(String, Callable)>,
}

impl Object {
    /// Creates the placeholder object of a class that was never found.
    #[must_use]
    pub const fn uninstantiated() -> Self {
        Self { class_name: String::new(),
               fields:     Vec::new(),
               methods:    Vec::new(), }
    }

    /// Returns `false` for the placeholder of an unknown class.
    #[must_use]
    pub const fn is_instantiated(&self) -> bool {
        !self.class_name.is_empty()
    }

    /// Looks up a field slot by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Slot> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, slot)| slot)
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Callable> {
        self.methods
            .iter()
            .find(|(method, _)| method == name)
            .map(|(_, callable)| callable)
    }

    /// Deep-copies the object: fields get fresh slots holding copies.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self { class_name: self.class_name.clone(),
               fields:     self.fields
                               .iter()
                               .map(|(name, field)| {
                                   (name.clone(), slot(field.borrow().copy()))
                               })
                               .collect(),
               methods:    self.methods.clone(), }
    }

    /// Returns the object's type tag.
    #[must_use]
    pub fn ty(&self) -> Type {
        Type::Object(self.class_name.clone())
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.class_name == other.class_name
        && self.fields.len() == other.fields.len()
        && self.fields
               .iter()
               .zip(&other.fields)
               .all(|((a, x), (b, y))| a == b && *x.borrow() == *y.borrow())
    }
}

/// Builds an owned object value sharing `object`.
#[must_use]
pub fn object_value(object: &Rc<Object>) -> Value {
    Value::Object(Rc::clone(object))
}
