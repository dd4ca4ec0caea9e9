use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    ast::Literal,
    interpreter::value::{
        class::{Class, Object},
        function::{FunctionValue, Procedure},
        types::Type,
    },
};

/// An addressable storage slot.
///
/// Scopes, arrays, lists and object fields hold their values in slots; a
/// reference operand shares the slot it points at.
pub type Slot = Rc<RefCell<Value>>;

/// Wraps a value into a fresh slot.
#[must_use]
pub fn slot(value: Value) -> Slot {
    Rc::new(RefCell::new(value))
}

/// A homogeneous array: every element carries the element type.
#[derive(Debug)]
pub struct Array {
    /// Type tag shared by all elements; `void` for the empty literal.
    pub element: Type,
    /// Element slots, each owned by the array.
    pub items:   Vec<Slot>,
}

impl Array {
    /// Creates an empty array of the given element type.
    #[must_use]
    pub const fn new(element: Type) -> Self {
        Self { element,
               items: Vec::new() }
    }

    /// Creates an array from already type-checked values.
    #[must_use]
    pub fn from_values(element: Type, values: Vec<Value>) -> Self {
        Self { element,
               items: values.into_iter().map(slot).collect() }
    }

    /// Deep-copies the array.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self { element: self.element.clone(),
               items:   copy_slots(&self.items), }
    }
}

/// Represents a runtime value of the Eve language.
///
/// Values are never aliased by assignment: [`Value::copy`] produces an
/// independent instance, copying container elements and object fields.
/// Function, procedure and class values share their immutable definitions.
#[derive(Debug)]
pub enum Value {
    /// No value. Carries the text of an identifier that did not resolve, or
    /// is empty for the result of a call that returned nothing.
    Void(String),
    /// `true` or `false`.
    Bool(bool),
    /// A 32-bit signed integer.
    Int(i32),
    /// A 32-bit float.
    Float(f32),
    /// Text.
    String(String),
    /// Opaque text defined by the embedding driver.
    Macro(String),
    /// A type keyword used as a value.
    TypeName(Type),
    /// `T[]`
    Array(Array),
    /// A heterogeneous sequence.
    List(Vec<Slot>),
    /// A function, possibly bound to a receiver.
    Function(FunctionValue),
    /// A signature-less procedure.
    Procedure(Rc<Procedure>),
    /// A class template.
    Class(Rc<Class>),
    /// A class instance.
    Object(Rc<Object>),
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Bool(b) => Self::Bool(b),
            Literal::Int(i) => Self::Int(i),
            Literal::Float(f) => Self::Float(f),
            Literal::String(s) => Self::String(s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl Value {
    /// Returns the type tag.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::value::{core::{Array, Value}, types::Type};
    ///
    /// assert_eq!(Value::Int(3).ty(), Type::Int);
    /// assert_eq!(Value::Array(Array::new(Type::String)).ty().to_string(), "string[]");
    /// ```
    #[must_use]
    pub fn ty(&self) -> Type {
        match self {
            Self::Void(_) => Type::Void,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::String(_) => Type::String,
            Self::Macro(_) => Type::Macro,
            Self::TypeName(_) => Type::TypeName,
            Self::Array(array) => Type::array_of(array.element.clone()),
            Self::List(_) => Type::List,
            Self::Function(_) => Type::Function,
            Self::Procedure(_) => Type::Procedure,
            Self::Class(_) => Type::Class,
            Self::Object(object) => object.ty(),
        }
    }

    /// Produces an independent copy.
    ///
    /// Containers copy every element into a fresh slot and objects copy
    /// every field, so writing through the copy never affects the original.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::value::core::{Value, slot};
    ///
    /// let original = Value::List(vec![slot(Value::Int(1))]);
    /// let copy = original.copy();
    /// if let Value::List(items) = &copy {
    ///     *items[0].borrow_mut() = Value::Int(2);
    /// }
    /// assert_eq!(original, Value::List(vec![slot(Value::Int(1))]));
    /// ```
    #[must_use]
    pub fn copy(&self) -> Self {
        match self {
            Self::Void(name) => Self::Void(name.clone()),
            Self::Bool(b) => Self::Bool(*b),
            Self::Int(i) => Self::Int(*i),
            Self::Float(f) => Self::Float(*f),
            Self::String(s) => Self::String(s.clone()),
            Self::Macro(m) => Self::Macro(m.clone()),
            Self::TypeName(ty) => Self::TypeName(ty.clone()),
            Self::Array(array) => Self::Array(array.copy()),
            Self::List(items) => Self::List(copy_slots(items)),
            Self::Function(function) => Self::Function(function.clone()),
            Self::Procedure(procedure) => Self::Procedure(Rc::clone(procedure)),
            Self::Class(class) => Self::Class(Rc::clone(class)),
            Self::Object(object) => Self::Object(Rc::new(object.copy())),
        }
    }

    /// Returns `true` for the no-value placeholder.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Void(_))
    }

    /// Returns the number of elements of a container or characters of a
    /// string.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Array(array) => Some(array.items.len()),
            Self::List(items) => Some(items.len()),
            Self::String(s) => Some(s.chars().count()),
            _ => None,
        }
    }
}

/// Deep-copies a run of slots into fresh ones.
pub(crate) fn copy_slots(items: &[Slot]) -> Vec<Slot> {
    items.iter().map(|item| slot(item.borrow().copy())).collect()
}

impl PartialEq for Value {
    /// Structural equality without numeric promotion.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Void(a), Self::Void(b))
            | (Self::String(a), Self::String(b))
            | (Self::Macro(a), Self::Macro(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::TypeName(a), Self::TypeName(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a.element == b.element && slots_eq(&a.items, &b.items),
            (Self::List(a), Self::List(b)) => slots_eq(a, b),
            (Self::Function(a), Self::Function(b)) => a.callable.same_as(&b.callable),
            (Self::Procedure(a), Self::Procedure(b)) => Rc::ptr_eq(a, b),
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b) || **a == **b,
            _ => false,
        }
    }
}

fn slots_eq(a: &[Slot], b: &[Slot]) -> bool {
    a.len() == b.len()
    && a.iter()
        .zip(b)
        .all(|(x, y)| Rc::ptr_eq(x, y) || *x.borrow() == *y.borrow())
}

impl fmt::Display for Value {
    /// Formats the value the way `string()` and `print()` show it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void(name) if name.is_empty() => write!(f, "void"),
            Self::Void(name) | Self::String(name) | Self::Macro(name) => write!(f, "{name}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::TypeName(ty) => write!(f, "{ty}"),
            Self::Array(array) => write_items(f, &array.items),
            Self::List(items) => write_items(f, items),
            Self::Function(function) => write!(f, "function {}", function.callable.name()),
            Self::Procedure(procedure) => write!(f, "procedure {}", procedure.name),
            Self::Class(class) => write!(f, "class {}", class.name),
            Self::Object(object) => {
                write!(f, "{}{{", object.ty())?;
                for (i, (name, field)) in object.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {}", field.borrow())?;
                }
                write!(f, "}}")
            },
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Slot]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item.borrow())?;
    }
    write!(f, "]")
}
