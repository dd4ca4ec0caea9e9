use std::cell::Ref;

use crate::{
    error::RuntimeError,
    interpreter::value::{
        core::{Slot, Value},
        types::Type,
    },
};

/// The result of evaluating an expression.
///
/// A `Reference` is an addressable storage slot owned by a scope, an array,
/// a list or an object field: assignment operators may write through it. A
/// `Temporary` is owned by the expression that produced it and is dropped
/// once consumed; `literal` marks values written directly in the source.
#[derive(Debug)]
pub enum Operand {
    /// A storage slot.
    Reference(Slot),
    /// A value with no storage behind it.
    Temporary {
        /// The value itself.
        value:   Value,
        /// Written as a literal in the source.
        literal: bool,
    },
}

/// A borrow of an operand's value, whichever kind of operand it is.
pub enum ValueRef<'a> {
    /// Borrowed out of a slot.
    Slot(Ref<'a, Value>),
    /// Borrowed from a temporary.
    Plain(&'a Value),
}

impl std::ops::Deref for ValueRef<'_> {
    type Target = Value;

    fn deref(&self) -> &Value {
        match self {
            Self::Slot(value) => value,
            Self::Plain(value) => value,
        }
    }
}

impl Operand {
    /// Wraps a computed value.
    #[must_use]
    pub const fn temporary(value: Value) -> Self {
        Self::Temporary { value,
                          literal: false }
    }

    /// Wraps a value written in the source.
    #[must_use]
    pub const fn literal(value: Value) -> Self {
        Self::Temporary { value,
                          literal: true }
    }

    /// The result of a call that produced nothing.
    #[must_use]
    pub const fn nothing() -> Self {
        Self::temporary(Value::Void(String::new()))
    }

    /// Returns `true` for storage slots.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    /// Returns `true` for values written in the source.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Temporary { literal: true, .. })
    }

    /// Returns the slot of a reference.
    #[must_use]
    pub const fn slot(&self) -> Option<&Slot> {
        match self {
            Self::Reference(slot) => Some(slot),
            Self::Temporary { .. } => None,
        }
    }

    /// Borrows the value.
    ///
    /// The borrow must end before the slot is written again.
    #[must_use]
    pub fn value(&self) -> ValueRef<'_> {
        match self {
            Self::Reference(slot) => ValueRef::Slot(slot.borrow()),
            Self::Temporary { value, .. } => ValueRef::Plain(value),
        }
    }

    /// Returns the value's type tag.
    #[must_use]
    pub fn ty(&self) -> Type {
        self.value().ty()
    }

    /// Returns an independent copy of the value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.value().copy()
    }

    /// Takes the value out: temporaries are moved, references copied.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Reference(slot) => slot.borrow().copy(),
            Self::Temporary { value, .. } => value,
        }
    }

    /// Ensures the operand actually holds a value.
    ///
    /// # Errors
    /// An unresolved identifier reports `NotDeclared`; the result of a void
    /// call reports `NoValue`.
    pub fn require_value(self) -> Result<Self, RuntimeError> {
        match &*self.value() {
            Value::Void(name) if name.is_empty() => return Err(RuntimeError::NoValue),
            Value::Void(name) => return Err(RuntimeError::NotDeclared { name: name.clone() }),
            _ => {},
        }
        Ok(self)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Self::temporary(value)
    }
}
