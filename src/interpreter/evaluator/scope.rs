use std::collections::HashMap;

use crate::{
    error::RuntimeError,
    interpreter::value::core::{Slot, Value, slot},
};

/// How a scope takes part in `if`/`else` execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// A plain `{ }` block, a function body or the global scope.
    NoBlock,
    /// The body of an `if` whose condition held.
    IfBlock,
    /// The body of an `if` whose condition failed; skipped.
    SkipIf,
    /// The body of an `else` whose `if` ran; skipped.
    SkipElse,
    /// The body of an `else` whose `if` did not run.
    ElseBlock,
}

impl BlockState {
    /// Returns `true` for bodies that are not executed.
    #[must_use]
    pub const fn is_skip(self) -> bool {
        matches!(self, Self::SkipIf | Self::SkipElse)
    }
}

/// One lexical environment.
#[derive(Debug)]
pub struct Scope {
    /// Function scope: lookups that miss here continue at the global scope.
    pub isolated:       bool,
    /// Conditional state of the block.
    pub state:          BlockState,
    /// A brace-less `if`/`else` body, closed after one statement.
    pub single_line:    bool,
    /// Nothing ran in this `if`/`else` body yet, so a `{` still opens it.
    pub awaiting_body:  bool,
    /// This scope or one of its parents is being skipped.
    pub skipping:       bool,
    vars:               HashMap<String, Slot>,
}

impl Scope {
    /// Creates a plain block scope.
    #[must_use]
    pub fn block() -> Self {
        Self { isolated:      false,
               state:         BlockState::NoBlock,
               single_line:   false,
               awaiting_body: false,
               skipping:      false,
               vars:          HashMap::new(), }
    }

    /// Creates the scope of a function call.
    #[must_use]
    pub fn isolated() -> Self {
        Self { isolated: true,
               ..Self::block() }
    }

    /// Creates the single-statement body of an `if` or `else`.
    #[must_use]
    pub fn conditional(state: BlockState) -> Self {
        Self { state,
               single_line: true,
               awaiting_body: true,
               skipping: state.is_skip(),
               ..Self::block() }
    }

    /// Returns the slot bound to `name` in this scope only.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.vars.get(name)
    }
}

/// The stack of scopes, innermost last.
///
/// The first scope is the global scope; it is created with the stack and
/// can never be popped.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Creates a stack holding only the global scope.
    #[must_use]
    pub fn new() -> Self {
        Self { scopes: vec![Scope::block()] }
    }

    /// Number of scopes, the global one included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Pushes a scope. A scope nested in a skipped one is skipped too.
    pub fn push(&mut self, mut scope: Scope) {
        scope.skipping |= self.current().skipping;
        self.scopes.push(scope);
    }

    /// Pops the innermost scope. The global scope is never popped.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.scopes.len() > 1 { self.scopes.pop() } else { None }
    }

    /// Pops scopes until `depth` remain, never fewer than one.
    pub fn truncate(&mut self, depth: usize) {
        self.scopes.truncate(depth.max(1));
    }

    /// Returns `true` if a braced block above the first `base` scopes is still
    /// open.
    #[must_use]
    pub fn has_open_block(&self, base: usize) -> bool {
        self.scopes.iter().skip(base).any(|scope| !scope.single_line)
    }

    /// The innermost scope.
    #[must_use]
    pub fn current(&self) -> &Scope {
        // The global scope is never popped.
        &self.scopes[self.scopes.len() - 1]
    }

    /// The innermost scope, mutably.
    pub fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// The global scope.
    #[must_use]
    pub fn global(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Finds the slot bound to `name`.
    ///
    /// Walks from the innermost scope outward. Reaching an isolated scope
    /// without a hit jumps straight to the global scope, so function bodies
    /// see their own locals and the globals but never their caller's locals.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Slot> {
        for scope in self.scopes.iter().rev() {
            if let Some(slot) = scope.vars.get(name) {
                return Some(slot);
            }
            if scope.isolated {
                return self.global().vars.get(name);
            }
        }
        None
    }

    /// Binds `name` to a new slot holding `value` in the innermost scope.
    ///
    /// # Errors
    /// Returns `RuntimeError::Redefined` if the innermost scope already binds
    /// `name`. Names of outer scopes may be shadowed.
    pub fn define(&mut self, name: &str, value: Value) -> Result<Slot, RuntimeError> {
        let new = slot(value);
        self.bind(name, new.clone())?;
        Ok(new)
    }

    /// Binds `name` to an existing slot in the innermost scope.
    ///
    /// # Errors
    /// Returns `RuntimeError::Redefined` like [`ScopeStack::define`].
    pub fn bind(&mut self, name: &str, slot: Slot) -> Result<(), RuntimeError> {
        let vars = &mut self.current_mut().vars;
        if vars.contains_key(name) {
            return Err(RuntimeError::Redefined { name: name.to_string() });
        }
        vars.insert(name.to_string(), slot);
        Ok(())
    }

    /// Replaces the value bound to `name` in the innermost scope.
    ///
    /// # Errors
    /// Returns `RuntimeError::NotDefined` if the innermost scope does not bind
    /// `name`.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        match self.current().vars.get(name) {
            Some(slot) => {
                *slot.borrow_mut() = value;
                Ok(())
            },
            None => Err(RuntimeError::NotDefined { name: name.to_string() }),
        }
    }

    /// Binds `name` in the global scope.
    ///
    /// # Errors
    /// Returns `RuntimeError::Redefined` if the global scope already binds
    /// `name`.
    pub fn define_global(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let vars = &mut self.scopes[0].vars;
        if vars.contains_key(name) {
            return Err(RuntimeError::Redefined { name: name.to_string() });
        }
        vars.insert(name.to_string(), slot(value));
        Ok(())
    }

    /// Names bound in the global scope, sorted.
    #[must_use]
    pub fn global_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.global().vars.keys().cloned().collect();
        names.sort();
        names
    }
}
