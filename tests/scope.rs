use std::rc::Rc;

use pile::{
    error::RuntimeError,
    interpreter::{
        evaluator::scope::{BlockState, Scope, ScopeStack},
        value::core::Value,
    },
};
use pretty_assertions::assert_eq;

fn value_of(stack: &ScopeStack, name: &str) -> Option<Value> {
    stack.lookup(name).map(|slot| slot.borrow().copy())
}

#[test]
fn the_global_scope_is_never_popped() {
    let mut stack = ScopeStack::new();
    assert_eq!(stack.depth(), 1);
    assert!(stack.pop().is_none());

    stack.push(Scope::block());
    stack.push(Scope::block());
    stack.truncate(0);
    assert_eq!(stack.depth(), 1);
}

#[test]
fn inner_scopes_shadow_outer_ones() {
    let mut stack = ScopeStack::new();
    stack.define("x", Value::Int(1)).unwrap();
    stack.push(Scope::block());
    stack.define("x", Value::Int(2)).unwrap();
    assert_eq!(value_of(&stack, "x"), Some(Value::Int(2)));

    stack.pop();
    assert_eq!(value_of(&stack, "x"), Some(Value::Int(1)));
}

#[test]
fn redefinition_in_one_scope_fails() {
    let mut stack = ScopeStack::new();
    stack.define("x", Value::Int(1)).unwrap();
    assert_eq!(stack.define("x", Value::Int(2)).unwrap_err(),
               RuntimeError::Redefined { name: "x".to_string() });
    assert!(stack.define_global("x", Value::Int(3)).is_err());
}

#[test]
fn isolated_scopes_skip_to_the_globals() {
    let mut stack = ScopeStack::new();
    stack.define("global", Value::Int(1)).unwrap();
    stack.push(Scope::block());
    stack.define("caller", Value::Int(2)).unwrap();
    stack.push(Scope::isolated());
    stack.define("local", Value::Int(3)).unwrap();

    assert_eq!(value_of(&stack, "global"), Some(Value::Int(1)));
    assert_eq!(value_of(&stack, "local"), Some(Value::Int(3)));
    assert_eq!(value_of(&stack, "caller"), None);
}

#[test]
fn bound_slots_are_shared() {
    let mut stack = ScopeStack::new();
    let outer = stack.define("count", Value::Int(0)).unwrap();
    stack.push(Scope::isolated());
    stack.bind("counter", Rc::clone(&outer)).unwrap();
    *stack.lookup("counter").unwrap().borrow_mut() = Value::Int(5);

    assert_eq!(*outer.borrow(), Value::Int(5));
}

#[test]
fn set_only_touches_the_innermost_scope() {
    let mut stack = ScopeStack::new();
    stack.define("x", Value::Int(1)).unwrap();
    stack.push(Scope::block());
    assert_eq!(stack.set("x", Value::Int(2)).unwrap_err(),
               RuntimeError::NotDefined { name: "x".to_string() });

    stack.pop();
    stack.set("x", Value::Int(2)).unwrap();
    assert_eq!(value_of(&stack, "x"), Some(Value::Int(2)));
}

#[test]
fn skipping_propagates_into_nested_scopes() {
    let mut stack = ScopeStack::new();
    stack.push(Scope::conditional(BlockState::SkipIf));
    assert!(stack.current().skipping);
    assert!(stack.current().single_line);

    stack.push(Scope::block());
    assert!(stack.current().skipping);
    assert!(stack.has_open_block(1));
    assert!(stack.has_open_block(2));
    assert!(!stack.has_open_block(3));
}

#[test]
fn open_blocks_ignore_single_line_bodies() {
    let mut stack = ScopeStack::new();
    stack.push(Scope::conditional(BlockState::IfBlock));
    assert!(!stack.current().skipping);
    assert!(!stack.has_open_block(1));

    stack.push(Scope::block());
    assert!(stack.has_open_block(1));
}

#[test]
fn global_names_are_sorted() {
    let mut stack = ScopeStack::new();
    stack.define_global("SOURCES", Value::Int(0)).unwrap();
    stack.define_global("CFLAGS", Value::Int(0)).unwrap();
    stack.push(Scope::block());
    stack.define("local", Value::Int(0)).unwrap();

    assert_eq!(stack.global_names(), ["CFLAGS", "SOURCES"]);
}
