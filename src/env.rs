// ABOUTME: Lexical environment — a scope frame chained to its enclosing scope

use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    enclosing: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no enclosing scope.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            enclosing: None,
        })
    }

    /// Creates a new child environment enclosed by `parent`.
    pub fn with_enclosing(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            enclosing: Some(parent),
        })
    }

    /// Unconditionally binds `name` in this scope. Redefinition at the same
    /// scope silently rebinds (permits REPL re-declaration).
    pub fn define(&self, name: String, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Looks up `name.lexeme`, walking the chain toward the root scope.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.bindings.borrow().get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.get(name);
        }

        Err(RuntimeError::new(
            name,
            format!("Undefined Identifier '{}' .", name.lexeme),
        ))
    }

    /// Overwrites an existing binding. Never creates one — if no scope on
    /// the chain binds `name`, fails with `RuntimeError`.
    pub fn assign(&self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.bindings.borrow().contains_key(&name.lexeme) {
            self.bindings.borrow_mut().insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.assign(name, value);
        }

        Err(RuntimeError::new(
            name,
            format!("Undefined Identifier '{}' .", name.lexeme),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn ident(name: &str) -> Token {
        Token::new(TokenKind::Identifier, name, None, 1)
    }

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define("x".to_string(), Value::Number(42.0));
        assert_eq!(env.get(&ident("x")).unwrap(), Value::Number(42.0));
    }

    #[test]
    fn test_undefined_identifier_errors() {
        let env = Environment::new();
        assert!(env.get(&ident("missing")).is_err());
    }

    #[test]
    fn test_redefinition_silently_rebinds() {
        let env = Environment::new();
        env.define("x".to_string(), Value::Number(1.0));
        env.define("x".to_string(), Value::Number(2.0));
        assert_eq!(env.get(&ident("x")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_child_shadows_parent() {
        let parent = Environment::new();
        parent.define("x".to_string(), Value::Number(1.0));
        let child = Environment::with_enclosing(parent);
        child.define("x".to_string(), Value::Number(2.0));
        assert_eq!(child.get(&ident("x")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_child_sees_parent_binding() {
        let parent = Environment::new();
        parent.define("x".to_string(), Value::Number(1.0));
        let child = Environment::with_enclosing(parent);
        assert_eq!(child.get(&ident("x")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_assign_updates_in_defining_scope_not_enclosing() {
        let parent = Environment::new();
        parent.define("x".to_string(), Value::Number(1.0));
        let child = Environment::with_enclosing(parent.clone());

        child.assign(&ident("x"), Value::Number(99.0)).unwrap();

        assert_eq!(parent.get(&ident("x")).unwrap(), Value::Number(99.0));
    }

    #[test]
    fn test_assign_to_undefined_name_errors_and_does_not_define() {
        let parent = Environment::new();
        let child = Environment::with_enclosing(parent.clone());

        assert!(child.assign(&ident("ghost"), Value::Number(1.0)).is_err());
        // Must not have been silently defined anywhere on the chain.
        assert!(child.get(&ident("ghost")).is_err());
        assert!(parent.get(&ident("ghost")).is_err());
    }
}
