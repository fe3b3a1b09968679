use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::RuntimeError;
use crate::token::Token;
use crate::value::Value;

/// One lexical scope. Lookups and assignments walk outward through
/// `enclosing`; definitions only ever touch this scope.
#[derive(Debug, Default)]
pub struct Environment {
    enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(self, enclosing: Rc<RefCell<Environment>>) -> Self {
        Self { enclosing: Some(enclosing), ..self }
    }

    pub fn as_rc(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_owned(), value);
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            return Ok(());
        }

        // Ask one level above if possible
        match self.enclosing {
            Some(ref e) => e.borrow_mut().assign(name, value),
            None => Err(RuntimeError::UndefinedVariable { name: name.clone() }),
        }
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        self.lookup(&name.lexeme)
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() })
    }

    /// Resolve `name` through the scope chain without a token at hand.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }

        self.enclosing.as_ref().and_then(|e| e.borrow().lookup(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::Identifier, name, None, 7)
    }

    #[test]
    fn get_searches_enclosing_scopes() {
        let globals = Environment::new().as_rc();
        globals.borrow_mut().define("a", Value::Number(1.0));

        let inner = Environment::new().with_enclosing(globals.clone());
        assert_eq!(inner.get(&ident("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn define_shadows_without_touching_parent() {
        let globals = Environment::new().as_rc();
        globals.borrow_mut().define("a", Value::Number(1.0));

        let mut inner = Environment::new().with_enclosing(globals.clone());
        inner.define("a", Value::Number(2.0));

        assert_eq!(inner.get(&ident("a")).unwrap(), Value::Number(2.0));
        assert_eq!(globals.borrow().get(&ident("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_mutates_nearest_binding() {
        let globals = Environment::new().as_rc();
        globals.borrow_mut().define("a", Value::Number(1.0));

        let mut inner = Environment::new().with_enclosing(globals.clone());
        inner.assign(&ident("a"), Value::Boolean(true)).unwrap();

        assert_eq!(globals.borrow().lookup("a"), Some(Value::Boolean(true)));
        assert_eq!(inner.values.get("a"), None);
    }

    #[test]
    fn assign_never_declares() {
        let mut env = Environment::new();
        let err = env.assign(&ident("missing"), Value::Nil).unwrap_err();

        assert_eq!(err.to_string(), "[line 7] Undefined variable 'missing'.");
        assert_eq!(env.lookup("missing"), None);
    }

    #[test]
    fn redefine_rebinds() {
        let mut env = Environment::new();
        env.define("a", Value::Number(1.0));
        env.define("a", Value::Nil);
        assert_eq!(env.lookup("a"), Some(Value::Nil));
    }
}
