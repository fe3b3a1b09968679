use std::io::Write;

use crate::prelude::*;

pub struct Interpreter {
    pub globals: Shared<Environment>,
    pub(super) environment: Shared<Environment>,
    pub(super) output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Environment::new().as_rc();
        let environment = globals.clone();

        Self { globals, environment, output: Box::new(std::io::stdout()) }
    }

    /// Send `print` output somewhere other than stdout.
    pub fn with_output(self, output: Box<dyn Write>) -> Self {
        Self { output, ..self }
    }
}

impl Interpreter {
    /// Execute `statements` in order, stopping at the first runtime error.
    /// Output already written and globals already defined are kept.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        let result = statements.iter().try_for_each(|stmt| self.execute(stmt));

        if let Err(ref e) = result {
            tracing::debug!(error = %e, "run aborted");
            // A failing block already restored its scope, but never leave a
            // later run anywhere but at global scope.
            self.environment = self.globals.clone();
        }

        result
    }

    /// Run `statements` inside `environment`, then go back to the previous
    /// environment whether or not they succeeded.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Shared<Environment>,
    ) -> Result<(), RuntimeError> {
        let prev_env = std::mem::replace(&mut self.environment, environment);
        tracing::trace!("entering scope");

        let result = statements.iter().try_for_each(|s| self.execute(s));

        self.environment = prev_env;
        tracing::trace!("left scope");
        result
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::SharedBuffer;

    fn parse(source: &str) -> Vec<Stmt> {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty());
        Parser::new(tokens).parse().expect("failed to parse the source")
    }

    #[test]
    fn block_restores_environment_on_error() {
        let mut ipr = Interpreter::new().with_output(Box::new(SharedBuffer::default()));
        let err = ipr.interpret(&parse("var a = 1; { var b = 2; b = -\"x\"; }")).unwrap_err();

        assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
        assert!(Rc::ptr_eq(&ipr.environment, &ipr.globals));
        assert_eq!(ipr.globals.borrow().lookup("a"), Some(Value::Number(1.0)));
        assert_eq!(ipr.globals.borrow().lookup("b"), None);
    }

    #[test]
    fn block_scope_is_dropped_on_exit() {
        let mut ipr = Interpreter::new().with_output(Box::new(SharedBuffer::default()));
        ipr.interpret(&parse("{ var inner = 1; }")).unwrap();

        assert!(Rc::ptr_eq(&ipr.environment, &ipr.globals));
        assert_eq!(ipr.globals.borrow().lookup("inner"), None);
    }

    #[test]
    fn print_writes_to_output() {
        let buffer = SharedBuffer::default();
        let mut ipr = Interpreter::new().with_output(Box::new(buffer.clone()));
        ipr.interpret(&parse("print 1 + 1; print nil; print \"s\";")).unwrap();

        assert_eq!(buffer.contents(), "2\nnil\ns\n");
    }

    #[test]
    fn execute_block_runs_in_given_scope() {
        let mut ipr = Interpreter::new().with_output(Box::new(SharedBuffer::default()));
        ipr.interpret(&parse("var outer = 1;")).unwrap();

        let scope = Environment::new().with_enclosing(ipr.globals.clone()).as_rc();
        ipr.execute_block(&parse("var inner = 2; outer = 3;"), scope.clone()).unwrap();

        assert!(Rc::ptr_eq(&ipr.environment, &ipr.globals));
        assert_eq!(scope.borrow().lookup("inner"), Some(Value::Number(2.0)));
        assert_eq!(ipr.globals.borrow().lookup("inner"), None);
        assert_eq!(ipr.globals.borrow().lookup("outer"), Some(Value::Number(3.0)));
    }
}
