use std::io::Write;

use crate::prelude::*;

impl Interpreter {
    pub fn execute(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expression { expr } => {
                self.evaluate_expr(expr)?;
            }
            Stmt::Print { expr } => {
                let value = self.evaluate_expr(expr)?;
                writeln!(self.output, "{value}")?;
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate_expr(expr)?,
                    None => Value::Nil,
                };

                self.environment.borrow_mut().define(&name.lexeme, value);
            }
            Stmt::Block { statements } => {
                let env = Environment::new().with_enclosing(self.environment.clone()).as_rc();
                self.execute_block(statements, env)?;
            }
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate_expr(condition)?.is_truthy() {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate_expr(condition)?.is_truthy() {
                    self.execute(body)?;
                }
            }
        }

        Ok(())
    }
}
