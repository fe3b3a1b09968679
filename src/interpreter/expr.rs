use super::InterpreterResult;
use crate::prelude::*;

impl Interpreter {
    pub fn evaluate_expr(&mut self, expr: &Expr) -> InterpreterResult {
        match expr {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expr: inner } => self.evaluate_expr(inner),
            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),
            Expr::Binary { left, operator, right } => self.evaluate_binary(left, operator, right),
            Expr::Variable { name } => self.environment.borrow().get(name),
            Expr::Assignment { name, value } => {
                let value = self.evaluate_expr(value)?;
                self.environment.borrow_mut().assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Logical { left, operator, right } => {
                let left_val = self.evaluate_expr(left)?;

                if operator.token_type == TokenType::Or {
                    if left_val.is_truthy() {
                        return Ok(left_val);
                    }
                } else {
                    // TokenType::And
                    if !left_val.is_truthy() {
                        return Ok(left_val);
                    }
                }

                self.evaluate_expr(right)
            }
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> InterpreterResult {
        let value = self.evaluate_expr(right)?;
        match operator.token_type {
            TokenType::Minus => match value {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::type_mismatch(operator, "Operand must be a number.")),
            },
            TokenType::Bang => Ok(Value::Boolean(!value.is_truthy())),

            // The parser never builds a unary expression with another operator.
            _ => unreachable!("invalid unary operator {:?}", operator.token_type),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> InterpreterResult {
        let left_value = self.evaluate_expr(left)?;
        let right_value = self.evaluate_expr(right)?;

        match operator.token_type {
            TokenType::Plus => match (left_value, right_value) {
                (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
                _ => Err(RuntimeError::type_mismatch(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            },
            TokenType::Minus => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Value::Number(l - r)),
            TokenType::Star => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Value::Number(l * r)),
            TokenType::Slash => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Value::Number(l / r)),
            TokenType::Greater => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Value::Boolean(l > r)),
            TokenType::GreaterEqual => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Value::Boolean(l >= r)),
            TokenType::Less => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Value::Boolean(l < r)),
            TokenType::LessEqual => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Value::Boolean(l <= r)),

            TokenType::EqualEqual => Ok(Value::Boolean(left_value == right_value)),
            TokenType::BangEqual => Ok(Value::Boolean(left_value != right_value)),

            _ => unreachable!("invalid binary operator {:?}", operator.token_type),
        }
    }

    fn check_number_operands(
        &self,
        operator: &Token,
        left: &Value,
        right: &Value,
    ) -> Result<(f64, f64), RuntimeError> {
        match (left.number(), right.number()) {
            (Some(l), Some(r)) => Ok((l, r)),
            _ => Err(RuntimeError::type_mismatch(operator, "Operands must be numbers.")),
        }
    }
}
