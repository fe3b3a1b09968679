use crate::prelude::*;

/// Debug printer rendering the AST in a fully parenthesized prefix form.
pub struct AstPrinter;

impl AstPrinter {
    pub fn expr_to_string(expr: &Expr) -> String {
        match expr {
            Expr::Binary { left, operator, right } | Expr::Logical { left, operator, right } => {
                Self::parenthesize(&operator.lexeme, &[left.as_ref(), right.as_ref()])
            }
            Expr::Grouping { expr } => Self::parenthesize("group", &[expr.as_ref()]),
            Expr::Literal { value } => value.to_string(),
            Expr::Unary { operator, right } => Self::parenthesize(&operator.lexeme, &[right.as_ref()]),
            Expr::Variable { name } => name.lexeme.clone(),
            Expr::Assignment { name, value } => {
                format!("(= {} {})", name.lexeme, Self::expr_to_string(value))
            }
        }
    }

    pub fn stmt_to_string(stmt: &Stmt) -> String {
        match stmt {
            Stmt::Print { expr } => format!("(print {})", Self::expr_to_string(expr)),
            Stmt::Expression { expr } => format!("(; {})", Self::expr_to_string(expr)),
            Stmt::Var { name, initializer: Some(init) } => {
                format!("(var {} {})", name.lexeme, Self::expr_to_string(init))
            }
            Stmt::Var { name, initializer: None } => format!("(var {})", name.lexeme),
            Stmt::Block { statements } => {
                let inner: Vec<String> = statements.iter().map(Self::stmt_to_string).collect();
                if inner.is_empty() {
                    "(block)".to_owned()
                } else {
                    format!("(block {})", inner.join(" "))
                }
            }
            Stmt::If { condition, then_branch, else_branch } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    Self::expr_to_string(condition),
                    Self::stmt_to_string(then_branch),
                    Self::stmt_to_string(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    Self::expr_to_string(condition),
                    Self::stmt_to_string(then_branch)
                ),
            },
            Stmt::While { condition, body } => format!(
                "(while {} {})",
                Self::expr_to_string(condition),
                Self::stmt_to_string(body)
            ),
        }
    }

    fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
        let mut s = format!("({name}");
        for expr in exprs {
            s.push(' ');
            s.push_str(&Self::expr_to_string(expr));
        }
        s.push(')');
        s
    }
}
