use crate::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Grouping {
        expr: Box<Expr>,
    },
    Literal {
        value: Value,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Variable {
        name: Token,
    },
    Assignment {
        name: Token,
        value: Box<Expr>,
    },
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn number_literal(v: f64) -> Expr {
        Expr::Literal { value: Value::Number(v) }
    }

    pub fn str_literal(s: &str) -> Expr {
        Expr::Literal { value: Value::String(s.to_owned()) }
    }

    pub fn bool_literal(b: bool) -> Expr {
        Expr::Literal { value: Value::Boolean(b) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Print {
        expr: Expr,
    },
    Expression {
        expr: Expr,
    },
    Var {
        name: Token,
        initializer: Option<Expr>,
    },
    Block {
        statements: Vec<Stmt>,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
}
