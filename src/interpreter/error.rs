use crate::token::Token;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("[line {}] {message}", .operator.line)]
    TypeMismatch { operator: Token, message: String },
    #[error("[line {}] Undefined variable '{}'.", .name.line, .name.lexeme)]
    UndefinedVariable { name: Token },
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl RuntimeError {
    pub fn type_mismatch(operator: &Token, message: &str) -> Self {
        Self::TypeMismatch { operator: operator.clone(), message: message.to_owned() }
    }
}
