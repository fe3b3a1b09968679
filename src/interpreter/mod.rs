mod environment;
mod error;
mod expr;
mod itpr;
mod stmt;

pub use environment::Environment;
pub use error::RuntimeError;
pub use itpr::Interpreter;

type InterpreterResult = Result<crate::value::Value, RuntimeError>;
