#![allow(clippy::new_without_default)]

mod ast;
mod interpreter;
mod parser;
mod printer;
mod scanner;
mod token;
mod value;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::interpreter::*;
    pub use crate::parser::*;
    pub use crate::printer::AstPrinter;
    pub use crate::scanner::*;
    pub use crate::token::*;
    pub use crate::value::Value;
    pub use crate::Shared;
}

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::rc::Rc;

use prelude::{Interpreter, Parser, RuntimeError, Scanner, Stmt, Token};

pub type Shared<T> = Rc<RefCell<T>>;

/// Exit codes used by the command line driver.
pub mod exit_code {
    pub const USAGE: i32 = 64;
    pub const DATA_ERR: i32 = 65;
    pub const SOFTWARE: i32 = 70;
    pub const IO_ERR: i32 = 74;
}

#[derive(Debug, thiserror::Error)]
pub enum LoxError {
    /// Scanning or parsing reported diagnostics; nothing was executed.
    #[error("{count} syntax error(s)")]
    Static { count: usize },
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl LoxError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LoxError::Static { .. } => exit_code::DATA_ERR,
            LoxError::Runtime(_) => exit_code::SOFTWARE,
            LoxError::Io(_) => exit_code::IO_ERR,
        }
    }
}

pub struct Lox {
    interpreter: Interpreter,
    error_reporter: ErrorReporter,
}

impl Lox {
    pub fn new() -> Self {
        Self { interpreter: Interpreter::new(), error_reporter: ErrorReporter::default() }
    }

    /// A driver writing program output and diagnostics to the given sinks.
    pub fn with_sinks(output: Box<dyn Write>, errors: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::new().with_output(output),
            error_reporter: ErrorReporter::new(errors),
        }
    }
}

impl Lox {
    pub fn run_file<P: AsRef<Path>>(&mut self, filename: P) -> Result<(), LoxError> {
        let content = std::fs::read_to_string(filename)?;
        self.run(&content)
    }

    /// Read lines from stdin and run each one until EOF or `exit`.
    /// Errors are reported but never end the session.
    pub fn run_prompt(&mut self) -> Result<(), LoxError> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            print!("> ");
            io::stdout().flush()?;

            let Some(line) = lines.next() else { break };
            let line = line?;
            if line.trim() == "exit" {
                break;
            }

            match self.run(&line) {
                Ok(()) | Err(LoxError::Static { .. }) | Err(LoxError::Runtime(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// Scan, parse and, if both were clean, execute `source`. Bindings made
    /// by earlier runs stay visible.
    pub fn run(&mut self, source: &str) -> Result<(), LoxError> {
        let statements = self.compile(source)?;

        self.interpreter.interpret(&statements).map_err(|e| {
            self.error_reporter.runtime_error(&e);
            LoxError::Runtime(e)
        })
    }

    /// Scan `source` and report every scanner diagnostic.
    pub fn tokens(&mut self, source: &str) -> Result<Vec<Token>, LoxError> {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        for e in &errors {
            self.error_reporter.error(e.line, &e.message);
        }

        if errors.is_empty() {
            Ok(tokens)
        } else {
            Err(LoxError::Static { count: errors.len() })
        }
    }

    /// Scan and parse `source`, reporting every diagnostic from both stages.
    pub fn compile(&mut self, source: &str) -> Result<Vec<Stmt>, LoxError> {
        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        for e in &scan_errors {
            self.error_reporter.error(e.line, &e.message);
        }

        // Parse even after scan errors so that syntax errors get reported too.
        let result = Parser::new(tokens).parse();
        let parse_errors = match result {
            Ok(statements) if scan_errors.is_empty() => return Ok(statements),
            Ok(_) => 0,
            Err(errors) => {
                for e in &errors {
                    self.error_reporter.report(e.token.line, &e.token.location(), &e.message);
                }
                errors.len()
            }
        };

        Err(LoxError::Static { count: scan_errors.len() + parse_errors })
    }
}

/// Writes diagnostics in the `[line N] Error <where>: <message>` format.
pub struct ErrorReporter {
    sink: Box<dyn Write>,
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(Box::new(io::stderr()))
    }
}

impl ErrorReporter {
    pub fn new(sink: Box<dyn Write>) -> Self {
        Self { sink }
    }

    pub fn error(&mut self, line: usize, message: &str) {
        self.report(line, "", message);
    }

    pub fn report(&mut self, line: usize, location: &str, message: &str) {
        let written = if location.is_empty() {
            writeln!(self.sink, "[line {line}] Error: {message}")
        } else {
            writeln!(self.sink, "[line {line}] Error {location}: {message}")
        };

        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write diagnostic");
        }
    }

    pub fn runtime_error(&mut self, e: &RuntimeError) {
        if let Err(err) = writeln!(self.sink, "{e}") {
            tracing::warn!(error = %err, "failed to write runtime error");
        }
    }
}

/// An in-memory `Write` sink that can be cloned and read back, for capturing
/// program output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Shared<Vec<u8>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lox() -> (Lox, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        (Lox::with_sinks(Box::new(out.clone()), Box::new(err.clone())), out, err)
    }

    #[test]
    fn bindings_persist_between_runs() {
        let (mut lox, out, _) = lox();
        lox.run("var a = 40;").unwrap();
        lox.run("print a + 2;").unwrap();
        assert_eq!(out.contents(), "42\n");
    }

    #[test]
    fn same_input_twice_gives_same_output() {
        let (mut lox, out, _) = lox();
        lox.run("print 1 + 1;").unwrap();
        lox.run("print 1 + 1;").unwrap();
        assert_eq!(out.contents(), "2\n2\n");
    }

    #[test]
    fn syntax_errors_prevent_execution() {
        let (mut lox, out, err) = lox();
        let result = lox.run("print 1;\nvar = 2;\nprint (3;\n");

        assert!(matches!(result, Err(LoxError::Static { count: 2 })));
        assert_eq!(out.contents(), "");
        assert_eq!(
            err.contents(),
            "[line 2] Error at '=': Expect variable name.\n\
             [line 3] Error at ';': Expect ')' after expression.\n"
        );
    }

    #[test]
    fn scan_errors_prevent_execution() {
        let (mut lox, out, err) = lox();
        let result = lox.run("print 1; @");

        assert!(matches!(result, Err(LoxError::Static { count: 1 })));
        assert_eq!(out.contents(), "");
        assert_eq!(err.contents(), "[line 1] Error: Unexpected character.\n");
    }

    #[test]
    fn runtime_error_is_reported_and_globals_survive() {
        let (mut lox, out, err) = lox();
        let result = lox.run("var a = 1;\nprint a;\nprint -\"a\";\nprint 2;");

        assert_eq!(result.as_ref().map_err(LoxError::exit_code), Err(exit_code::SOFTWARE));
        assert_eq!(out.contents(), "1\n");
        assert_eq!(err.contents(), "[line 3] Operand must be a number.\n");

        lox.run("print a;").unwrap();
        assert_eq!(out.contents(), "1\n1\n");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let (mut lox, _, _) = lox();
        let result = lox.run_file("does/not/exist.lox");
        assert!(matches!(result, Err(LoxError::Io(_))));
    }
}
