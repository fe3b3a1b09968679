use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use treelox::prelude::AstPrinter;
use treelox::{exit_code, Lox, LoxError};

/// Run a Lox script, or start an interactive prompt when no script is given.
#[derive(Debug, Parser)]
#[command(name = "treelox", version)]
struct Args {
    /// Script to run.
    script: Option<PathBuf>,

    /// Print the scanned tokens instead of running the script.
    #[arg(long, conflicts_with = "ast", requires = "script")]
    tokens: bool,

    /// Print the parsed program instead of running the script.
    #[arg(long, requires = "script")]
    ast: bool,
}

fn main() -> ExitCode {
    init_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            if let Err(err) = e.print() {
                tracing::warn!(error = %err, "failed to print usage");
            }
            return ExitCode::from(exit_code::USAGE as u8);
        }
        Err(e) => {
            // --help and --version
            if let Err(err) = e.print() {
                tracing::warn!(error = %err, "failed to print usage");
            }
            return ExitCode::SUCCESS;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let lox_error = e.downcast_ref::<LoxError>();
            // Static and runtime diagnostics were already reported by the driver.
            if !matches!(lox_error, Some(LoxError::Static { .. } | LoxError::Runtime(_))) {
                eprintln!("{e:#}");
            }
            ExitCode::from(lox_error.map_or(exit_code::IO_ERR, LoxError::exit_code) as u8)
        }
    }
}

fn run(args: Args) -> Result<(), anyhow::Error> {
    let mut lox = Lox::new();

    let Some(script) = args.script else {
        return lox.run_prompt().context("prompt failed");
    };

    if args.tokens || args.ast {
        let source = std::fs::read_to_string(&script)
            .map_err(LoxError::from)
            .with_context(|| format!("failed to read {}", script.display()))?;
        return dump(&mut lox, &source, args.ast);
    }

    tracing::debug!(script = %script.display(), "running script");
    match lox.run_file(&script) {
        Err(e @ LoxError::Io(_)) => {
            Err(anyhow::Error::new(e).context(format!("failed to read {}", script.display())))
        }
        other => other.map_err(anyhow::Error::new),
    }
}

fn dump(lox: &mut Lox, source: &str, ast: bool) -> Result<(), anyhow::Error> {
    if ast {
        for stmt in lox.compile(source)? {
            println!("{}", AstPrinter::stmt_to_string(&stmt));
        }
    } else {
        for token in lox.tokens(source)? {
            println!("{token}");
        }
    }

    Ok(())
}

/// Logs go to stderr, and only when `RUST_LOG` is set.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
