//! Reckon REPL
//!
//! Reads one line at a time from stdin until `exit` or EOF. Results go to
//! stdout, logs to stderr.

mod config;
mod session;

use clap::Parser;
use config::{Args, Config};
use session::{Outcome, Session};
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr log subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let config = match Config::from_env(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    tracing::info!(output = ?config.output, interactive, "reckon started");

    let prompt = config.prompt.as_deref().filter(|_| interactive);
    let mut session = Session::new(config.output);
    if let Err(e) = run(&mut session, stdin.lock(), io::stdout().lock(), prompt) {
        tracing::error!(error = %e, "i/o failure");
        return ExitCode::FAILURE;
    }

    tracing::debug!(
        variables = session.context().local_variables().len(),
        "session ended"
    );
    ExitCode::SUCCESS
}

/// Feed `input` to `session` line by line until EOF or `exit`.
///
/// A failed prompt write is logged and skipped. Read, output and flush
/// failures end the loop.
fn run(
    session: &mut Session,
    mut input: impl BufRead,
    mut output: impl Write,
    prompt: Option<&str>,
) -> io::Result<()> {
    loop {
        if let Some(prompt) = prompt {
            if let Err(e) = write!(output, "{}", prompt).and_then(|_| output.flush()) {
                tracing::warn!(error = %e, "failed to write prompt");
            }
        }

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            tracing::debug!("end of input");
            break;
        }

        match session.handle_line(&line) {
            Outcome::Continue(Some(text)) => writeln!(output, "{}", text)?,
            Outcome::Continue(None) => {}
            Outcome::Exit => break,
        }
    }

    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::OutputFormat;
    use std::io::Cursor;

    /// Rejects every write, accepts flushes
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run_text(input: &str, prompt: Option<&str>) -> String {
        let mut session = Session::new(OutputFormat::Text);
        let mut out = Vec::new();
        run(&mut session, Cursor::new(input), &mut out, prompt).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_run_until_exit() {
        let out = run_text("let x = 2\n\nx * 3\nexit\n1 + 1\n", None);
        assert_eq!(out, "x = 2\n(x * 3) = 6\n");
    }

    #[test]
    fn test_run_until_eof_without_newline() {
        assert_eq!(run_text("2 * 4", None), "(2 * 4) = 8\n");
    }

    #[test]
    fn test_run_writes_prompt() {
        assert_eq!(run_text("1 + 1\n", Some("> ")), "> (1 + 1) = 2\n> ");
    }

    #[test]
    fn test_prompt_failure_is_not_fatal() {
        let mut session = Session::new(OutputFormat::Text);
        let result = run(&mut session, Cursor::new("let y = 1\n"), ClosedPipe, Some("> "));
        // The prompt failure is skipped; the result line is what fails
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(session.context().get_variable("y"), Some(1.0));

        let mut session = Session::new(OutputFormat::Text);
        assert!(run(&mut session, Cursor::new(""), ClosedPipe, Some("> ")).is_ok());
    }
}
