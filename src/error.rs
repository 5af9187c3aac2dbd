// ABOUTME: Error types and the diagnostic sink shared by the scanner, parser, and interpreter

use crate::token::{Token, TokenKind};
use thiserror::Error;

/// Raised during evaluation; carries the offending token for line reporting.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        RuntimeError {
            token: token.clone(),
            message: message.into(),
        }
    }
}

/// Marker raised by the parser on an unexpected token. The message itself is
/// reported to the `Diagnostics` sink at the point of failure; this type only
/// signals to `synchronize` that recovery is needed.
#[derive(Error, Debug, Clone)]
#[error("parse error")]
pub struct ParseError;

/// Accumulates "had a syntax/runtime error" state and formats diagnostics.
///
/// Replaces the process-wide `had_error`/`had_runtime_error` statics of the
/// original source with a value the driver owns and can reset between REPL
/// prompts.
#[derive(Debug, Default)]
pub struct Diagnostics {
    pub had_error: bool,
    pub had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Clears the syntax-error flag; called between REPL prompts so a
    /// mistyped line doesn't end the session.
    pub fn reset(&mut self) {
        self.had_error = false;
    }

    /// Scanner-level error: no offending token, just a line number.
    pub fn error(&mut self, line: usize, message: &str) {
        self.report(line, "", message);
    }

    /// Parser-level error: reported against a specific token.
    pub fn error_at(&mut self, token: &Token, message: &str) {
        if token.kind == TokenKind::EndOfFile {
            self.report(token.line, " at end", message);
        } else {
            self.report(token.line, &format!(" at '{}'", token.lexeme), message);
        }
    }

    fn report(&mut self, line: usize, location: &str, message: &str) {
        eprintln!("[line {}] Error{}: {}", line, location, message);
        self.had_error = true;
    }

    /// Reports an uncaught `RuntimeError` and sets the runtime-error flag.
    pub fn runtime_error(&mut self, err: &RuntimeError) {
        eprintln!("{}\n[line {}]", err.message, err.token.line);
        self.had_runtime_error = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_syntax_error_only() {
        let mut d = Diagnostics::new();
        d.error(1, "bad token");
        d.had_runtime_error = true;
        d.reset();
        assert!(!d.had_error);
        assert!(d.had_runtime_error);
    }

    #[test]
    fn test_error_at_eof_reports_at_end() {
        let mut d = Diagnostics::new();
        let eof = Token::new(TokenKind::EndOfFile, "", None, 3);
        d.error_at(&eof, "Expected expression.");
        assert!(d.had_error);
    }
}
