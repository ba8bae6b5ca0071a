//! Structured errors
//!
//! Every failure in tokenizing, parsing or evaluating is a value with a
//! machine-readable code, a human-readable message and, where useful, a
//! suggestion. Callers match on `code`; the REPL prints `Display`.

use crate::MathError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const EMPTY_EXPRESSION: &str = "EMPTY_EXPRESSION";
    pub const UNEXPECTED_EOF: &str = "UNEXPECTED_EOF";
    pub const EXPECTED_CLOSING_PAREN: &str = "EXPECTED_CLOSING_PAREN";
    pub const UNEXPECTED_CLOSING_PAREN: &str = "UNEXPECTED_CLOSING_PAREN";
    pub const UNEXPECTED_TOKEN: &str = "UNEXPECTED_TOKEN";
    pub const TRAILING_INPUT: &str = "TRAILING_INPUT";
    pub const INVALID_NUMBER: &str = "INVALID_NUMBER";
    pub const UNKNOWN_FUNCTION: &str = "UNKNOWN_FUNCTION";
    pub const UNDEFINED_VAR: &str = "UNDEFINED_VAR";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const INVALID_ASSIGNMENT: &str = "INVALID_ASSIGNMENT";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Input could not be parsed
    Syntax,
    /// Input parsed but could not be evaluated
    Runtime,
}

/// Where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Expression text that caused the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured error returned by every fallible operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReckonError {
    /// Machine-readable error code, one of [`codes`]
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    pub severity: Severity,
}

impl ReckonError {
    /// Create a new runtime error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
            severity: Severity::Runtime,
        }
    }

    /// Create a new syntax error
    pub fn syntax(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message).with_severity(Severity::Syntax)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach the offending expression text. The first attachment wins.
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        if ctx.expression.is_none() {
            ctx.expression = Some(expression.into());
        }
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    /// Check the error code
    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    // ========== Syntax Error Constructors ==========

    pub fn empty_expression() -> Self {
        Self::syntax(codes::EMPTY_EXPRESSION, "Empty expression")
            .with_suggestion("Enter a number, variable or function call")
    }

    pub fn unexpected_eof() -> Self {
        Self::syntax(codes::UNEXPECTED_EOF, "Unexpected end of input")
            .with_suggestion("An operator must be followed by an operand")
    }

    pub fn expected_closing_paren(found: Option<&str>) -> Self {
        let message = match found {
            Some(token) => format!("Expected ')', found '{}'", token),
            None => "Expected ')', found end of input".to_string(),
        };
        Self::syntax(codes::EXPECTED_CLOSING_PAREN, message)
            .with_suggestion("Check that every '(' has a matching ')'")
    }

    pub fn unexpected_closing_paren() -> Self {
        Self::syntax(codes::UNEXPECTED_CLOSING_PAREN, "Unexpected ')'")
            .with_suggestion("Check that every ')' has a matching '('")
    }

    pub fn unexpected_token(token: &str) -> Self {
        Self::syntax(codes::UNEXPECTED_TOKEN, format!("Unexpected token: {}", token))
            .with_suggestion("Expected a number, variable, function call or '('")
    }

    pub fn trailing_input(token: &str) -> Self {
        Self::syntax(
            codes::TRAILING_INPUT,
            format!("Unexpected token after expression: {}", token),
        )
        .with_suggestion("Join operands with an operator")
    }

    pub fn invalid_number(text: &str) -> Self {
        Self::syntax(codes::INVALID_NUMBER, format!("Invalid number: {}", text))
    }

    pub fn unknown_function(name: &str) -> Self {
        Self::syntax(codes::UNKNOWN_FUNCTION, format!("Unknown function: {}", name))
            .with_suggestion("Use 'help' to list available functions")
    }

    // ========== Runtime Error Constructors ==========

    pub fn undefined_var(name: &str) -> Self {
        Self::new(codes::UNDEFINED_VAR, format!("Undefined variable: {}", name))
            .with_suggestion(format!("Define '{}' with 'let {} = ...' or check spelling", name, name))
    }

    pub fn div_zero() -> Self {
        Self::new(codes::DIV_ZERO, "Division by zero")
            .with_suggestion("Ensure divisor is not zero")
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(codes::DOMAIN_ERROR, format!("Domain error: {}", details.into()))
    }

    pub fn invalid_assignment(target: &str) -> Self {
        Self::new(
            codes::INVALID_ASSIGNMENT,
            format!("Cannot assign to '{}'", target),
        )
        .with_suggestion("Use 'let <name> = <expression>' with a plain identifier")
    }
}

impl std::fmt::Display for ReckonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ReckonError {}

impl From<MathError> for ReckonError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::DivisionByZero => Self::div_zero(),
            MathError::DomainError(s) => Self::domain_error(s),
        }
    }
}
