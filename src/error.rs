//! # Error Types
//!
//! One error enum covers the whole front end. Each variant is a distinct
//! failure kind so callers can match on what went wrong (a fold that hit
//! division by zero is handled differently from a syntax error), and the
//! position-carrying variants keep the line/column of the offending token.
//!
//! Errors raised while lexing or parsing are also delivered through the
//! caller's [`ErrorSink`](crate::sql::source::ErrorSink) with a formatted
//! message before they propagate; the first error aborts the statement.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed statement text. Carries the position of the offending
    /// lexeme.
    #[error("syntax error at line {line} column {column}: {message}")]
    Syntax {
        message: String,
        line: u32,
        column: u32,
    },

    /// A decimal result exceeded mantissa capacity or left the exponent
    /// band, or a literal carried more significant digits than fit.
    #[error("numeric value out of range")]
    NumericOverflow,

    /// Division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// An operator was applied to operand types it does not accept.
    #[error("datatype mismatch: {0}")]
    DatatypeMismatch(String),

    /// The expression arena refused to grow past its node cap.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// A literal that started well-formed could not be completed
    /// (e.g. an exponent marker with no digits).
    #[error("invalid literal at line {line} column {column}: {message}")]
    InvalidLiteral {
        message: String,
        line: u32,
        column: u32,
    },

    /// A quoted literal ran off the end of the source. The position is
    /// the opening quote.
    #[error("unterminated literal starting at line {line} column {column}")]
    UnterminatedLiteral { line: u32, column: u32 },
}

/// Machine-readable error class delivered to an
/// [`ErrorSink`](crate::sql::source::ErrorSink) alongside the formatted
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Syntax,
    NumericOverflow,
    DivisionByZero,
    DatatypeMismatch,
    OutOfMemory,
    InvalidLiteral,
    UnterminatedLiteral,
}

impl Error {
    /// The [`ErrorCode`] matching this error's variant.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Syntax { .. } => ErrorCode::Syntax,
            Error::NumericOverflow => ErrorCode::NumericOverflow,
            Error::DivisionByZero => ErrorCode::DivisionByZero,
            Error::DatatypeMismatch(_) => ErrorCode::DatatypeMismatch,
            Error::OutOfMemory(_) => ErrorCode::OutOfMemory,
            Error::InvalidLiteral { .. } => ErrorCode::InvalidLiteral,
            Error::UnterminatedLiteral { .. } => ErrorCode::UnterminatedLiteral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_message_carries_position() {
        let err = Error::Syntax {
            message: "expected FROM".into(),
            line: 3,
            column: 17,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("line 3"));
        assert!(rendered.contains("column 17"));
        assert!(rendered.contains("expected FROM"));
    }

    #[test]
    fn code_matches_variant() {
        assert_eq!(Error::DivisionByZero.code(), ErrorCode::DivisionByZero);
        assert_eq!(Error::NumericOverflow.code(), ErrorCode::NumericOverflow);
        assert_eq!(
            Error::UnterminatedLiteral { line: 1, column: 8 }.code(),
            ErrorCode::UnterminatedLiteral
        );
    }
}
