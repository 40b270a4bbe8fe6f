//! # Character Sources and Error Sinks
//!
//! The lexer pulls characters one at a time through [`CharSource`], so
//! statement text can come from an in-memory string, a network buffer,
//! or anything else that yields `char`s, without the lexer knowing or
//! caring. [`StrSource`] is the everyday implementation over `&str`.
//!
//! Errors travel the other direction through [`ErrorSink`]: the lexer
//! and parser report each failure (with its formatted position) to the
//! caller's sink before propagating it, so an embedding application can
//! surface diagnostics its own way. [`CollectedErrors`] keeps them in a
//! `Vec` for inspection; [`DiscardErrors`] drops them when only the
//! returned `Result` matters.

use crate::error::ErrorCode;
use std::str::Chars;

/// A pull-based stream of characters. `None` means end of input and is
/// returned on every call thereafter.
pub trait CharSource {
    fn next_char(&mut self) -> Option<char>;
}

/// A [`CharSource`] over a borrowed string.
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(input: &'a str) -> Self {
        StrSource {
            chars: input.chars(),
        }
    }
}

impl CharSource for StrSource<'_> {
    fn next_char(&mut self) -> Option<char> {
        self.chars.next()
    }
}

/// Receives every lexer/parser diagnostic as it happens.
pub trait ErrorSink {
    fn report(&mut self, code: ErrorCode, message: &str);
}

/// An [`ErrorSink`] that keeps every report.
#[derive(Debug, Default)]
pub struct CollectedErrors {
    reports: Vec<(ErrorCode, String)>,
}

impl CollectedErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(ErrorCode, String)] {
        &self.reports
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl ErrorSink for CollectedErrors {
    fn report(&mut self, code: ErrorCode, message: &str) {
        self.reports.push((code, message.to_string()));
    }
}

/// An [`ErrorSink`] that ignores reports.
#[derive(Debug, Default)]
pub struct DiscardErrors;

impl ErrorSink for DiscardErrors {
    fn report(&mut self, _code: ErrorCode, _message: &str) {}
}
