//! # SQL Front End Module
//!
//! Lexing, parsing, and constant folding for the supported SQL dialect.
//!
//! ## Module Structure
//!
//! - `token`: keyword, punctuation, and lexeme definitions
//! - `source`: character sources and error sinks at the crate boundary
//! - `lexer`: pull-based tokenizer with integer mode for type arguments
//! - `ast`: statement trees and the expression arena
//! - `parser`: recursive descent statements, precedence-climbing
//!   expressions
//! - `fold`: in-place constant evaluation over the arena
//!
//! ## Pipeline
//!
//! ```text
//! CharSource ──> Lexer ──> Parser ──> Statement + ExprArena ──> fold
//!                  │          │                                   │
//!                  └──────────┴── ErrorSink (diagnostics) ────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use quern::sql::{parse_str, fold_statement, FoldMode};
//!
//! let mut parsed = parse_str("SELECT price * 2 FROM items WHERE 1 + 2 < 4")?;
//! fold_statement(&parsed.statement, &mut parsed.arena, FoldMode::PreResolution)?;
//! ```

pub mod ast;
pub mod fold;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod token;

pub use ast::*;
pub use fold::{
    fold_constants, fold_statement, fold_with, BytewiseComparator, FoldMode, FoldValue,
    NameResolver, StringComparator,
};
pub use lexer::Lexer;
pub use parser::{parse_str, ParsedStatement, Parser};
pub use source::{CharSource, CollectedErrors, DiscardErrors, ErrorSink, StrSource};
pub use token::{BindVar, Keyword, Lexeme, LexemeKind, Token};
