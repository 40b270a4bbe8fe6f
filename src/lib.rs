//! # Quern - SQL Front End with Exact Decimal Arithmetic
//!
//! Quern is the SQL front end of an embedded relational engine: a
//! lexer, a statement parser, and a constant-folding evaluator, built
//! on an arbitrary-precision decimal engine so numeric literals are
//! never rounded through floating point.
//!
//! ## Quick Start
//!
//! ```ignore
//! use quern::sql::{parse_str, fold_statement, FoldMode};
//!
//! let mut parsed = parse_str("SELECT * FROM orders WHERE price * qty > 10 / 4")?;
//! fold_statement(&parsed.statement, &mut parsed.arena, FoldMode::PreResolution)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   Statements (Statement + ExprArena)    │
//! ├─────────────────────────────────────────┤
//! │  Parser (recursive descent + climbing)  │
//! ├─────────────────────────────────────────┤
//! │   Lexer (pull-based, CharSource)        │
//! ├────────────────────┬────────────────────┤
//! │  Decimal engine    │  Error reporting   │
//! │  (base-10000)      │  (ErrorSink)       │
//! └────────────────────┴────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`]: capacity constants with compile-time invariants
//! - [`decimal`]: fixed-capacity signed decimals, Knuth long division
//! - [`error`]: the crate-wide error enum and machine-readable codes
//! - [`sql`]: lexer, parser, AST, constant folding
//!
//! ## Threading
//!
//! Nothing here owns shared state: a parser, its arena, and the decimal
//! values are all plain owned data, so statements can be parsed and
//! folded concurrently by giving each thread its own parser.

pub mod config;
pub mod decimal;
pub mod error;
pub mod sql;

pub use decimal::Decimal;
pub use error::{Error, ErrorCode, Result};
pub use sql::{parse_str, FoldMode, ParsedStatement, Statement};
