//! # Configuration Module
//!
//! Centralizes all numeric limits for the SQL front end. Constants are
//! grouped by functional area and interdependencies are documented and
//! enforced through compile-time assertions.
//!
//! ## Why Centralization?
//!
//! The decimal engine, the lexer's literal parsing, and the parser's
//! expression arena all depend on the same capacity figures. Keeping them
//! in one place (with `const` assertions) prevents the mismatch bug where
//! one module is widened and another keeps the old bound.
//!
//! ## Module Organization
//!
//! - [`constants`]: all numeric configuration values with dependency
//!   documentation

pub mod constants;
pub use constants::*;
