//! # Configuration Constants
//!
//! All numeric limits of the SQL front end, grouped by area. Constants
//! that depend on each other are co-located and the relationships are
//! enforced with compile-time assertions.
//!
//! ## Dependency Graph
//!
//! ```text
//! WORD_BASE (10_000)
//!       │
//!       ├─> WORD_DIGITS (4): decimal digits carried per word
//!       │
//!       └─> every stored word must be < WORD_BASE
//!
//! DECIMAL_WORDS (10)
//!       │
//!       ├─> DECIMAL_MAX_DIGITS (derived: DECIMAL_WORDS * WORD_DIGITS)
//!       │
//!       └─> DIV_EXTRA_WORDS (5): dividend extension per division.
//!           Working buffers in div() hold DECIMAL_WORDS + DIV_EXTRA_WORDS
//!           + 1 words; widening either constant widens those buffers.
//!
//! DECIMAL_EXP_MIN / DECIMAL_EXP_MAX (−64 / 63, word units)
//!       │
//!       └─> any arithmetic result outside this band is NumericOverflow
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `DECIMAL_MAX_DIGITS == DECIMAL_WORDS * WORD_DIGITS`
//! 2. `WORD_BASE == 10^WORD_DIGITS`
//! 3. `DECIMAL_EXP_MIN < 0 < DECIMAL_EXP_MAX`

/// Numeric base of one decimal digit word. Four decimal digits per word.
pub const WORD_BASE: u32 = 10_000;

/// Decimal digits carried by one word.
pub const WORD_DIGITS: u32 = 4;

/// Fixed mantissa capacity of a [`Decimal`](crate::decimal::Decimal) in
/// base-10000 words.
pub const DECIMAL_WORDS: usize = 10;

/// Maximum significant decimal digits a mantissa can carry.
pub const DECIMAL_MAX_DIGITS: u32 = DECIMAL_WORDS as u32 * WORD_DIGITS;

/// Lower bound of the word exponent band (inclusive).
pub const DECIMAL_EXP_MIN: i32 = -64;

/// Upper bound of the word exponent band (inclusive).
pub const DECIMAL_EXP_MAX: i32 = 63;

/// Extra fractional words appended to every division result. This is a
/// fixed precision policy: each quotient gains `DIV_EXTRA_WORDS *
/// WORD_DIGITS` (20) fractional decimal digits and is floored there.
pub const DIV_EXTRA_WORDS: usize = 5;

/// Hard cap on expression nodes per statement arena. Allocation past this
/// bound reports `OutOfMemory` instead of growing without limit.
pub const MAX_EXPR_NODES: usize = 1 << 20;

/// Number of binary/unary operator precedence levels in the expression
/// grammar (1 = tightest `* /` … 7 = loosest `OR`).
pub const OPERATOR_LEVELS: usize = 7;

const _: () = assert!(DECIMAL_MAX_DIGITS == DECIMAL_WORDS as u32 * WORD_DIGITS);
const _: () = assert!(WORD_BASE == 10u32.pow(WORD_DIGITS));
const _: () = assert!(DECIMAL_EXP_MIN < 0 && DECIMAL_EXP_MAX > 0);
const _: () = assert!(DIV_EXTRA_WORDS > 0);
