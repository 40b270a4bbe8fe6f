//! # Decimal Arithmetic Engine
//!
//! Fixed-capacity signed fixed-point numbers used for SQL numeric
//! literals and constant folding. A value is a sign, up to
//! [`DECIMAL_WORDS`] base-10000 digit words, and a word exponent:
//!
//! ```text
//! value = sign · (Σ words[i] · 10000^i) · 10000^exp
//! ```
//!
//! Words are little-endian (`words[0]` least significant) and every word
//! is `< 10_000`. `len` counts significant words; `len == 0` is zero,
//! which is always positive. Values are kept canonical: no leading zero
//! word inside `len`, and trailing zero words are folded into the
//! exponent, so `1.50` and `1.5` have one representation.
//!
//! ## Arithmetic
//!
//! - `add`/`sub`: word-exponent alignment, magnitude add with carry or
//!   magnitude subtract ordered by a magnitude compare. A carry past the
//!   top word, or an aligned span that cannot fit the capacity, is
//!   [`Error::NumericOverflow`].
//! - `mul`: schoolbook word products into a double-width `u64`
//!   accumulator with carry propagation; sign is the XOR of signs.
//! - `div`: the dividend mantissa is extended by [`DIV_EXTRA_WORDS`]
//!   words below its own scale, a fixed 20-decimal-digit budget the
//!   quotient is floored at (never rounded and never adaptive). One-word
//!   divisors take the short-division path; multi-word divisors run
//!   Knuth's Algorithm D with normalization, a two-word quotient
//!   estimate refined at most twice, and an add-back correction step.
//! - `cmp`: sign first, then aligned magnitude compare from the most
//!   significant word down.
//!
//! No operation allocates; all working buffers are fixed arrays sized
//! from [`config::constants`](crate::config::constants).

use crate::config::{
    DECIMAL_EXP_MAX, DECIMAL_EXP_MIN, DECIMAL_MAX_DIGITS, DECIMAL_WORDS, DIV_EXTRA_WORDS,
    WORD_BASE, WORD_DIGITS,
};
use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const BASE: u64 = WORD_BASE as u64;

/// Working width for add/sub alignment buffers. Two operands at most
/// `DECIMAL_WORDS` wide can overlap anywhere inside this span and still
/// trim back into capacity; anything wider is overflow up front.
const SPAN_WORDS: usize = 2 * DECIMAL_WORDS;

/// Dividend width inside `div`: mantissa plus the fixed fraction budget.
const DIV_WORDS: usize = DECIMAL_WORDS + DIV_EXTRA_WORDS;

/// A fixed-capacity signed decimal number.
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    sign: i8,
    words: [u32; DECIMAL_WORDS],
    len: usize,
    exp: i32,
}

impl Decimal {
    /// The zero value (positive sign, empty mantissa).
    pub fn zero() -> Self {
        Decimal {
            sign: 1,
            words: [0; DECIMAL_WORDS],
            len: 0,
            exp: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.len == 0
    }

    pub fn is_negative(&self) -> bool {
        self.sign < 0
    }

    /// Flips the sign. Zero stays positive.
    pub fn neg(&self) -> Self {
        if self.is_zero() {
            *self
        } else {
            Decimal {
                sign: -self.sign,
                ..*self
            }
        }
    }

    pub fn from_i64(v: i64) -> Self {
        let sign: i8 = if v < 0 { -1 } else { 1 };
        let mut mag = v.unsigned_abs();
        let mut words = [0u32; DECIMAL_WORDS];
        let mut len = 0;
        while mag > 0 {
            words[len] = (mag % BASE) as u32;
            mag /= BASE;
            len += 1;
        }
        let mut d = Decimal {
            sign,
            words,
            len,
            exp: 0,
        };
        d.canonicalize();
        d
    }

    /// Builds a positive decimal from a run of ASCII digits scaled by
    /// `10^scale10`. More significant digits than the mantissa holds, or
    /// an exponent outside the band, is [`Error::NumericOverflow`].
    pub fn from_literal(digits: &str, scale10: i32) -> Result<Self> {
        debug_assert!(digits.bytes().all(|b| b.is_ascii_digit()));

        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            return Ok(Decimal::zero());
        }
        let tail_zeros = trimmed.len() - trimmed.trim_end_matches('0').len();
        let mantissa = &trimmed[..trimmed.len() - tail_zeros];
        let mut scale10 = scale10
            .checked_add(tail_zeros as i32)
            .ok_or(Error::NumericOverflow)?;

        // Pad so the decimal scale lands on a word boundary.
        let pad = scale10.rem_euclid(WORD_DIGITS as i32) as usize;
        scale10 -= pad as i32;
        let total_digits = mantissa.len() + pad;
        if total_digits as u32 > DECIMAL_MAX_DIGITS {
            return Err(Error::NumericOverflow);
        }
        let exp = scale10 / WORD_DIGITS as i32;
        if !(DECIMAL_EXP_MIN..=DECIMAL_EXP_MAX).contains(&exp) {
            return Err(Error::NumericOverflow);
        }

        // Group digits into base-10000 words from the least significant
        // end; `pad` virtual zeros sit below the mantissa text.
        let mut words = [0u32; DECIMAL_WORDS];
        let bytes = mantissa.as_bytes();
        for (pos, &b) in bytes.iter().rev().enumerate() {
            let digit_index = pos + pad;
            let word = digit_index / WORD_DIGITS as usize;
            let offset = digit_index % WORD_DIGITS as usize;
            words[word] += (b - b'0') as u32 * 10u32.pow(offset as u32);
        }
        let len = (total_digits + WORD_DIGITS as usize - 1) / WORD_DIGITS as usize;

        let mut d = Decimal {
            sign: 1,
            words,
            len,
            exp,
        };
        d.canonicalize();
        Ok(d)
    }

    /// Number of significant decimal digits in the mantissa.
    pub fn significant_digits(&self) -> u32 {
        if self.len == 0 {
            return 0;
        }
        let top = self.words[self.len - 1];
        let top_digits = if top >= 1000 {
            4
        } else if top >= 100 {
            3
        } else if top >= 10 {
            2
        } else {
            1
        };
        (self.len as u32 - 1) * WORD_DIGITS + top_digits
    }

    /// Restores canonical form: significant length trimmed from the top,
    /// trailing zero words folded into the exponent, zero forced
    /// positive with a zero exponent.
    fn canonicalize(&mut self) {
        while self.len > 0 && self.words[self.len - 1] == 0 {
            self.len -= 1;
        }
        if self.len == 0 {
            self.sign = 1;
            self.exp = 0;
            self.words = [0; DECIMAL_WORDS];
            return;
        }
        let mut drop = 0;
        while drop < self.len && self.words[drop] == 0 {
            drop += 1;
        }
        if drop > 0 {
            self.words.copy_within(drop..self.len, 0);
            for w in &mut self.words[self.len - drop..self.len] {
                *w = 0;
            }
            self.len -= drop;
            self.exp += drop as i32;
        }
    }

    /// Word at absolute position `pos` (in units of `10000^pos`).
    fn word_at(&self, pos: i32) -> u32 {
        let rel = pos - self.exp;
        if rel < 0 || rel as usize >= self.len {
            0
        } else {
            self.words[rel as usize]
        }
    }

    /// Magnitude comparison ignoring sign.
    fn cmp_abs(&self, other: &Decimal) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        let hi_a = self.exp + self.len as i32;
        let hi_b = other.exp + other.len as i32;
        if hi_a != hi_b {
            return hi_a.cmp(&hi_b);
        }
        let lo = self.exp.min(other.exp);
        let mut pos = hi_a - 1;
        while pos >= lo {
            let wa = self.word_at(pos);
            let wb = other.word_at(pos);
            if wa != wb {
                return wa.cmp(&wb);
            }
            pos -= 1;
        }
        Ordering::Equal
    }

    /// Three-way comparison: sign first, then sign-adjusted magnitude.
    pub fn cmp(&self, other: &Decimal) -> Ordering {
        if self.sign != other.sign {
            return self.sign.cmp(&other.sign);
        }
        let mag = self.cmp_abs(other);
        if self.sign < 0 {
            mag.reverse()
        } else {
            mag
        }
    }

    /// Addition. Same signs add magnitudes; differing signs subtract the
    /// smaller magnitude from the larger, the result taking the larger
    /// magnitude's sign (exact cancellation yields positive zero).
    pub fn add(&self, other: &Decimal) -> Result<Decimal> {
        if self.is_zero() {
            return Ok(*other);
        }
        if other.is_zero() {
            return Ok(*self);
        }
        if self.sign == other.sign {
            return Self::mag_add(self, other, self.sign);
        }
        match self.cmp_abs(other) {
            Ordering::Equal => Ok(Decimal::zero()),
            Ordering::Greater => Self::mag_sub(self, other, self.sign),
            Ordering::Less => Self::mag_sub(other, self, other.sign),
        }
    }

    /// Subtraction, implemented as addition with the second operand's
    /// sign inverted.
    pub fn sub(&self, other: &Decimal) -> Result<Decimal> {
        self.add(&other.neg())
    }

    /// `|a| + |b|` with the given result sign. Both operands non-zero.
    fn mag_add(a: &Decimal, b: &Decimal, sign: i8) -> Result<Decimal> {
        let lo = a.exp.min(b.exp);
        let hi = (a.exp + a.len as i32).max(b.exp + b.len as i32);
        let span = (hi - lo) as usize;
        if span > SPAN_WORDS {
            return Err(Error::NumericOverflow);
        }

        let mut buf = [0u32; SPAN_WORDS + 1];
        let mut carry = 0u32;
        for i in 0..span {
            let pos = lo + i as i32;
            let sum = a.word_at(pos) + b.word_at(pos) + carry;
            buf[i] = sum % WORD_BASE;
            carry = sum / WORD_BASE;
        }
        buf[span] = carry;

        Self::from_buffer(&buf, span + 1, lo, sign)
    }

    /// `|a| - |b|` with the given result sign. Requires `|a| > |b|`.
    fn mag_sub(a: &Decimal, b: &Decimal, sign: i8) -> Result<Decimal> {
        let lo = a.exp.min(b.exp);
        let hi = (a.exp + a.len as i32).max(b.exp + b.len as i32);
        let span = (hi - lo) as usize;
        if span > SPAN_WORDS {
            return Err(Error::NumericOverflow);
        }

        let mut buf = [0u32; SPAN_WORDS + 1];
        let mut borrow = 0i32;
        for i in 0..span {
            let pos = lo + i as i32;
            let diff = a.word_at(pos) as i32 - b.word_at(pos) as i32 - borrow;
            if diff < 0 {
                buf[i] = (diff + WORD_BASE as i32) as u32;
                borrow = 1;
            } else {
                buf[i] = diff as u32;
                borrow = 0;
            }
        }
        debug_assert_eq!(borrow, 0);

        Self::from_buffer(&buf, span, lo, sign)
    }

    /// Multiplication: schoolbook word products accumulated double-width,
    /// then one carry-propagation pass. Sign is the XOR of signs.
    pub fn mul(&self, other: &Decimal) -> Result<Decimal> {
        if self.is_zero() || other.is_zero() {
            return Ok(Decimal::zero());
        }
        let mut acc = [0u64; 2 * DECIMAL_WORDS];
        for i in 0..self.len {
            for j in 0..other.len {
                acc[i + j] += self.words[i] as u64 * other.words[j] as u64;
            }
        }
        let mut buf = [0u32; 2 * DECIMAL_WORDS + 1];
        let mut carry = 0u64;
        for (i, &a) in acc.iter().enumerate() {
            let v = a + carry;
            buf[i] = (v % BASE) as u32;
            carry = v / BASE;
        }
        if carry != 0 {
            return Err(Error::NumericOverflow);
        }

        let exp = self
            .exp
            .checked_add(other.exp)
            .ok_or(Error::NumericOverflow)?;
        let sign = self.sign * other.sign;
        Self::from_buffer(&buf, 2 * DECIMAL_WORDS, exp, sign)
    }

    /// Division with the fixed fractional budget. A zero divisor is
    /// [`Error::DivisionByZero`]; a zero dividend short-circuits to zero
    /// without consulting the divisor further.
    pub fn div(&self, other: &Decimal) -> Result<Decimal> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Decimal::zero());
        }

        let k = DIV_EXTRA_WORDS;
        let m = self.len + k;
        let n = other.len;
        let exp = self.exp - other.exp - k as i32;
        let sign = self.sign * other.sign;

        if m < n {
            // The budgeted quotient has no significant word; it floors
            // to zero.
            return Ok(Decimal::zero());
        }

        let mut q = [0u32; DIV_WORDS + 1];
        if n == 1 {
            let v = other.words[0] as u64;
            let mut rem = 0u64;
            for i in (0..m).rev() {
                let uw = if i >= k { self.words[i - k] as u64 } else { 0 };
                let cur = rem * BASE + uw;
                q[i] = (cur / v) as u32;
                rem = cur % v;
            }
        } else {
            Self::divide_knuth(self, other, k, m, n, &mut q);
        }

        let mut buf = [0u32; 2 * DECIMAL_WORDS + 1];
        let qlen = m - n + 1;
        buf[..qlen].copy_from_slice(&q[..qlen]);
        Self::from_buffer(&buf, qlen, exp, sign)
    }

    /// Knuth Algorithm D over base-10000 words: normalize so the top
    /// divisor word is at least half the base, estimate each quotient
    /// word from the top two dividend words over the top divisor word,
    /// refine with the second divisor word (at most two decrements),
    /// multiply-and-subtract, and add the divisor back when the working
    /// remainder goes negative.
    fn divide_knuth(a: &Decimal, b: &Decimal, k: usize, m: usize, n: usize, q: &mut [u32]) {
        let mut u = [0u32; DIV_WORDS + 1];
        for i in 0..a.len {
            u[i + k] = a.words[i];
        }
        let mut v = [0u32; DECIMAL_WORDS];
        v[..n].copy_from_slice(&b.words[..n]);

        let d = BASE / (v[n - 1] as u64 + 1);
        if d > 1 {
            let mut carry = 0u64;
            for w in u.iter_mut().take(m + 1) {
                let t = *w as u64 * d + carry;
                *w = (t % BASE) as u32;
                carry = t / BASE;
            }
            debug_assert_eq!(carry, 0);
            let mut carry = 0u64;
            for w in v.iter_mut().take(n) {
                let t = *w as u64 * d + carry;
                *w = (t % BASE) as u32;
                carry = t / BASE;
            }
            debug_assert_eq!(carry, 0);
        }

        let vtop = v[n - 1] as u64;
        let vsecond = v[n - 2] as u64;

        for j in (0..=m - n).rev() {
            let top = u[j + n] as u64 * BASE + u[j + n - 1] as u64;
            let mut qhat = top / vtop;
            let mut rhat = top % vtop;
            loop {
                if qhat >= BASE || qhat * vsecond > rhat * BASE + u[j + n - 2] as u64 {
                    qhat -= 1;
                    rhat += vtop;
                    if rhat < BASE {
                        continue;
                    }
                }
                break;
            }

            // u[j..=j+n] -= qhat * v
            let mut carry = 0u64;
            let mut borrow = 0i64;
            for i in 0..n {
                let p = qhat * v[i] as u64 + carry;
                carry = p / BASE;
                let t = u[j + i] as i64 - (p % BASE) as i64 + borrow;
                if t < 0 {
                    u[j + i] = (t + BASE as i64) as u32;
                    borrow = -1;
                } else {
                    u[j + i] = t as u32;
                    borrow = 0;
                }
            }
            let t = u[j + n] as i64 - carry as i64 + borrow;
            if t < 0 {
                u[j + n] = (t + BASE as i64) as u32;
                borrow = -1;
            } else {
                u[j + n] = t as u32;
                borrow = 0;
            }

            if borrow != 0 {
                // Estimate was one too high: add the divisor back and
                // let the final carry cancel the borrow.
                qhat -= 1;
                let mut carry = 0u64;
                for i in 0..n {
                    let s = u[j + i] as u64 + v[i] as u64 + carry;
                    u[j + i] = (s % BASE) as u32;
                    carry = s / BASE;
                }
                u[j + n] = ((u[j + n] as u64 + carry) % BASE) as u32;
            }

            q[j] = qhat as u32;
        }
    }

    /// Builds a canonical decimal from a little-endian word buffer at
    /// word position `lo`, enforcing capacity and the exponent band.
    fn from_buffer(buf: &[u32], mut len: usize, lo: i32, sign: i8) -> Result<Decimal> {
        while len > 0 && buf[len - 1] == 0 {
            len -= 1;
        }
        if len == 0 {
            return Ok(Decimal::zero());
        }
        let mut start = 0;
        while buf[start] == 0 {
            start += 1;
        }
        let words_used = len - start;
        if words_used > DECIMAL_WORDS {
            return Err(Error::NumericOverflow);
        }
        let exp = lo + start as i32;
        if !(DECIMAL_EXP_MIN..=DECIMAL_EXP_MAX).contains(&exp) {
            return Err(Error::NumericOverflow);
        }
        let mut words = [0u32; DECIMAL_WORDS];
        words[..words_used].copy_from_slice(&buf[start..len]);
        Ok(Decimal {
            sign,
            words,
            len: words_used,
            exp,
        })
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        Decimal::cmp(self, other)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.sign < 0 {
            f.write_str("-")?;
        }

        let mut digits = String::with_capacity(self.len * WORD_DIGITS as usize);
        digits.push_str(&self.words[self.len - 1].to_string());
        for i in (0..self.len - 1).rev() {
            digits.push_str(&format!("{:04}", self.words[i]));
        }

        let shift = self.exp * WORD_DIGITS as i32;
        if shift >= 0 {
            f.write_str(&digits)?;
            for _ in 0..shift {
                f.write_str("0")?;
            }
            return Ok(());
        }

        let frac_len = (-shift) as usize;
        if digits.len() > frac_len {
            let split = digits.len() - frac_len;
            let frac = digits[split..].trim_end_matches('0');
            f.write_str(&digits[..split])?;
            if !frac.is_empty() {
                f.write_str(".")?;
                f.write_str(frac)?;
            }
        } else {
            let frac = digits.trim_end_matches('0');
            f.write_str("0.")?;
            for _ in 0..frac_len - digits.len() {
                f.write_str("0")?;
            }
            f.write_str(frac)?;
        }
        Ok(())
    }
}

impl FromStr for Decimal {
    type Err = Error;

    /// Parses `[+|-]digits[.digits][e|E[+|-]digits]`. Used by tests and
    /// callers supplying defaults; SQL literal text reaches
    /// [`Decimal::from_literal`] through the lexer instead.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidLiteral {
            message: format!("not a decimal literal: {s:?}"),
            line: 0,
            column: 0,
        };

        let mut rest = s;
        let mut sign = 1i8;
        if let Some(r) = rest.strip_prefix('-') {
            sign = -1;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('+') {
            rest = r;
        }

        let (mantissa, exp_part) = match rest.find(['e', 'E']) {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };
        let (int_part, frac_part) = match mantissa.find('.') {
            Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let exp10: i32 = match exp_part {
            Some(e) if !e.is_empty() => e.parse().map_err(|_| invalid())?,
            Some(_) => return Err(invalid()),
            None => 0,
        };

        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);
        let scale = exp10 - frac_part.len() as i32;
        let d = Decimal::from_literal(&digits, scale)?;
        Ok(if sign < 0 { d.neg() } else { d })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_display_round_trip() {
        for (input, expected) in [
            ("0", "0"),
            ("1", "1"),
            ("-1", "-1"),
            ("1.5", "1.5"),
            ("0.25", "0.25"),
            ("1.234", "1.234"),
            ("12345678901234567890", "12345678901234567890"),
            ("1e8", "100000000"),
            ("1.5e-3", "0.0015"),
            ("-42.000", "-42"),
            ("0.0001", "0.0001"),
        ] {
            assert_eq!(dec(input).to_string(), expected, "input {input:?}");
        }
    }

    #[test]
    fn trailing_zeros_are_canonical() {
        assert_eq!(dec("1.50"), dec("1.5"));
        assert_eq!(dec("100"), dec("1e2"));
        assert_eq!(dec("0.000"), Decimal::zero());
    }

    #[test]
    fn literal_wider_than_mantissa_overflows() {
        // 41 significant digits.
        let wide = "1".repeat(41);
        assert_eq!(
            Decimal::from_literal(&wide, 0),
            Err(Error::NumericOverflow)
        );
    }

    #[test]
    fn exponent_band_is_enforced() {
        assert!("1e255".parse::<Decimal>().is_ok());
        assert_eq!("1e300".parse::<Decimal>(), Err(Error::NumericOverflow));
        assert_eq!("1e-300".parse::<Decimal>(), Err(Error::NumericOverflow));
    }

    #[test]
    fn add_basics() {
        assert_eq!(dec("1").add(&dec("2")).unwrap(), dec("3"));
        assert_eq!(dec("9999").add(&dec("1")).unwrap(), dec("10000"));
        assert_eq!(dec("0.5").add(&dec("0.5")).unwrap(), dec("1"));
        assert_eq!(dec("1.25").add(&dec("0.75")).unwrap(), dec("2"));
        assert_eq!(dec("-1").add(&dec("3")).unwrap(), dec("2"));
        assert_eq!(dec("-3").add(&dec("1")).unwrap(), dec("-2"));
    }

    #[test]
    fn opposite_add_cancels_to_positive_zero() {
        let z = dec("-1").add(&dec("1")).unwrap();
        assert!(z.is_zero());
        assert!(!z.is_negative());
        assert_eq!(z.to_string(), "0");
    }

    #[test]
    fn add_of_far_apart_magnitudes_overflows() {
        // 1e200 + 1 would need 201 significant digits.
        assert_eq!(dec("1e200").add(&dec("1")), Err(Error::NumericOverflow));
    }

    #[test]
    fn add_of_two_maximal_values_overflows() {
        let max = "9".repeat(40).parse::<Decimal>().unwrap();
        assert_eq!(max.add(&max), Err(Error::NumericOverflow));
        assert_eq!(max.neg().add(&max.neg()), Err(Error::NumericOverflow));
    }

    #[test]
    fn add_round_trip_through_sub() {
        let fixtures = [
            "0", "1", "-1", "0.5", "123.456", "-42", "9999", "10000", "0.0001",
            "12345678.87654321",
        ];
        for a in fixtures {
            for b in fixtures {
                let a = dec(a);
                let b = dec(b);
                let sum = a.add(&b).unwrap();
                assert_eq!(sum.sub(&b).unwrap(), a, "({a}) + ({b}) - ({b})");
            }
        }
    }

    #[test]
    fn add_and_mul_commute() {
        let fixtures = ["1.5", "-2", "0.0001", "9999", "123456789"];
        for a in fixtures {
            for b in fixtures {
                let a = dec(a);
                let b = dec(b);
                assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
                assert_eq!(a.mul(&b).unwrap(), b.mul(&a).unwrap());
            }
        }
    }

    #[test]
    fn mul_basics() {
        assert_eq!(dec("25").mul(&dec("4")).unwrap(), dec("100"));
        assert_eq!(dec("0.5").mul(&dec("0.5")).unwrap(), dec("0.25"));
        assert_eq!(dec("-2").mul(&dec("3")).unwrap(), dec("-6"));
        assert_eq!(dec("-2").mul(&dec("-3")).unwrap(), dec("6"));
        assert!(dec("1234").mul(&Decimal::zero()).unwrap().is_zero());
    }

    #[test]
    fn mul_fills_capacity_exactly() {
        // (10^20 - 1)^2 has exactly 40 digits.
        let x = "9".repeat(20).parse::<Decimal>().unwrap();
        let sq = x.mul(&x).unwrap();
        assert_eq!(
            sq.to_string(),
            "9999999999999999999800000000000000000001"
        );
    }

    #[test]
    fn mul_past_capacity_overflows() {
        let max = "9".repeat(40).parse::<Decimal>().unwrap();
        assert_eq!(max.mul(&dec("2")), Err(Error::NumericOverflow));
    }

    #[test]
    fn div_by_zero_is_reported() {
        assert_eq!(dec("1").div(&Decimal::zero()), Err(Error::DivisionByZero));
    }

    #[test]
    fn div_of_zero_short_circuits() {
        let q = Decimal::zero().div(&dec("5")).unwrap();
        assert!(q.is_zero());
        assert!(!q.is_negative());
    }

    #[test]
    fn div_single_word_divisor() {
        assert_eq!(dec("10").div(&dec("4")).unwrap(), dec("2.5"));
        assert_eq!(dec("7").div(&dec("2")).unwrap(), dec("3.5"));
        assert_eq!(dec("-10").div(&dec("4")).unwrap(), dec("-2.5"));
        assert_eq!(dec("10").div(&dec("-4")).unwrap(), dec("-2.5"));
    }

    #[test]
    fn div_fraction_budget_is_fixed() {
        // The dividend gains exactly DIV_EXTRA_WORDS * 4 = 20 fractional
        // digits and the quotient floors there.
        assert_eq!(
            dec("1").div(&dec("3")).unwrap().to_string(),
            "0.33333333333333333333"
        );
        assert_eq!(
            dec("2").div(&dec("3")).unwrap().to_string(),
            "0.66666666666666666666"
        );
        assert_eq!(
            dec("100000000").div(&dec("3")).unwrap().to_string(),
            "33333333.333333333333"
        );
    }

    #[test]
    fn div_multi_word_divisor_exact() {
        // 10001 spans two words; 10001 * 9999 = 99999999.
        assert_eq!(dec("99999999").div(&dec("10001")).unwrap(), dec("9999"));
        // 111111^2 = 12345654321.
        assert_eq!(
            dec("12345654321").div(&dec("111111")).unwrap(),
            dec("111111")
        );
    }

    #[test]
    fn div_multi_word_with_remainder() {
        // 100000000 / 10001 = 9999.000099990000999900009999...
        // The dividend mantissa (1 word at word exponent 2) gains five
        // fraction words below its own scale, so the quotient floors
        // twelve decimal digits after the point.
        assert_eq!(
            dec("100000000").div(&dec("10001")).unwrap().to_string(),
            "9999.00009999"
        );
    }

    #[test]
    fn cmp_orders_signs_and_magnitudes() {
        assert_eq!(dec("1").cmp(&dec("2")), Ordering::Less);
        assert_eq!(dec("2").cmp(&dec("1")), Ordering::Greater);
        assert_eq!(dec("-1").cmp(&dec("1")), Ordering::Less);
        assert_eq!(dec("-1").cmp(&dec("-2")), Ordering::Greater);
        assert_eq!(Decimal::zero().cmp(&dec("-5")), Ordering::Greater);
        assert_eq!(Decimal::zero().cmp(&dec("5")), Ordering::Less);
        assert_eq!(dec("1.5").cmp(&dec("1.50")), Ordering::Equal);
        assert_eq!(dec("10000").cmp(&dec("9999")), Ordering::Greater);
    }

    #[test]
    fn significant_digit_count_tracks_top_word() {
        assert_eq!(Decimal::zero().significant_digits(), 0);
        assert_eq!(dec("7").significant_digits(), 1);
        assert_eq!(dec("9999").significant_digits(), 4);
        assert_eq!(dec("10000").significant_digits(), 1); // 1 * 10000^1
        assert_eq!(dec("12345").significant_digits(), 5);
    }

    #[test]
    fn from_i64_round_trips() {
        for v in [0i64, 1, -1, 9999, 10000, i64::MAX, i64::MIN] {
            assert_eq!(Decimal::from_i64(v).to_string(), v.to_string());
        }
    }
}
