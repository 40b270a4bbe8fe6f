//! # SQL Lexer
//!
//! A pull-based tokenizer: each call to [`Lexer::next_lexeme`] consumes
//! characters from a [`CharSource`] and yields one classified
//! [`Lexeme`] with the line/column of its first character. Keywords are
//! matched with a compile-time perfect hash map (phf), case-sensitively
//! against the upper-case spellings.
//!
//! ## Classification Order
//!
//! 1. Whitespace and comments are skipped: `--` to end of line,
//!    `/* ... */` with nesting.
//! 2. `'...'` string literals; a doubled quote (`''`) is a literal
//!    quote. Running off the end of input is an unterminated-literal
//!    error positioned at the opening quote.
//! 3. Numeric literals: digits, an optional fraction, an optional
//!    signed exponent. The digits are converted to a
//!    [`Decimal`](crate::decimal::Decimal) immediately; a literal that
//!    does not fit is an error, never silently truncated. In integer
//!    mode (used for type arguments like `DECIMAL(10, 2)`) only plain
//!    digits are consumed and the value is a checked `i64`.
//! 4. Identifiers and keywords: ASCII letters, `_`, digits after the
//!    first character, plus any non-ASCII character.
//! 5. Bind variables: `?` (numbered in order of appearance) and
//!    `:name`.
//! 6. Punctuation, with one character of lookahead for `<=`, `<>`
//!    and `>=`.
//!
//! Every error is reported to the caller's [`ErrorSink`] with its
//! formatted message before it propagates.

use super::source::{CharSource, ErrorSink};
use super::token::{BindVar, Keyword, Lexeme, LexemeKind, Token};
use crate::decimal::Decimal;
use crate::error::{Error, Result};
use phf::phf_map;

static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "ACTION" => Keyword::Action,
    "ADD" => Keyword::Add,
    "ALL" => Keyword::All,
    "ALTER" => Keyword::Alter,
    "AND" => Keyword::And,
    "AS" => Keyword::As,
    "ASC" => Keyword::Asc,
    "BETWEEN" => Keyword::Between,
    "BIGINT" => Keyword::Bigint,
    "BOOLEAN" => Keyword::Boolean,
    "BY" => Keyword::By,
    "CASCADE" => Keyword::Cascade,
    "CHAR" => Keyword::Char,
    "CHECK" => Keyword::Check,
    "COLUMN" => Keyword::Column,
    "CONSTRAINT" => Keyword::Constraint,
    "CREATE" => Keyword::Create,
    "CROSS" => Keyword::Cross,
    "DATABASE" => Keyword::Database,
    "DATE" => Keyword::Date,
    "DECIMAL" => Keyword::Decimal,
    "DEFAULT" => Keyword::Default,
    "DELETE" => Keyword::Delete,
    "DESC" => Keyword::Desc,
    "DISTINCT" => Keyword::Distinct,
    "DOUBLE" => Keyword::Double,
    "DROP" => Keyword::Drop,
    "EXCEPT" => Keyword::Except,
    "EXISTS" => Keyword::Exists,
    "FALSE" => Keyword::False,
    "FIRST" => Keyword::First,
    "FLOAT" => Keyword::Float,
    "FOREIGN" => Keyword::Foreign,
    "FROM" => Keyword::From,
    "FULL" => Keyword::Full,
    "GROUP" => Keyword::Group,
    "HAVING" => Keyword::Having,
    "IF" => Keyword::If,
    "INNER" => Keyword::Inner,
    "INSERT" => Keyword::Insert,
    "INT" => Keyword::Int,
    "INTEGER" => Keyword::Integer,
    "INTERSECT" => Keyword::Intersect,
    "INTO" => Keyword::Into,
    "IS" => Keyword::Is,
    "JOIN" => Keyword::Join,
    "KEY" => Keyword::Key,
    "LAST" => Keyword::Last,
    "LEFT" => Keyword::Left,
    "MODIFY" => Keyword::Modify,
    "NO" => Keyword::No,
    "NOT" => Keyword::Not,
    "NULL" => Keyword::Null,
    "NULLS" => Keyword::Nulls,
    "NUMERIC" => Keyword::Numeric,
    "ON" => Keyword::On,
    "OR" => Keyword::Or,
    "ORDER" => Keyword::Order,
    "OUTER" => Keyword::Outer,
    "PRECISION" => Keyword::Precision,
    "PRIMARY" => Keyword::Primary,
    "REFERENCES" => Keyword::References,
    "RENAME" => Keyword::Rename,
    "RESTRICT" => Keyword::Restrict,
    "RIGHT" => Keyword::Right,
    "SELECT" => Keyword::Select,
    "SET" => Keyword::Set,
    "SMALLINT" => Keyword::Smallint,
    "TABLE" => Keyword::Table,
    "TEXT" => Keyword::Text,
    "TIME" => Keyword::Time,
    "TIMESTAMP" => Keyword::Timestamp,
    "TO" => Keyword::To,
    "TRUE" => Keyword::True,
    "UNION" => Keyword::Union,
    "UNIQUE" => Keyword::Unique,
    "UPDATE" => Keyword::Update,
    "VALUES" => Keyword::Values,
    "VARCHAR" => Keyword::Varchar,
    "WHERE" => Keyword::Where,
};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

pub struct Lexer<'s, S: CharSource> {
    source: S,
    sink: &'s mut dyn ErrorSink,
    current: Option<char>,
    peek: Option<char>,
    line: u32,
    column: u32,
    integer_mode: bool,
    next_anon_bind: u32,
}

impl<'s, S: CharSource> Lexer<'s, S> {
    pub fn new(mut source: S, sink: &'s mut dyn ErrorSink) -> Self {
        let current = source.next_char();
        let peek = source.next_char();
        Self {
            source,
            sink,
            current,
            peek,
            line: 1,
            column: 1,
            integer_mode: false,
            next_anon_bind: 0,
        }
    }

    /// In integer mode numeric literals are bare digit runs lexed as
    /// checked `i64` values; `.` and exponent markers are left alone.
    /// The parser flips this on around type arguments.
    pub fn set_integer_mode(&mut self, on: bool) {
        self.integer_mode = on;
    }

    /// Reports an error through the sink and hands it back, so call
    /// sites can `return Err(self.emit(err))`.
    pub(crate) fn emit(&mut self, err: Error) -> Error {
        self.sink.report(err.code(), &err.to_string());
        err
    }

    fn bump(&mut self) {
        if let Some(c) = self.current {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.current = self.peek;
        self.peek = self.source.next_char();
    }

    pub fn next_lexeme(&mut self) -> Result<Lexeme> {
        self.skip_trivia()?;
        let (line, column) = (self.line, self.column);

        let c = match self.current {
            None => {
                return Ok(Lexeme {
                    kind: LexemeKind::Eof,
                    line,
                    column,
                })
            }
            Some(c) => c,
        };

        let kind = if c.is_ascii_digit() {
            self.scan_number(line, column)?
        } else if is_ident_start(c) {
            self.scan_identifier()
        } else {
            match c {
                '\'' => self.scan_string(line, column)?,
                '?' => {
                    self.bump();
                    self.next_anon_bind += 1;
                    LexemeKind::Bind(BindVar::Anonymous(self.next_anon_bind))
                }
                ':' => self.scan_named_bind(line, column)?,
                _ => self.scan_punctuation(c, line, column)?,
            }
        };

        Ok(Lexeme { kind, line, column })
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.current {
                Some(c) if c.is_whitespace() => self.bump(),
                Some('-') if self.peek == Some('-') => {
                    while let Some(c) = self.current {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.peek == Some('*') => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let (line, column) = (self.line, self.column);
        self.bump();
        self.bump();
        let mut depth = 1u32;
        loop {
            match self.current {
                None => {
                    return Err(self.emit(Error::Syntax {
                        message: "unterminated block comment".into(),
                        line,
                        column,
                    }))
                }
                Some('/') if self.peek == Some('*') => {
                    depth += 1;
                    self.bump();
                    self.bump();
                }
                Some('*') if self.peek == Some('/') => {
                    depth -= 1;
                    self.bump();
                    self.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(_) => self.bump(),
            }
        }
    }

    fn scan_identifier(&mut self) -> LexemeKind {
        let mut text = String::new();
        while let Some(c) = self.current {
            if !is_ident_continue(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        match KEYWORDS.get(text.as_str()) {
            Some(&kw) => LexemeKind::Keyword(kw),
            None => LexemeKind::Ident(text),
        }
    }

    fn scan_string(&mut self, line: u32, column: u32) -> Result<LexemeKind> {
        self.bump(); // opening quote
        let mut text = String::new();
        loop {
            match self.current {
                None => return Err(self.emit(Error::UnterminatedLiteral { line, column })),
                Some('\'') => {
                    if self.peek == Some('\'') {
                        text.push('\'');
                        self.bump();
                        self.bump();
                    } else {
                        self.bump();
                        return Ok(LexemeKind::Str(text));
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
    }

    fn scan_number(&mut self, line: u32, column: u32) -> Result<LexemeKind> {
        if self.integer_mode {
            return self.scan_integer(line, column);
        }

        let mut digits = String::new();
        while let Some(c) = self.current {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.bump();
        }

        let mut frac_len = 0i32;
        if self.current == Some('.') && self.peek.is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            while let Some(c) = self.current {
                if !c.is_ascii_digit() {
                    break;
                }
                digits.push(c);
                frac_len += 1;
                self.bump();
            }
        }

        let mut exp10 = 0i64;
        if matches!(self.current, Some('e') | Some('E')) {
            let exponent_follows = match self.peek {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => true,
                _ => false,
            };
            if exponent_follows {
                self.bump();
                let negative = match self.current {
                    Some('-') => {
                        self.bump();
                        true
                    }
                    Some('+') => {
                        self.bump();
                        false
                    }
                    _ => false,
                };
                if !self.current.is_some_and(|c| c.is_ascii_digit()) {
                    return Err(self.emit(Error::InvalidLiteral {
                        message: "exponent has no digits".into(),
                        line,
                        column,
                    }));
                }
                while let Some(c) = self.current {
                    let Some(d) = c.to_digit(10) else { break };
                    exp10 = exp10.saturating_mul(10).saturating_add(d as i64);
                    self.bump();
                }
                if negative {
                    exp10 = -exp10;
                }
            }
        }

        let scale = exp10.clamp(i32::MIN as i64, i32::MAX as i64) as i32 - frac_len;
        match Decimal::from_literal(&digits, scale) {
            Ok(d) => Ok(LexemeKind::Number(d)),
            Err(_) => Err(self.emit(Error::InvalidLiteral {
                message: "numeric literal out of range".into(),
                line,
                column,
            })),
        }
    }

    fn scan_integer(&mut self, line: u32, column: u32) -> Result<LexemeKind> {
        let mut value = 0i64;
        while let Some(c) = self.current {
            let Some(d) = c.to_digit(10) else { break };
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(d as i64))
                .ok_or_else(|| Error::InvalidLiteral {
                    message: "integer literal out of range".into(),
                    line,
                    column,
                })
                .map_err(|e| self.emit(e))?;
            self.bump();
        }
        Ok(LexemeKind::Integer(value))
    }

    fn scan_named_bind(&mut self, line: u32, column: u32) -> Result<LexemeKind> {
        self.bump(); // ':'
        if !self.current.is_some_and(is_ident_start) {
            return Err(self.emit(Error::Syntax {
                message: "expected bind variable name after ':'".into(),
                line,
                column,
            }));
        }
        let mut name = String::new();
        while let Some(c) = self.current {
            if !is_ident_continue(c) {
                break;
            }
            name.push(c);
            self.bump();
        }
        Ok(LexemeKind::Bind(BindVar::Named(name)))
    }

    fn scan_punctuation(&mut self, c: char, line: u32, column: u32) -> Result<LexemeKind> {
        let tok = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '.' => Token::Dot,
            '*' => Token::Star,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '/' => Token::Slash,
            '=' => Token::Eq,
            '<' => {
                self.bump();
                let tok = match self.current {
                    Some('=') => {
                        self.bump();
                        Token::Le
                    }
                    Some('>') => {
                        self.bump();
                        Token::Ne
                    }
                    _ => Token::Lt,
                };
                return Ok(LexemeKind::Token(tok));
            }
            '>' => {
                self.bump();
                if self.current == Some('=') {
                    self.bump();
                    return Ok(LexemeKind::Token(Token::Ge));
                }
                return Ok(LexemeKind::Token(Token::Gt));
            }
            other => {
                return Err(self.emit(Error::Syntax {
                    message: format!("unrecognized character {other:?}"),
                    line,
                    column,
                }))
            }
        };
        self.bump();
        Ok(LexemeKind::Token(tok))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::source::{DiscardErrors, StrSource};

    fn lex_all(input: &str) -> Vec<LexemeKind> {
        let mut sink = DiscardErrors;
        let mut lexer = Lexer::new(StrSource::new(input), &mut sink);
        let mut out = Vec::new();
        loop {
            let lexeme = lexer.next_lexeme().unwrap();
            if lexeme.kind == LexemeKind::Eof {
                return out;
            }
            out.push(lexeme.kind);
        }
    }

    fn lex_err(input: &str) -> Error {
        let mut sink = DiscardErrors;
        let mut lexer = Lexer::new(StrSource::new(input), &mut sink);
        loop {
            match lexer.next_lexeme() {
                Ok(l) if l.kind == LexemeKind::Eof => panic!("no error in {input:?}"),
                Ok(_) => continue,
                Err(e) => return e,
            }
        }
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            lex_all("SELECT select"),
            vec![
                LexemeKind::Keyword(Keyword::Select),
                LexemeKind::Ident("select".into()),
            ]
        );
    }

    #[test]
    fn identifiers_allow_underscore_and_non_ascii() {
        assert_eq!(
            lex_all("_tmp grüße"),
            vec![
                LexemeKind::Ident("_tmp".into()),
                LexemeKind::Ident("grüße".into()),
            ]
        );
    }

    #[test]
    fn string_doubles_quote_to_escape() {
        assert_eq!(
            lex_all("'it''s'"),
            vec![LexemeKind::Str("it's".into())]
        );
    }

    #[test]
    fn unterminated_string_points_at_opening_quote() {
        assert_eq!(
            lex_err("ab 'oops"),
            Error::UnterminatedLiteral { line: 1, column: 4 }
        );
    }

    #[test]
    fn numbers_with_fraction_and_exponent() {
        assert_eq!(
            lex_all("42 3.14 1e3 2.5e-2"),
            vec![
                LexemeKind::Number("42".parse().unwrap()),
                LexemeKind::Number("3.14".parse().unwrap()),
                LexemeKind::Number("1000".parse().unwrap()),
                LexemeKind::Number("0.025".parse().unwrap()),
            ]
        );
    }

    #[test]
    fn number_not_followed_by_digit_leaves_dot_alone() {
        assert_eq!(
            lex_all("1.x"),
            vec![
                LexemeKind::Number("1".parse().unwrap()),
                LexemeKind::Token(Token::Dot),
                LexemeKind::Ident("x".into()),
            ]
        );
    }

    #[test]
    fn exponent_sign_without_digits_is_invalid() {
        assert!(matches!(
            lex_err("1e+"),
            Error::InvalidLiteral { line: 1, column: 1, .. }
        ));
    }

    #[test]
    fn oversized_literal_is_an_error_not_truncated() {
        let wide = "9".repeat(41);
        assert!(matches!(lex_err(&wide), Error::InvalidLiteral { .. }));
    }

    #[test]
    fn integer_mode_reads_plain_i64() {
        let mut sink = DiscardErrors;
        let mut lexer = Lexer::new(StrSource::new("10 2"), &mut sink);
        lexer.set_integer_mode(true);
        assert_eq!(lexer.next_lexeme().unwrap().kind, LexemeKind::Integer(10));
        assert_eq!(lexer.next_lexeme().unwrap().kind, LexemeKind::Integer(2));
    }

    #[test]
    fn integer_mode_overflow_is_an_error() {
        let mut sink = DiscardErrors;
        let mut lexer = Lexer::new(StrSource::new("99999999999999999999"), &mut sink);
        lexer.set_integer_mode(true);
        assert!(matches!(
            lexer.next_lexeme(),
            Err(Error::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn binds_are_numbered_and_named() {
        assert_eq!(
            lex_all("? :name ?"),
            vec![
                LexemeKind::Bind(BindVar::Anonymous(1)),
                LexemeKind::Bind(BindVar::Named("name".into())),
                LexemeKind::Bind(BindVar::Anonymous(2)),
            ]
        );
    }

    #[test]
    fn comments_are_trivia() {
        assert_eq!(
            lex_all("a -- rest of line\n /* b /* nested */ still */ c"),
            vec![LexemeKind::Ident("a".into()), LexemeKind::Ident("c".into())]
        );
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        assert!(matches!(lex_err("a /* b"), Error::Syntax { .. }));
    }

    #[test]
    fn two_character_operators() {
        assert_eq!(
            lex_all("<= <> >= < >"),
            vec![
                LexemeKind::Token(Token::Le),
                LexemeKind::Token(Token::Ne),
                LexemeKind::Token(Token::Ge),
                LexemeKind::Token(Token::Lt),
                LexemeKind::Token(Token::Gt),
            ]
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let mut sink = DiscardErrors;
        let mut lexer = Lexer::new(StrSource::new("ab\n  cd"), &mut sink);
        let first = lexer.next_lexeme().unwrap();
        assert_eq!((first.line, first.column), (1, 1));
        let second = lexer.next_lexeme().unwrap();
        assert_eq!((second.line, second.column), (2, 3));
    }

    #[test]
    fn unrecognized_character_is_reported() {
        use crate::error::ErrorCode;
        use crate::sql::source::CollectedErrors;
        let mut sink = CollectedErrors::new();
        let mut lexer = Lexer::new(StrSource::new("@"), &mut sink);
        assert!(lexer.next_lexeme().is_err());
        assert_eq!(sink.reports().len(), 1);
        assert_eq!(sink.reports()[0].0, ErrorCode::Syntax);
    }
}
