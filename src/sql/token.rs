//! # Lexeme Definitions
//!
//! The vocabulary shared by the lexer and parser: keywords, punctuation
//! tokens, bind variables, and the [`Lexeme`] envelope that carries the
//! classified unit together with the line/column where it started.
//!
//! Keyword text is matched case-sensitively against the upper-case
//! spellings; `select` is an ordinary identifier while `SELECT` is a
//! keyword. Numeric literals arrive already converted: a
//! [`Decimal`](crate::decimal::Decimal) in expression context, a checked
//! `i64` when the lexer is in integer mode for type arguments.

use crate::decimal::Decimal;
use std::fmt;

/// Reserved words recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Action,
    Add,
    All,
    Alter,
    And,
    As,
    Asc,
    Between,
    Bigint,
    Boolean,
    By,
    Cascade,
    Char,
    Check,
    Column,
    Constraint,
    Create,
    Cross,
    Database,
    Date,
    Decimal,
    Default,
    Delete,
    Desc,
    Distinct,
    Double,
    Drop,
    Except,
    Exists,
    False,
    First,
    Float,
    Foreign,
    From,
    Full,
    Group,
    Having,
    If,
    Inner,
    Insert,
    Int,
    Integer,
    Intersect,
    Into,
    Is,
    Join,
    Key,
    Last,
    Left,
    Modify,
    No,
    Not,
    Null,
    Nulls,
    Numeric,
    On,
    Or,
    Order,
    Outer,
    Precision,
    Primary,
    References,
    Rename,
    Restrict,
    Right,
    Select,
    Set,
    Smallint,
    Table,
    Text,
    Time,
    Timestamp,
    To,
    True,
    Union,
    Unique,
    Update,
    Values,
    Varchar,
    Where,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Keyword::Action => "ACTION",
            Keyword::Add => "ADD",
            Keyword::All => "ALL",
            Keyword::Alter => "ALTER",
            Keyword::And => "AND",
            Keyword::As => "AS",
            Keyword::Asc => "ASC",
            Keyword::Between => "BETWEEN",
            Keyword::Bigint => "BIGINT",
            Keyword::Boolean => "BOOLEAN",
            Keyword::By => "BY",
            Keyword::Cascade => "CASCADE",
            Keyword::Char => "CHAR",
            Keyword::Check => "CHECK",
            Keyword::Column => "COLUMN",
            Keyword::Constraint => "CONSTRAINT",
            Keyword::Create => "CREATE",
            Keyword::Cross => "CROSS",
            Keyword::Database => "DATABASE",
            Keyword::Date => "DATE",
            Keyword::Decimal => "DECIMAL",
            Keyword::Default => "DEFAULT",
            Keyword::Delete => "DELETE",
            Keyword::Desc => "DESC",
            Keyword::Distinct => "DISTINCT",
            Keyword::Double => "DOUBLE",
            Keyword::Drop => "DROP",
            Keyword::Except => "EXCEPT",
            Keyword::Exists => "EXISTS",
            Keyword::False => "FALSE",
            Keyword::First => "FIRST",
            Keyword::Float => "FLOAT",
            Keyword::Foreign => "FOREIGN",
            Keyword::From => "FROM",
            Keyword::Full => "FULL",
            Keyword::Group => "GROUP",
            Keyword::Having => "HAVING",
            Keyword::If => "IF",
            Keyword::Inner => "INNER",
            Keyword::Insert => "INSERT",
            Keyword::Int => "INT",
            Keyword::Integer => "INTEGER",
            Keyword::Intersect => "INTERSECT",
            Keyword::Into => "INTO",
            Keyword::Is => "IS",
            Keyword::Join => "JOIN",
            Keyword::Key => "KEY",
            Keyword::Last => "LAST",
            Keyword::Left => "LEFT",
            Keyword::Modify => "MODIFY",
            Keyword::No => "NO",
            Keyword::Not => "NOT",
            Keyword::Null => "NULL",
            Keyword::Nulls => "NULLS",
            Keyword::Numeric => "NUMERIC",
            Keyword::On => "ON",
            Keyword::Or => "OR",
            Keyword::Order => "ORDER",
            Keyword::Outer => "OUTER",
            Keyword::Precision => "PRECISION",
            Keyword::Primary => "PRIMARY",
            Keyword::References => "REFERENCES",
            Keyword::Rename => "RENAME",
            Keyword::Restrict => "RESTRICT",
            Keyword::Right => "RIGHT",
            Keyword::Select => "SELECT",
            Keyword::Set => "SET",
            Keyword::Smallint => "SMALLINT",
            Keyword::Table => "TABLE",
            Keyword::Text => "TEXT",
            Keyword::Time => "TIME",
            Keyword::Timestamp => "TIMESTAMP",
            Keyword::To => "TO",
            Keyword::True => "TRUE",
            Keyword::Union => "UNION",
            Keyword::Unique => "UNIQUE",
            Keyword::Update => "UPDATE",
            Keyword::Values => "VALUES",
            Keyword::Varchar => "VARCHAR",
            Keyword::Where => "WHERE",
        };
        f.write_str(text)
    }
}

/// Punctuation and operator tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,
    Star,
    Plus,
    Minus,
    Slash,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Dot => ".",
            Token::Star => "*",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Slash => "/",
            Token::Eq => "=",
            Token::Ne => "<>",
            Token::Lt => "<",
            Token::Le => "<=",
            Token::Gt => ">",
            Token::Ge => ">=",
        };
        f.write_str(text)
    }
}

/// A bind variable placeholder. Anonymous binds (`?`) are numbered in
/// order of appearance, starting at 1; named binds (`:name`) keep their
/// spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindVar {
    Anonymous(u32),
    Named(String),
}

impl fmt::Display for BindVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindVar::Anonymous(n) => write!(f, "?{n}"),
            BindVar::Named(name) => write!(f, ":{name}"),
        }
    }
}

/// The classified content of one lexeme.
#[derive(Debug, Clone, PartialEq)]
pub enum LexemeKind {
    Keyword(Keyword),
    Ident(String),
    Str(String),
    Number(Decimal),
    /// Produced only in integer mode (type arguments).
    Integer(i64),
    Bind(BindVar),
    Token(Token),
    Eof,
}

impl fmt::Display for LexemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexemeKind::Keyword(k) => write!(f, "{k}"),
            LexemeKind::Ident(s) => write!(f, "{s}"),
            LexemeKind::Str(_) => f.write_str("string literal"),
            LexemeKind::Number(_) => f.write_str("numeric literal"),
            LexemeKind::Integer(_) => f.write_str("integer literal"),
            LexemeKind::Bind(b) => write!(f, "{b}"),
            LexemeKind::Token(t) => write!(f, "{t}"),
            LexemeKind::Eof => f.write_str("end of input"),
        }
    }
}

/// One lexeme with the line/column of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub line: u32,
    pub column: u32,
}

impl Lexeme {
    pub fn eof() -> Self {
        Lexeme {
            kind: LexemeKind::Eof,
            line: 1,
            column: 1,
        }
    }
}
