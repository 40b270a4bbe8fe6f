//! # SQL Parser
//!
//! Recursive-descent statement parser over the pull [`Lexer`], one
//! lexeme of lookahead. Each `parse_*` method consumes exactly the
//! lexemes of its production and leaves `current` on the first lexeme
//! after it. Errors are `expected X, found Y` with the position of the
//! offending lexeme, reported through the caller's error sink before
//! they propagate; the first error aborts the statement.
//!
//! ## Expression Parsing
//!
//! Expressions are parsed with a precedence-climbing machine over the
//! seven operator levels (1 = `* /` tightest, 7 = `OR` loosest). The
//! machine keeps one slot per level holding the most recent operator
//! node attached at that level:
//!
//! - A new operator at level L attaches below the nearest registered
//!   operator above L by stealing that operator's operand-side child as
//!   its own left child; with no such operator it re-roots the whole
//!   expression. Registering clears every slot tighter than L, since
//!   those subtrees are now sealed inside the new node's left child.
//! - Equal levels re-root too, which yields left associativity.
//! - `NOT` is a prefix registered at level 5 from operand position; its
//!   single operand fills its `left` slot.
//! - Unary minus binds tightest of all: in operand position it builds a
//!   complete `0 - x` subtree and delivers it as an operand.
//! - `a BETWEEN lo AND hi` attaches at level 4 and desugars to
//!   `a >= lo AND copy(a) <= hi`; the bounds are parsed with the level
//!   cap at 3 so the separating `AND` is not swallowed, and the subject
//!   is deep-copied to keep every subtree single-parented.
//!
//! ## Integer Mode
//!
//! Type arguments (`DECIMAL(10, 2)`, `VARCHAR(40)`) are lexed in
//! integer mode, so the widths arrive as checked `i64` values rather
//! than decimals.

use super::ast::*;
use super::lexer::Lexer;
use super::source::{CharSource, DiscardErrors, ErrorSink, StrSource};
use super::token::{Keyword, Lexeme, LexemeKind, Token};
use crate::config::OPERATOR_LEVELS;
use crate::decimal::Decimal;
use crate::error::{Error, Result};

/// A parsed statement together with the arena holding its expressions.
#[derive(Debug)]
pub struct ParsedStatement {
    pub statement: Statement,
    pub arena: ExprArena,
}

/// Parses one statement from a string, discarding diagnostics.
pub fn parse_str(input: &str) -> Result<ParsedStatement> {
    let mut sink = DiscardErrors;
    Parser::new(StrSource::new(input), &mut sink).parse()
}

pub struct Parser<'s, S: CharSource> {
    lexer: Lexer<'s, S>,
    current: Lexeme,
    arena: ExprArena,
}

/// State of the expression machine: one slot per precedence level, the
/// root so far, and the operator whose operand slot is still empty.
#[derive(Default)]
struct ExprState {
    levels: [Option<ExprId>; OPERATOR_LEVELS + 1],
    top: Option<ExprId>,
    pending: Option<ExprId>,
}

/// What the operator position of the expression loop saw.
enum NextOp {
    Binary(Op),
    Between,
    End,
}

impl<'s, S: CharSource> Parser<'s, S> {
    pub fn new(source: S, sink: &'s mut dyn ErrorSink) -> Self {
        Self {
            lexer: Lexer::new(source, sink),
            current: Lexeme::eof(),
            arena: ExprArena::new(),
        }
    }

    pub fn parse(mut self) -> Result<ParsedStatement> {
        self.advance()?;
        log::debug!("parsing statement starting with {}", self.current.kind);

        let statement = match self.current.kind {
            LexemeKind::Keyword(Keyword::Select) => Statement::Select(self.parse_select()?),
            LexemeKind::Keyword(Keyword::Insert) => Statement::Insert(self.parse_insert()?),
            LexemeKind::Keyword(Keyword::Update) => Statement::Update(self.parse_update()?),
            LexemeKind::Keyword(Keyword::Delete) => Statement::Delete(self.parse_delete()?),
            LexemeKind::Keyword(Keyword::Create) => self.parse_create()?,
            LexemeKind::Keyword(Keyword::Drop) => self.parse_drop()?,
            LexemeKind::Keyword(Keyword::Alter) => Statement::AlterTable(self.parse_alter()?),
            _ => return Err(self.err_here("expected a statement")),
        };

        self.consume_tok(Token::Semicolon)?;
        if self.current.kind != LexemeKind::Eof {
            return Err(self.err_here("expected end of statement"));
        }
        Ok(ParsedStatement {
            statement,
            arena: self.arena,
        })
    }

    // ---- lexeme helpers ----

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_lexeme()?;
        Ok(())
    }

    fn err_here(&mut self, expected: &str) -> Error {
        let err = Error::Syntax {
            message: format!("{expected}, found {}", self.current.kind),
            line: self.current.line,
            column: self.current.column,
        };
        self.lexer.emit(err)
    }

    fn check_kw(&self, kw: Keyword) -> bool {
        self.current.kind == LexemeKind::Keyword(kw)
    }

    fn consume_kw(&mut self, kw: Keyword) -> Result<bool> {
        if self.check_kw(kw) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_kw(&mut self, kw: Keyword) -> Result<()> {
        if self.consume_kw(kw)? {
            Ok(())
        } else {
            Err(self.err_here(&format!("expected {kw}")))
        }
    }

    fn check_tok(&self, tok: Token) -> bool {
        self.current.kind == LexemeKind::Token(tok)
    }

    fn consume_tok(&mut self, tok: Token) -> Result<bool> {
        if self.check_tok(tok) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_tok(&mut self, tok: Token) -> Result<()> {
        if self.consume_tok(tok)? {
            Ok(())
        } else {
            Err(self.err_here(&format!("expected '{tok}'")))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        if let LexemeKind::Ident(name) = &self.current.kind {
            let name = name.clone();
            self.advance()?;
            Ok(name)
        } else {
            Err(self.err_here("expected an identifier"))
        }
    }

    fn expect_integer(&mut self) -> Result<i64> {
        if let LexemeKind::Integer(v) = self.current.kind {
            self.advance()?;
            Ok(v)
        } else {
            Err(self.err_here("expected an integer"))
        }
    }

    // ---- expressions ----

    fn parse_expr(&mut self) -> Result<ExprId> {
        self.parse_expr_max(OPERATOR_LEVELS as u8)
    }

    fn parse_expr_max(&mut self, max_level: u8) -> Result<ExprId> {
        let mut st = ExprState::default();
        loop {
            while self.check_kw(Keyword::Not) && max_level >= Op::Not.level() {
                self.advance()?;
                self.attach_prefix_not(&mut st)?;
            }
            let operand = self.parse_operand()?;
            self.deliver(&mut st, operand);

            // Operator position. BETWEEN completes in place (it parses
            // its own bounds), so it loops here instead of falling back
            // to operand position.
            let needs_operand = loop {
                let next = match &self.current.kind {
                    LexemeKind::Token(Token::Star) => NextOp::Binary(Op::Mul),
                    LexemeKind::Token(Token::Slash) => NextOp::Binary(Op::Div),
                    LexemeKind::Token(Token::Plus) => NextOp::Binary(Op::Add),
                    LexemeKind::Token(Token::Minus) => NextOp::Binary(Op::Sub),
                    LexemeKind::Token(Token::Eq) => NextOp::Binary(Op::Eq),
                    LexemeKind::Token(Token::Ne) => NextOp::Binary(Op::Ne),
                    LexemeKind::Token(Token::Lt) => NextOp::Binary(Op::Lt),
                    LexemeKind::Token(Token::Le) => NextOp::Binary(Op::Le),
                    LexemeKind::Token(Token::Gt) => NextOp::Binary(Op::Gt),
                    LexemeKind::Token(Token::Ge) => NextOp::Binary(Op::Ge),
                    LexemeKind::Keyword(Keyword::Is) => NextOp::Binary(Op::Is),
                    LexemeKind::Keyword(Keyword::And) => NextOp::Binary(Op::And),
                    LexemeKind::Keyword(Keyword::Or) => NextOp::Binary(Op::Or),
                    LexemeKind::Keyword(Keyword::Between) => NextOp::Between,
                    _ => NextOp::End,
                };
                match next {
                    NextOp::End => break false,
                    NextOp::Binary(mut op) => {
                        if op.level() > max_level {
                            break false;
                        }
                        self.advance()?;
                        if op == Op::Is && self.consume_kw(Keyword::Not)? {
                            op = Op::IsNot;
                        }
                        self.attach_binary(&mut st, op, op.level())?;
                        break true;
                    }
                    NextOp::Between => {
                        if Op::Is.level() > max_level {
                            break false;
                        }
                        self.advance()?;
                        self.parse_between(&mut st)?;
                    }
                }
            };
            if !needs_operand {
                break;
            }
        }

        debug_assert!(st.pending.is_none());
        match st.top {
            Some(root) => Ok(root),
            None => unreachable!("expression machine always roots an operand"),
        }
    }

    fn parse_operand(&mut self) -> Result<ExprId> {
        let kind = self.current.kind.clone();
        match kind {
            LexemeKind::Number(d) => {
                self.advance()?;
                self.arena.alloc(Expr::Number(d))
            }
            LexemeKind::Str(s) => {
                self.advance()?;
                self.arena.alloc(Expr::Str(s))
            }
            LexemeKind::Bind(b) => {
                self.advance()?;
                self.arena.alloc(Expr::Bind(b))
            }
            LexemeKind::Keyword(Keyword::Null) => {
                self.advance()?;
                self.arena.alloc(Expr::Null)
            }
            LexemeKind::Keyword(Keyword::True) => {
                self.advance()?;
                self.arena.alloc(Expr::Bool(true))
            }
            LexemeKind::Keyword(Keyword::False) => {
                self.advance()?;
                self.arena.alloc(Expr::Bool(false))
            }
            LexemeKind::Ident(name) => {
                self.advance()?;
                let name_ref = if self.consume_tok(Token::Dot)? {
                    NameRef {
                        name: self.expect_ident()?,
                        qualifier: Some(name),
                    }
                } else {
                    NameRef {
                        qualifier: None,
                        name,
                    }
                };
                self.arena.alloc(Expr::Name(name_ref))
            }
            LexemeKind::Token(Token::LParen) => {
                self.advance()?;
                let expr = self.parse_expr()?;
                self.expect_tok(Token::RParen)?;
                Ok(expr)
            }
            LexemeKind::Token(Token::Minus) => {
                // Unary minus: a complete `0 - x` subtree delivered as
                // one operand, so it binds tighter than every operator.
                self.advance()?;
                let zero = self.arena.alloc(Expr::Number(Decimal::zero()))?;
                let inner = self.parse_operand()?;
                self.arena.alloc(Expr::Operator {
                    op: Op::Sub,
                    left: zero,
                    right: Some(inner),
                })
            }
            _ => Err(self.err_here("expected an expression")),
        }
    }

    /// Fills a completed operand into the pending operator's empty
    /// slot, or makes it the root if nothing is pending.
    fn deliver(&mut self, st: &mut ExprState, operand: ExprId) {
        match st.pending.take() {
            Some(parent) => self.fill_operand(parent, operand),
            None => {
                debug_assert!(st.top.is_none());
                st.top = Some(operand);
            }
        }
    }

    /// Attaches a binary operator node at `level` and leaves it pending
    /// its right operand.
    fn attach_binary(&mut self, st: &mut ExprState, op: Op, level: u8) -> Result<ExprId> {
        debug_assert!(st.pending.is_none());
        let id = self.arena.alloc(Expr::Operator {
            op,
            left: ExprId::PLACEHOLDER,
            right: Some(ExprId::PLACEHOLDER),
        })?;

        let parent = (level + 1..=OPERATOR_LEVELS as u8)
            .find_map(|l| st.levels[l as usize]);
        let stolen = match parent {
            Some(p) => self.steal_operand(p, id),
            None => {
                let stolen = st.top.take().unwrap_or(ExprId::PLACEHOLDER);
                st.top = Some(id);
                stolen
            }
        };
        self.set_left(id, stolen);

        st.levels[level as usize] = Some(id);
        for slot in &mut st.levels[1..level as usize] {
            *slot = None;
        }
        st.pending = Some(id);
        Ok(id)
    }

    /// Registers a prefix `NOT` from operand position. It nests into
    /// the pending operator's empty slot (or becomes the root) and then
    /// pends its own operand.
    fn attach_prefix_not(&mut self, st: &mut ExprState) -> Result<()> {
        let id = self.arena.alloc(Expr::Operator {
            op: Op::Not,
            left: ExprId::PLACEHOLDER,
            right: None,
        })?;
        match st.pending.take() {
            Some(parent) => self.fill_operand(parent, id),
            None => {
                debug_assert!(st.top.is_none());
                st.top = Some(id);
            }
        }
        let level = Op::Not.level();
        st.levels[level as usize] = Some(id);
        for slot in &mut st.levels[1..level as usize] {
            *slot = None;
        }
        st.pending = Some(id);
        Ok(())
    }

    /// `subject BETWEEN lo AND hi`, desugared in place to
    /// `subject >= lo AND copy(subject) <= hi` on a node attached at
    /// level 4.
    fn parse_between(&mut self, st: &mut ExprState) -> Result<()> {
        let node = self.attach_binary(st, Op::And, Op::Is.level())?;
        let subject = self.get_left(node);

        // Bounds are capped below level 4 so the AND separating them is
        // ours, not the machine's.
        let cap = Op::Is.level() - 1;
        let lo = self.parse_expr_max(cap)?;
        self.expect_kw(Keyword::And)?;
        let hi = self.parse_expr_max(cap)?;

        let subject_copy = self.arena.deep_copy(subject)?;
        let ge = self.arena.alloc(Expr::Operator {
            op: Op::Ge,
            left: subject,
            right: Some(lo),
        })?;
        let le = self.arena.alloc(Expr::Operator {
            op: Op::Le,
            left: subject_copy,
            right: Some(hi),
        })?;
        if let Expr::Operator { left, right, .. } = self.arena.get_mut(node) {
            *left = ge;
            *right = Some(le);
        }
        st.pending = None;
        Ok(())
    }

    /// Swaps `new_child` into `parent`'s operand-side slot (left for
    /// unary, right for binary) and returns what was there.
    fn steal_operand(&mut self, parent: ExprId, new_child: ExprId) -> ExprId {
        match self.arena.get_mut(parent) {
            Expr::Operator {
                op, left, right, ..
            } => {
                let slot = if op.is_unary() {
                    left
                } else if let Some(right) = right {
                    right
                } else {
                    unreachable!("binary operator without right slot")
                };
                std::mem::replace(slot, new_child)
            }
            _ => unreachable!("operand steal from non-operator"),
        }
    }

    fn fill_operand(&mut self, parent: ExprId, child: ExprId) {
        let old = self.steal_operand(parent, child);
        debug_assert_eq!(old, ExprId::PLACEHOLDER);
    }

    fn set_left(&mut self, id: ExprId, value: ExprId) {
        if let Expr::Operator { left, .. } = self.arena.get_mut(id) {
            *left = value;
        }
    }

    fn get_left(&self, id: ExprId) -> ExprId {
        match self.arena.get(id) {
            Expr::Operator { left, .. } => *left,
            _ => unreachable!("left child of non-operator"),
        }
    }

    // ---- SELECT ----

    fn parse_select(&mut self) -> Result<SelectStmt> {
        let mut stmt = self.parse_select_chain()?;
        if self.consume_kw(Keyword::Order)? {
            self.expect_kw(Keyword::By)?;
            stmt.order_by = self.parse_order_by_items()?;
        }
        Ok(stmt)
    }

    fn parse_select_chain(&mut self) -> Result<SelectStmt> {
        let mut stmt = self.parse_select_core()?;
        let op = match self.current.kind {
            LexemeKind::Keyword(Keyword::Union) => Some(SetOpKind::Union),
            LexemeKind::Keyword(Keyword::Intersect) => Some(SetOpKind::Intersect),
            LexemeKind::Keyword(Keyword::Except) => Some(SetOpKind::Except),
            _ => None,
        };
        if let Some(op) = op {
            self.advance()?;
            let all = self.consume_kw(Keyword::All)?;
            let right = self.parse_select_chain()?;
            stmt.set_op = Some(SetOperation {
                op,
                all,
                right: Box::new(right),
            });
        }
        Ok(stmt)
    }

    fn parse_select_core(&mut self) -> Result<SelectStmt> {
        self.expect_kw(Keyword::Select)?;
        let distinct = self.consume_kw(Keyword::Distinct)?;
        if !distinct {
            self.consume_kw(Keyword::All)?;
        }

        if self.check_kw(Keyword::From) {
            return Err(self.err_here("expected select list"));
        }
        let mut columns = Vec::new();
        loop {
            if self.consume_tok(Token::Star)? {
                columns.push(SelectColumn::Wildcard);
            } else {
                let expr = self.parse_expr()?;
                let alias = self.parse_alias()?;
                columns.push(SelectColumn::Expr { expr, alias });
            }
            if !self.consume_tok(Token::Comma)? {
                break;
            }
        }

        let from = if self.consume_kw(Keyword::From)? {
            Some(self.parse_from()?)
        } else {
            None
        };

        let where_clause = if self.consume_kw(Keyword::Where)? {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let mut group_by = Vec::new();
        if self.check_kw(Keyword::Group) {
            if from.is_none() {
                return Err(self.err_here("GROUP BY requires a FROM clause"));
            }
            self.advance()?;
            self.expect_kw(Keyword::By)?;
            loop {
                group_by.push(self.parse_expr()?);
                if !self.consume_tok(Token::Comma)? {
                    break;
                }
            }
        }

        let having = if self.check_kw(Keyword::Having) {
            if from.is_none() {
                return Err(self.err_here("HAVING requires a FROM clause"));
            }
            self.advance()?;
            Some(self.parse_expr()?)
        } else {
            None
        };

        Ok(SelectStmt {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            set_op: None,
            order_by: Vec::new(),
        })
    }

    fn parse_alias(&mut self) -> Result<Option<String>> {
        if self.consume_kw(Keyword::As)? {
            return Ok(Some(self.expect_ident()?));
        }
        if let LexemeKind::Ident(name) = &self.current.kind {
            let name = name.clone();
            self.advance()?;
            return Ok(Some(name));
        }
        Ok(None)
    }

    fn parse_order_by_items(&mut self) -> Result<Vec<OrderByItem>> {
        let mut items = Vec::new();
        loop {
            let expr = self.parse_expr()?;
            let direction = if self.consume_kw(Keyword::Desc)? {
                SortDirection::Descending
            } else {
                self.consume_kw(Keyword::Asc)?;
                SortDirection::Ascending
            };
            let nulls = if self.consume_kw(Keyword::Nulls)? {
                if self.consume_kw(Keyword::First)? {
                    Some(NullsOrder::First)
                } else if self.consume_kw(Keyword::Last)? {
                    Some(NullsOrder::Last)
                } else {
                    return Err(self.err_here("expected FIRST or LAST"));
                }
            } else {
                None
            };
            items.push(OrderByItem {
                expr,
                direction,
                nulls,
            });
            if !self.consume_tok(Token::Comma)? {
                return Ok(items);
            }
        }
    }

    fn parse_from(&mut self) -> Result<FromClause> {
        let mut from = FromClause::Table(self.parse_table_ref()?);
        loop {
            let (kind, comma) = if self.consume_tok(Token::Comma)? {
                (JoinKind::Cross, true)
            } else if self.consume_kw(Keyword::Join)? {
                (JoinKind::Inner, false)
            } else if self.consume_kw(Keyword::Inner)? {
                self.expect_kw(Keyword::Join)?;
                (JoinKind::Inner, false)
            } else if self.consume_kw(Keyword::Left)? {
                self.consume_kw(Keyword::Outer)?;
                self.expect_kw(Keyword::Join)?;
                (JoinKind::Left, false)
            } else if self.consume_kw(Keyword::Right)? {
                self.consume_kw(Keyword::Outer)?;
                self.expect_kw(Keyword::Join)?;
                (JoinKind::Right, false)
            } else if self.consume_kw(Keyword::Full)? {
                self.consume_kw(Keyword::Outer)?;
                self.expect_kw(Keyword::Join)?;
                (JoinKind::Full, false)
            } else if self.consume_kw(Keyword::Cross)? {
                self.expect_kw(Keyword::Join)?;
                (JoinKind::Cross, false)
            } else {
                return Ok(from);
            };

            let right = self.parse_table_ref()?;
            let condition = if kind == JoinKind::Cross {
                if !comma && self.check_kw(Keyword::On) {
                    return Err(self.err_here("CROSS JOIN does not take ON"));
                }
                None
            } else {
                self.expect_kw(Keyword::On)?;
                Some(self.parse_expr()?)
            };
            from = FromClause::Join(Box::new(JoinClause {
                left: from,
                kind,
                right,
                condition,
            }));
        }
    }

    fn parse_table_ref(&mut self) -> Result<TableRef> {
        let name = self.expect_ident()?;
        let alias = self.parse_alias()?;
        Ok(TableRef { name, alias })
    }

    // ---- INSERT / UPDATE / DELETE ----

    fn parse_insert(&mut self) -> Result<InsertStmt> {
        self.expect_kw(Keyword::Insert)?;
        self.expect_kw(Keyword::Into)?;
        let table = self.expect_ident()?;

        let mut columns = Vec::new();
        if self.consume_tok(Token::LParen)? {
            loop {
                columns.push(self.expect_ident()?);
                if !self.consume_tok(Token::Comma)? {
                    break;
                }
            }
            self.expect_tok(Token::RParen)?;
        }

        let source = if self.check_kw(Keyword::Select) {
            InsertSource::Select(Box::new(self.parse_select()?))
        } else {
            self.expect_kw(Keyword::Values)?;
            let mut rows = Vec::new();
            loop {
                self.expect_tok(Token::LParen)?;
                let mut row = Vec::new();
                loop {
                    row.push(self.parse_expr()?);
                    if !self.consume_tok(Token::Comma)? {
                        break;
                    }
                }
                self.expect_tok(Token::RParen)?;
                rows.push(row);
                if !self.consume_tok(Token::Comma)? {
                    break;
                }
            }
            InsertSource::Values(rows)
        };

        Ok(InsertStmt {
            table,
            columns,
            source,
        })
    }

    fn parse_update(&mut self) -> Result<UpdateStmt> {
        self.expect_kw(Keyword::Update)?;
        let table = self.expect_ident()?;
        self.expect_kw(Keyword::Set)?;

        let mut assignments = Vec::new();
        loop {
            let column = self.expect_ident()?;
            self.expect_tok(Token::Eq)?;
            assignments.push((column, self.parse_expr()?));
            if !self.consume_tok(Token::Comma)? {
                break;
            }
        }

        let where_clause = if self.consume_kw(Keyword::Where)? {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(UpdateStmt {
            table,
            assignments,
            where_clause,
        })
    }

    fn parse_delete(&mut self) -> Result<DeleteStmt> {
        self.expect_kw(Keyword::Delete)?;
        self.expect_kw(Keyword::From)?;
        let table = self.expect_ident()?;
        let where_clause = if self.consume_kw(Keyword::Where)? {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(DeleteStmt {
            table,
            where_clause,
        })
    }

    // ---- DDL ----

    fn parse_create(&mut self) -> Result<Statement> {
        self.expect_kw(Keyword::Create)?;
        if self.consume_kw(Keyword::Table)? {
            let if_not_exists = self.parse_if_not_exists()?;
            let name = self.expect_ident()?;
            self.expect_tok(Token::LParen)?;

            let mut columns = Vec::new();
            let mut constraints = Vec::new();
            loop {
                if self.at_table_constraint() {
                    constraints.push(self.parse_table_constraint()?);
                } else {
                    columns.push(self.parse_column_def()?);
                }
                if !self.consume_tok(Token::Comma)? {
                    break;
                }
            }
            self.expect_tok(Token::RParen)?;

            Ok(Statement::CreateTable(CreateTableStmt {
                name,
                if_not_exists,
                columns,
                constraints,
            }))
        } else if self.consume_kw(Keyword::Database)? {
            let if_not_exists = self.parse_if_not_exists()?;
            let name = self.expect_ident()?;
            Ok(Statement::CreateDatabase(CreateDatabaseStmt {
                name,
                if_not_exists,
            }))
        } else {
            Err(self.err_here("expected TABLE or DATABASE"))
        }
    }

    fn parse_drop(&mut self) -> Result<Statement> {
        self.expect_kw(Keyword::Drop)?;
        if self.consume_kw(Keyword::Table)? {
            let if_exists = self.parse_if_exists()?;
            let name = self.expect_ident()?;
            Ok(Statement::DropTable(DropTableStmt { name, if_exists }))
        } else if self.consume_kw(Keyword::Database)? {
            let if_exists = self.parse_if_exists()?;
            let name = self.expect_ident()?;
            Ok(Statement::DropDatabase(DropDatabaseStmt { name, if_exists }))
        } else {
            Err(self.err_here("expected TABLE or DATABASE"))
        }
    }

    fn parse_if_not_exists(&mut self) -> Result<bool> {
        if self.consume_kw(Keyword::If)? {
            self.expect_kw(Keyword::Not)?;
            self.expect_kw(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_if_exists(&mut self) -> Result<bool> {
        if self.consume_kw(Keyword::If)? {
            self.expect_kw(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn at_table_constraint(&self) -> bool {
        matches!(
            self.current.kind,
            LexemeKind::Keyword(
                Keyword::Constraint
                    | Keyword::Primary
                    | Keyword::Unique
                    | Keyword::Foreign
                    | Keyword::Check
            )
        )
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        let name = self.expect_ident()?;
        let data_type = self.parse_data_type()?;

        let mut constraints = Vec::new();
        loop {
            let constraint = if self.consume_kw(Keyword::Not)? {
                self.expect_kw(Keyword::Null)?;
                ColumnConstraint::NotNull
            } else if self.consume_kw(Keyword::Null)? {
                ColumnConstraint::Null
            } else if self.consume_kw(Keyword::Unique)? {
                ColumnConstraint::Unique
            } else if self.consume_kw(Keyword::Primary)? {
                self.expect_kw(Keyword::Key)?;
                ColumnConstraint::PrimaryKey
            } else if self.consume_kw(Keyword::Default)? {
                ColumnConstraint::Default(self.parse_expr()?)
            } else if self.consume_kw(Keyword::Check)? {
                self.expect_tok(Token::LParen)?;
                let expr = self.parse_expr()?;
                self.expect_tok(Token::RParen)?;
                ColumnConstraint::Check(expr)
            } else if self.consume_kw(Keyword::References)? {
                let table = self.expect_ident()?;
                let column = if self.consume_tok(Token::LParen)? {
                    let column = self.expect_ident()?;
                    self.expect_tok(Token::RParen)?;
                    Some(column)
                } else {
                    None
                };
                let on_delete = self.parse_on_delete()?;
                ColumnConstraint::References {
                    table,
                    column,
                    on_delete,
                }
            } else {
                break;
            };
            constraints.push(constraint);
        }

        Ok(ColumnDef {
            name,
            data_type,
            constraints,
        })
    }

    fn parse_table_constraint(&mut self) -> Result<TableConstraint> {
        let name = if self.consume_kw(Keyword::Constraint)? {
            Some(self.expect_ident()?)
        } else {
            None
        };

        if self.consume_kw(Keyword::Primary)? {
            self.expect_kw(Keyword::Key)?;
            let columns = self.parse_ident_list()?;
            Ok(TableConstraint::PrimaryKey { name, columns })
        } else if self.consume_kw(Keyword::Unique)? {
            let columns = self.parse_ident_list()?;
            Ok(TableConstraint::Unique { name, columns })
        } else if self.consume_kw(Keyword::Foreign)? {
            self.expect_kw(Keyword::Key)?;
            let columns = self.parse_ident_list()?;
            self.expect_kw(Keyword::References)?;
            let ref_table = self.expect_ident()?;
            let ref_columns = if self.check_tok(Token::LParen) {
                self.parse_ident_list()?
            } else {
                Vec::new()
            };
            let on_delete = self.parse_on_delete()?;
            Ok(TableConstraint::ForeignKey {
                name,
                columns,
                ref_table,
                ref_columns,
                on_delete,
            })
        } else if self.consume_kw(Keyword::Check)? {
            self.expect_tok(Token::LParen)?;
            let expr = self.parse_expr()?;
            self.expect_tok(Token::RParen)?;
            Ok(TableConstraint::Check { name, expr })
        } else {
            Err(self.err_here("expected a table constraint"))
        }
    }

    fn parse_ident_list(&mut self) -> Result<Vec<String>> {
        self.expect_tok(Token::LParen)?;
        let mut idents = Vec::new();
        loop {
            idents.push(self.expect_ident()?);
            if !self.consume_tok(Token::Comma)? {
                break;
            }
        }
        self.expect_tok(Token::RParen)?;
        Ok(idents)
    }

    fn parse_on_delete(&mut self) -> Result<Option<ReferentialAction>> {
        if !self.consume_kw(Keyword::On)? {
            return Ok(None);
        }
        self.expect_kw(Keyword::Delete)?;
        let action = if self.consume_kw(Keyword::Cascade)? {
            ReferentialAction::Cascade
        } else if self.consume_kw(Keyword::Restrict)? {
            ReferentialAction::Restrict
        } else if self.consume_kw(Keyword::No)? {
            self.expect_kw(Keyword::Action)?;
            ReferentialAction::NoAction
        } else if self.consume_kw(Keyword::Set)? {
            if self.consume_kw(Keyword::Null)? {
                ReferentialAction::SetNull
            } else if self.consume_kw(Keyword::Default)? {
                ReferentialAction::SetDefault
            } else {
                return Err(self.err_here("expected NULL or DEFAULT"));
            }
        } else {
            return Err(self.err_here("expected a referential action"));
        };
        Ok(Some(action))
    }

    fn parse_data_type(&mut self) -> Result<DataType> {
        let kw = match self.current.kind {
            LexemeKind::Keyword(kw) => kw,
            _ => return Err(self.err_here("expected a data type")),
        };
        match kw {
            Keyword::Int | Keyword::Integer => {
                self.advance()?;
                Ok(DataType::Int)
            }
            Keyword::Smallint => {
                self.advance()?;
                Ok(DataType::SmallInt)
            }
            Keyword::Bigint => {
                self.advance()?;
                Ok(DataType::BigInt)
            }
            Keyword::Decimal | Keyword::Numeric => {
                self.advance()?;
                let (precision, scale) = self.parse_type_args()?;
                Ok(DataType::Decimal(precision, scale))
            }
            Keyword::Varchar => {
                self.advance()?;
                let (width, _) = self.parse_type_args()?;
                Ok(DataType::Varchar(width))
            }
            Keyword::Char => {
                self.advance()?;
                let (width, _) = self.parse_type_args()?;
                Ok(DataType::Char(width))
            }
            Keyword::Text => {
                self.advance()?;
                Ok(DataType::Text)
            }
            Keyword::Boolean => {
                self.advance()?;
                Ok(DataType::Boolean)
            }
            Keyword::Float => {
                self.advance()?;
                Ok(DataType::Float)
            }
            Keyword::Double => {
                self.advance()?;
                self.consume_kw(Keyword::Precision)?;
                Ok(DataType::Double)
            }
            Keyword::Date => {
                self.advance()?;
                Ok(DataType::Date)
            }
            Keyword::Time => {
                self.advance()?;
                Ok(DataType::Time)
            }
            Keyword::Timestamp => {
                self.advance()?;
                Ok(DataType::Timestamp)
            }
            _ => Err(self.err_here("expected a data type")),
        }
    }

    /// Reads `( n [, m] )` in integer mode, or nothing.
    fn parse_type_args(&mut self) -> Result<(Option<u32>, Option<u32>)> {
        if !self.check_tok(Token::LParen) {
            return Ok((None, None));
        }
        self.lexer.set_integer_mode(true);
        self.advance()?; // past '(' — the argument itself is lexed as an integer
        let first = self.expect_type_width()?;
        let second = if self.consume_tok(Token::Comma)? {
            Some(self.expect_type_width()?)
        } else {
            None
        };
        self.lexer.set_integer_mode(false);
        self.expect_tok(Token::RParen)?;
        Ok((Some(first), second))
    }

    fn expect_type_width(&mut self) -> Result<u32> {
        let line = self.current.line;
        let column = self.current.column;
        let value = self.expect_integer()?;
        u32::try_from(value).map_err(|_| {
            self.lexer.emit(Error::Syntax {
                message: "type argument out of range".into(),
                line,
                column,
            })
        })
    }

    // ---- ALTER TABLE ----

    fn parse_alter(&mut self) -> Result<AlterTableStmt> {
        self.expect_kw(Keyword::Alter)?;
        self.expect_kw(Keyword::Table)?;
        let name = self.expect_ident()?;

        let action = if self.consume_kw(Keyword::Add)? {
            if self.at_table_constraint() {
                AlterTableAction::AddConstraint(self.parse_table_constraint()?)
            } else {
                self.consume_kw(Keyword::Column)?;
                AlterTableAction::AddColumn(self.parse_column_def()?)
            }
        } else if self.consume_kw(Keyword::Alter)? {
            self.consume_kw(Keyword::Column)?;
            let column = self.expect_ident()?;
            if self.consume_kw(Keyword::Set)? {
                if self.consume_kw(Keyword::Default)? {
                    AlterTableAction::SetDefault {
                        column,
                        value: self.parse_expr()?,
                    }
                } else if self.consume_kw(Keyword::Not)? {
                    self.expect_kw(Keyword::Null)?;
                    AlterTableAction::SetNotNull { column }
                } else {
                    return Err(self.err_here("expected DEFAULT or NOT NULL"));
                }
            } else if self.consume_kw(Keyword::Drop)? {
                if self.consume_kw(Keyword::Default)? {
                    AlterTableAction::DropDefault { column }
                } else if self.consume_kw(Keyword::Not)? {
                    self.expect_kw(Keyword::Null)?;
                    AlterTableAction::DropNotNull { column }
                } else {
                    return Err(self.err_here("expected DEFAULT or NOT NULL"));
                }
            } else {
                return Err(self.err_here("expected SET or DROP"));
            }
        } else if self.consume_kw(Keyword::Modify)? {
            self.consume_kw(Keyword::Column)?;
            let column = self.expect_ident()?;
            let data_type = self.parse_data_type()?;
            AlterTableAction::ModifyColumn { column, data_type }
        } else if self.consume_kw(Keyword::Drop)? {
            if self.consume_kw(Keyword::Constraint)? {
                AlterTableAction::DropConstraint {
                    name: self.expect_ident()?,
                }
            } else {
                self.consume_kw(Keyword::Column)?;
                AlterTableAction::DropColumn {
                    column: self.expect_ident()?,
                }
            }
        } else if self.consume_kw(Keyword::Rename)? {
            if self.consume_kw(Keyword::Column)? {
                let from = self.expect_ident()?;
                self.expect_kw(Keyword::To)?;
                AlterTableAction::RenameColumn {
                    from,
                    to: self.expect_ident()?,
                }
            } else if self.consume_kw(Keyword::Constraint)? {
                let from = self.expect_ident()?;
                self.expect_kw(Keyword::To)?;
                AlterTableAction::RenameConstraint {
                    from,
                    to: self.expect_ident()?,
                }
            } else if self.consume_kw(Keyword::To)? {
                AlterTableAction::RenameTable {
                    to: self.expect_ident()?,
                }
            } else {
                return Err(self.err_here("expected COLUMN, CONSTRAINT, or TO"));
            }
        } else {
            return Err(self.err_here("expected an ALTER TABLE action"));
        };

        Ok(AlterTableStmt { name, action })
    }
}
