//! # Constant Folding
//!
//! Evaluates constant subexpressions in place. A folded operator node
//! is overwritten with its literal result under the same [`ExprId`], so
//! handles held by the statement stay valid; the orphaned children
//! remain in the arena as dead nodes.
//!
//! Folding runs in one of two modes:
//!
//! - [`FoldMode::PreResolution`]: column names are opaque. A subtree
//!   containing a name is simply left unfolded, with no error; only
//!   fully-literal subtrees are evaluated.
//! - [`FoldMode::PostResolution`]: names are looked up through the
//!   caller's [`NameResolver`] and replaced with the resolved literal
//!   before evaluation.
//!
//! Bind variables always block folding of their subtree.
//!
//! ## Evaluation Rules
//!
//! - Arithmetic: a `NULL` operand yields `NULL`; two numbers evaluate
//!   through the decimal engine, whose errors (division by zero,
//!   overflow) abort the fold; anything else is a datatype mismatch.
//! - Comparisons: a `NULL` operand yields `NULL`; numbers compare by
//!   value, strings through the [`StringComparator`] (bytewise by
//!   default), booleans support only `=` and `<>`. Mixed types are a
//!   datatype mismatch.
//! - `IS` / `IS NOT`: `NULL` is an ordinary comparable value
//!   (`NULL IS NULL` is true) and operands of different types compare
//!   unequal rather than erroring. `IS NOT` negates.
//! - `NOT`, `AND`, `OR`: require boolean literals; anything else,
//!   `NULL` included, is a datatype mismatch.
//!
//! Traversal is post-order with an explicit stack, so deeply nested
//! expressions cannot overflow the call stack.

use super::ast::{
    AlterTableAction, ColumnConstraint, Expr, ExprArena, ExprId, FromClause, InsertSource,
    NameRef, Op, SelectColumn, SelectStmt, Statement, TableConstraint,
};
use crate::decimal::Decimal;
use crate::error::{Error, Result};
use smallvec::{smallvec, SmallVec};
use std::cmp::Ordering;

/// A literal produced by name resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum FoldValue {
    Number(Decimal),
    Str(String),
    Bool(bool),
    Null,
}

/// Supplies literal values for column names in
/// [`FoldMode::PostResolution`].
pub trait NameResolver {
    fn resolve(&self, name: &NameRef) -> Result<FoldValue>;
}

/// Collation hook for string comparisons during folding.
pub trait StringComparator {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Default collation: plain byte order.
pub struct BytewiseComparator;

impl StringComparator for BytewiseComparator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.as_bytes().cmp(b.as_bytes())
    }
}

#[derive(Clone, Copy)]
pub enum FoldMode<'a> {
    PreResolution,
    PostResolution(&'a dyn NameResolver),
}

/// Folds the subtree under `root` with the default bytewise collation.
pub fn fold_constants(arena: &mut ExprArena, root: ExprId, mode: FoldMode) -> Result<()> {
    fold_with(arena, root, mode, &BytewiseComparator)
}

/// Folds the subtree under `root` with an explicit collation.
pub fn fold_with(
    arena: &mut ExprArena,
    root: ExprId,
    mode: FoldMode,
    comparator: &dyn StringComparator,
) -> Result<()> {
    // (node, children visited) pairs; post-order without recursion.
    let mut stack: SmallVec<[(ExprId, bool); 32]> = smallvec![(root, false)];
    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            fold_operator(arena, id, comparator)?;
            continue;
        }
        match arena.get(id) {
            Expr::Operator { left, right, .. } => {
                let left = *left;
                let right = *right;
                stack.push((id, true));
                stack.push((left, false));
                if let Some(right) = right {
                    stack.push((right, false));
                }
            }
            Expr::Name(_) => {
                if let FoldMode::PostResolution(resolver) = mode {
                    let name = match arena.get(id) {
                        Expr::Name(n) => n.clone(),
                        _ => unreachable!(),
                    };
                    let value = resolver.resolve(&name)?;
                    *arena.get_mut(id) = value_expr(value);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Folds every expression root reachable from a statement.
pub fn fold_statement(
    statement: &Statement,
    arena: &mut ExprArena,
    mode: FoldMode,
) -> Result<()> {
    let mut roots: SmallVec<[ExprId; 16]> = smallvec![];
    collect_roots(statement, &mut roots);
    log::debug!("folding {} expression roots", roots.len());
    for root in roots {
        fold_with(arena, root, mode, &BytewiseComparator)?;
    }
    Ok(())
}

fn value_expr(value: FoldValue) -> Expr {
    match value {
        FoldValue::Number(d) => Expr::Number(d),
        FoldValue::Str(s) => Expr::Str(s),
        FoldValue::Bool(b) => Expr::Bool(b),
        FoldValue::Null => Expr::Null,
    }
}

fn fold_operator(
    arena: &mut ExprArena,
    id: ExprId,
    comparator: &dyn StringComparator,
) -> Result<()> {
    let (op, left, right) = match *arena.get(id) {
        Expr::Operator { op, left, right } => (op, left, right),
        _ => return Ok(()),
    };

    let lhs = arena.get(left).clone();
    if !lhs.is_literal() {
        return Ok(());
    }

    let replacement = if op == Op::Not {
        match lhs {
            Expr::Bool(b) => Expr::Bool(!b),
            _ => {
                return Err(Error::DatatypeMismatch(
                    "NOT requires a boolean operand".into(),
                ))
            }
        }
    } else {
        let rid = match right {
            Some(rid) => rid,
            None => unreachable!("binary operator without right child"),
        };
        let rhs = arena.get(rid).clone();
        if !rhs.is_literal() {
            return Ok(());
        }
        match op {
            Op::Add | Op::Sub | Op::Mul | Op::Div => fold_arith(op, &lhs, &rhs)?,
            Op::Eq | Op::Ne | Op::Lt | Op::Le | Op::Gt | Op::Ge => {
                fold_compare(op, &lhs, &rhs, comparator)?
            }
            Op::Is | Op::IsNot => fold_is(op, &lhs, &rhs, comparator),
            Op::And | Op::Or => fold_logic(op, &lhs, &rhs)?,
            Op::Not => unreachable!(),
        }
    };

    *arena.get_mut(id) = replacement;
    Ok(())
}

fn fold_arith(op: Op, lhs: &Expr, rhs: &Expr) -> Result<Expr> {
    if matches!(lhs, Expr::Null) || matches!(rhs, Expr::Null) {
        return Ok(Expr::Null);
    }
    match (lhs, rhs) {
        (Expr::Number(a), Expr::Number(b)) => {
            let result = match op {
                Op::Add => a.add(b)?,
                Op::Sub => a.sub(b)?,
                Op::Mul => a.mul(b)?,
                Op::Div => a.div(b)?,
                _ => unreachable!(),
            };
            Ok(Expr::Number(result))
        }
        _ => Err(Error::DatatypeMismatch(
            "arithmetic requires numeric operands".into(),
        )),
    }
}

fn ordering_matches(op: Op, ord: Ordering) -> bool {
    match op {
        Op::Eq => ord == Ordering::Equal,
        Op::Ne => ord != Ordering::Equal,
        Op::Lt => ord == Ordering::Less,
        Op::Le => ord != Ordering::Greater,
        Op::Gt => ord == Ordering::Greater,
        Op::Ge => ord != Ordering::Less,
        _ => unreachable!(),
    }
}

fn fold_compare(
    op: Op,
    lhs: &Expr,
    rhs: &Expr,
    comparator: &dyn StringComparator,
) -> Result<Expr> {
    if matches!(lhs, Expr::Null) || matches!(rhs, Expr::Null) {
        return Ok(Expr::Null);
    }
    match (lhs, rhs) {
        (Expr::Number(a), Expr::Number(b)) => Ok(Expr::Bool(ordering_matches(op, a.cmp(b)))),
        (Expr::Str(a), Expr::Str(b)) => {
            Ok(Expr::Bool(ordering_matches(op, comparator.compare(a, b))))
        }
        (Expr::Bool(a), Expr::Bool(b)) => match op {
            Op::Eq => Ok(Expr::Bool(a == b)),
            Op::Ne => Ok(Expr::Bool(a != b)),
            _ => Err(Error::DatatypeMismatch(
                "booleans support only = and <>".into(),
            )),
        },
        _ => Err(Error::DatatypeMismatch(
            "cannot compare operands of different types".into(),
        )),
    }
}

fn fold_is(op: Op, lhs: &Expr, rhs: &Expr, comparator: &dyn StringComparator) -> Expr {
    let equal = match (lhs, rhs) {
        (Expr::Null, Expr::Null) => true,
        (Expr::Null, _) | (_, Expr::Null) => false,
        (Expr::Number(a), Expr::Number(b)) => a == b,
        (Expr::Str(a), Expr::Str(b)) => comparator.compare(a, b) == Ordering::Equal,
        (Expr::Bool(a), Expr::Bool(b)) => a == b,
        // Distinct types are simply not the same value.
        _ => false,
    };
    Expr::Bool(if op == Op::IsNot { !equal } else { equal })
}

fn fold_logic(op: Op, lhs: &Expr, rhs: &Expr) -> Result<Expr> {
    match (lhs, rhs) {
        (Expr::Bool(a), Expr::Bool(b)) => Ok(Expr::Bool(match op {
            Op::And => *a && *b,
            Op::Or => *a || *b,
            _ => unreachable!(),
        })),
        _ => Err(Error::DatatypeMismatch(
            "AND and OR require boolean operands".into(),
        )),
    }
}

fn collect_roots(statement: &Statement, roots: &mut SmallVec<[ExprId; 16]>) {
    match statement {
        Statement::Select(stmt) => collect_select_roots(stmt, roots),
        Statement::Insert(stmt) => match &stmt.source {
            InsertSource::Values(rows) => {
                for row in rows {
                    roots.extend(row.iter().copied());
                }
            }
            InsertSource::Select(select) => collect_select_roots(select, roots),
        },
        Statement::Update(stmt) => {
            roots.extend(stmt.assignments.iter().map(|(_, e)| *e));
            roots.extend(stmt.where_clause);
        }
        Statement::Delete(stmt) => roots.extend(stmt.where_clause),
        Statement::CreateTable(stmt) => {
            for column in &stmt.columns {
                collect_column_roots(&column.constraints, roots);
            }
            for constraint in &stmt.constraints {
                if let TableConstraint::Check { expr, .. } = constraint {
                    roots.push(*expr);
                }
            }
        }
        Statement::AlterTable(stmt) => match &stmt.action {
            AlterTableAction::AddColumn(column) => {
                collect_column_roots(&column.constraints, roots);
            }
            AlterTableAction::AddConstraint(TableConstraint::Check { expr, .. }) => {
                roots.push(*expr);
            }
            AlterTableAction::SetDefault { value, .. } => roots.push(*value),
            _ => {}
        },
        Statement::DropTable(_)
        | Statement::CreateDatabase(_)
        | Statement::DropDatabase(_) => {}
    }
}

fn collect_column_roots(constraints: &[ColumnConstraint], roots: &mut SmallVec<[ExprId; 16]>) {
    for constraint in constraints {
        match constraint {
            ColumnConstraint::Default(expr) | ColumnConstraint::Check(expr) => {
                roots.push(*expr)
            }
            _ => {}
        }
    }
}

fn collect_select_roots(stmt: &SelectStmt, roots: &mut SmallVec<[ExprId; 16]>) {
    for column in &stmt.columns {
        if let SelectColumn::Expr { expr, .. } = column {
            roots.push(*expr);
        }
    }
    if let Some(from) = &stmt.from {
        collect_from_roots(from, roots);
    }
    roots.extend(stmt.where_clause);
    roots.extend(stmt.group_by.iter().copied());
    roots.extend(stmt.having);
    for item in &stmt.order_by {
        roots.push(item.expr);
    }
    if let Some(set_op) = &stmt.set_op {
        collect_select_roots(&set_op.right, roots);
    }
}

fn collect_from_roots(from: &FromClause, roots: &mut SmallVec<[ExprId; 16]>) {
    if let FromClause::Join(join) = from {
        collect_from_roots(&join.left, roots);
        roots.extend(join.condition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::parser::parse_str;

    /// Parses `SELECT x WHERE <expr>`, folds the WHERE clause, and
    /// returns the folded root node.
    fn fold_where(expr: &str, mode: FoldMode) -> Result<(ExprArena, ExprId)> {
        let parsed = parse_str(&format!("SELECT x WHERE {expr}"))?;
        let Statement::Select(stmt) = &parsed.statement else {
            panic!("not a select");
        };
        let root = stmt.where_clause.unwrap();
        let mut arena = parsed.arena;
        fold_constants(&mut arena, root, mode)?;
        Ok((arena, root))
    }

    fn folded(expr: &str) -> Expr {
        let (arena, root) = fold_where(expr, FoldMode::PreResolution).unwrap();
        arena.get(root).clone()
    }

    fn fold_err(expr: &str) -> Error {
        fold_where(expr, FoldMode::PreResolution).unwrap_err()
    }

    fn num(s: &str) -> Expr {
        Expr::Number(s.parse().unwrap())
    }

    #[test]
    fn arithmetic_folds_to_literals() {
        assert_eq!(folded("3 + 4"), num("7"));
        assert_eq!(folded("1 + 2 * 3"), num("7"));
        assert_eq!(folded("10 / 4"), num("2.5"));
        assert_eq!(folded("-5 + 2"), num("-3"));
    }

    #[test]
    fn arithmetic_with_null_yields_null() {
        assert_eq!(folded("NULL + 1"), Expr::Null);
        assert_eq!(folded("2 * NULL"), Expr::Null);
    }

    #[test]
    fn division_by_zero_aborts_the_fold() {
        assert_eq!(fold_err("1 / 0"), Error::DivisionByZero);
        assert_eq!(fold_err("1 / (3 - 3)"), Error::DivisionByZero);
    }

    #[test]
    fn arithmetic_on_strings_is_a_mismatch() {
        assert!(matches!(fold_err("1 + 'x'"), Error::DatatypeMismatch(_)));
    }

    #[test]
    fn comparisons_fold_to_booleans() {
        assert_eq!(folded("1 < 2"), Expr::Bool(true));
        assert_eq!(folded("2 <> 2"), Expr::Bool(false));
        assert_eq!(folded("'a' = 'a'"), Expr::Bool(true));
        assert_eq!(folded("'a' < 'b'"), Expr::Bool(true));
        assert_eq!(folded("true = false"), Expr::Bool(false));
        assert_eq!(folded("NULL = 1"), Expr::Null);
    }

    #[test]
    fn cross_type_comparison_is_a_mismatch() {
        assert!(matches!(fold_err("1 = 'x'"), Error::DatatypeMismatch(_)));
        assert!(matches!(fold_err("true < false"), Error::DatatypeMismatch(_)));
    }

    #[test]
    fn is_treats_null_as_comparable() {
        assert_eq!(folded("NULL IS NULL"), Expr::Bool(true));
        assert_eq!(folded("1 IS NULL"), Expr::Bool(false));
        assert_eq!(folded("1 IS NOT NULL"), Expr::Bool(true));
        assert_eq!(folded("1 IS 1"), Expr::Bool(true));
        // Different types are unequal, not an error.
        assert_eq!(folded("1 IS '1'"), Expr::Bool(false));
    }

    #[test]
    fn logic_requires_booleans() {
        assert_eq!(folded("true AND false"), Expr::Bool(false));
        assert_eq!(folded("false OR true"), Expr::Bool(true));
        assert_eq!(folded("NOT true"), Expr::Bool(false));
        assert!(matches!(fold_err("NOT 1"), Error::DatatypeMismatch(_)));
        assert!(matches!(fold_err("NULL AND true"), Error::DatatypeMismatch(_)));
    }

    #[test]
    fn between_folds_through_its_desugaring() {
        assert_eq!(folded("3 BETWEEN 1 AND 5"), Expr::Bool(true));
        assert_eq!(folded("7 BETWEEN 1 AND 5"), Expr::Bool(false));
    }

    #[test]
    fn names_block_folding_before_resolution() {
        let (arena, root) = fold_where("x + 1", FoldMode::PreResolution).unwrap();
        assert!(matches!(
            arena.get(root),
            Expr::Operator { op: Op::Add, .. }
        ));
    }

    #[test]
    fn constant_subtrees_fold_around_names() {
        let (arena, root) = fold_where("x + 2 * 3", FoldMode::PreResolution).unwrap();
        let Expr::Operator { op: Op::Add, right, .. } = arena.get(root) else {
            panic!("root no longer Add");
        };
        assert_eq!(arena.get(right.unwrap()), &num("6"));
    }

    #[test]
    fn binds_always_block_folding() {
        let (arena, root) = fold_where("? + 1", FoldMode::PreResolution).unwrap();
        assert!(matches!(arena.get(root), Expr::Operator { .. }));
    }

    struct FixedResolver(Decimal);

    impl NameResolver for FixedResolver {
        fn resolve(&self, _name: &NameRef) -> Result<FoldValue> {
            Ok(FoldValue::Number(self.0))
        }
    }

    #[test]
    fn post_resolution_replaces_names_and_folds() {
        let resolver = FixedResolver("2".parse().unwrap());
        let (arena, root) =
            fold_where("x * 3", FoldMode::PostResolution(&resolver)).unwrap();
        assert_eq!(arena.get(root), &num("6"));
    }

    struct CaseInsensitive;

    impl StringComparator for CaseInsensitive {
        fn compare(&self, a: &str, b: &str) -> Ordering {
            a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase())
        }
    }

    #[test]
    fn comparator_controls_string_collation() {
        let parsed = parse_str("SELECT x WHERE 'A' = 'a'").unwrap();
        let Statement::Select(stmt) = &parsed.statement else { panic!() };
        let root = stmt.where_clause.unwrap();
        let mut arena = parsed.arena;

        fold_with(&mut arena, root, FoldMode::PreResolution, &CaseInsensitive).unwrap();
        assert_eq!(arena.get(root), &Expr::Bool(true));
    }

    #[test]
    fn fold_statement_reaches_every_clause() {
        let parsed =
            parse_str("UPDATE t SET a = 1 + 1, b = 2 * 2 WHERE 1 < 2").unwrap();
        let mut arena = parsed.arena;
        fold_statement(&parsed.statement, &mut arena, FoldMode::PreResolution).unwrap();

        let Statement::Update(stmt) = &parsed.statement else { panic!() };
        assert_eq!(arena.get(stmt.assignments[0].1), &num("2"));
        assert_eq!(arena.get(stmt.assignments[1].1), &num("4"));
        assert_eq!(arena.get(stmt.where_clause.unwrap()), &Expr::Bool(true));
    }

    #[test]
    fn fold_statement_covers_ddl_defaults_and_checks() {
        let parsed = parse_str(
            "CREATE TABLE t (a INT DEFAULT 2 + 3, CONSTRAINT c CHECK (1 + 1 = 2))",
        )
        .unwrap();
        let mut arena = parsed.arena;
        fold_statement(&parsed.statement, &mut arena, FoldMode::PreResolution).unwrap();

        let Statement::CreateTable(stmt) = &parsed.statement else { panic!() };
        let ColumnConstraint::Default(default) = stmt.columns[0].constraints[0] else {
            panic!()
        };
        assert_eq!(arena.get(default), &num("5"));
        let TableConstraint::Check { expr, .. } = stmt.constraints[0] else {
            panic!()
        };
        assert_eq!(arena.get(expr), &Expr::Bool(true));
    }
}
