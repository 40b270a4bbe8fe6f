//! End-to-end tests: statement text in, parsed and folded trees out.

use quern::decimal::Decimal;
use quern::error::{Error, ErrorCode};
use quern::sql::{
    fold_statement, parse_str, CharSource, CollectedErrors, Expr, FoldMode, FoldValue,
    NameRef, NameResolver, Op, Parser, SelectColumn, Statement,
};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn select_pipeline_parses_and_folds() {
    let mut parsed =
        parse_str("SELECT price * qty AS total FROM orders WHERE 2 + 3 * 4 < 20 AND region = 'EU'")
            .unwrap();
    fold_statement(&parsed.statement, &mut parsed.arena, FoldMode::PreResolution).unwrap();

    let Statement::Select(stmt) = &parsed.statement else {
        panic!("expected a select");
    };
    let SelectColumn::Expr { alias, .. } = &stmt.columns[0] else {
        panic!("expected an expression column");
    };
    assert_eq!(alias.as_deref(), Some("total"));

    // The constant comparison folded to TRUE; the name comparison did
    // not fold, so the AND above it is preserved.
    let root = stmt.where_clause.unwrap();
    let Expr::Operator {
        op: Op::And, left, ..
    } = parsed.arena.get(root)
    else {
        panic!("AND should survive folding");
    };
    assert_eq!(parsed.arena.get(*left), &Expr::Bool(true));
}

#[test]
fn exact_decimal_arithmetic_flows_through_folding() {
    let mut parsed = parse_str("SELECT x WHERE 1 / 3 < 0.34").unwrap();
    fold_statement(&parsed.statement, &mut parsed.arena, FoldMode::PreResolution).unwrap();

    let Statement::Select(stmt) = &parsed.statement else { panic!() };
    assert_eq!(
        parsed.arena.get(stmt.where_clause.unwrap()),
        &Expr::Bool(true)
    );

    // 0.1 + 0.2 is exactly 0.3 in decimal arithmetic.
    let mut parsed = parse_str("SELECT x WHERE 0.1 + 0.2 = 0.3").unwrap();
    fold_statement(&parsed.statement, &mut parsed.arena, FoldMode::PreResolution).unwrap();
    let Statement::Select(stmt) = &parsed.statement else { panic!() };
    assert_eq!(
        parsed.arena.get(stmt.where_clause.unwrap()),
        &Expr::Bool(true)
    );
}

#[test]
fn projection_expressions_fold_to_literals() {
    let mut parsed = parse_str("SELECT 1 + 2 * 3, 'a' = 'a'").unwrap();
    fold_statement(&parsed.statement, &mut parsed.arena, FoldMode::PreResolution).unwrap();

    let Statement::Select(stmt) = &parsed.statement else { panic!() };
    let SelectColumn::Expr { expr, .. } = stmt.columns[0] else { panic!() };
    assert_eq!(parsed.arena.get(expr), &Expr::Number(dec("7")));
    let SelectColumn::Expr { expr, .. } = stmt.columns[1] else { panic!() };
    assert_eq!(parsed.arena.get(expr), &Expr::Bool(true));
}

#[test]
fn division_by_zero_parses_but_does_not_fold() {
    let mut parsed = parse_str("SELECT 1 / 0").unwrap();
    let err = fold_statement(&parsed.statement, &mut parsed.arena, FoldMode::PreResolution)
        .unwrap_err();
    assert_eq!(err, Error::DivisionByZero);
}

#[test]
fn division_by_zero_surfaces_from_statement_folding() {
    let mut parsed = parse_str("UPDATE t SET a = 1 / 0").unwrap();
    let err = fold_statement(&parsed.statement, &mut parsed.arena, FoldMode::PreResolution)
        .unwrap_err();
    assert_eq!(err, Error::DivisionByZero);
}

#[test]
fn insert_rows_fold_each_value() {
    let mut parsed = parse_str("INSERT INTO t (a, b) VALUES (1 + 1, 2 * 2), (10 - 3, 9)").unwrap();
    fold_statement(&parsed.statement, &mut parsed.arena, FoldMode::PreResolution).unwrap();

    let Statement::Insert(stmt) = &parsed.statement else { panic!() };
    let quern::sql::InsertSource::Values(rows) = &stmt.source else { panic!() };
    let values: Vec<_> = rows
        .iter()
        .flatten()
        .map(|&id| parsed.arena.get(id).clone())
        .collect();
    assert_eq!(
        values,
        vec![
            Expr::Number(dec("2")),
            Expr::Number(dec("4")),
            Expr::Number(dec("7")),
            Expr::Number(dec("9")),
        ]
    );
}

struct OrdersResolver;

impl NameResolver for OrdersResolver {
    fn resolve(&self, name: &NameRef) -> quern::Result<FoldValue> {
        match name.name.as_str() {
            "price" => Ok(FoldValue::Number(dec("19.99"))),
            "qty" => Ok(FoldValue::Number(dec("3"))),
            "note" => Ok(FoldValue::Null),
            other => Err(Error::DatatypeMismatch(format!("unknown column {other}"))),
        }
    }
}

#[test]
fn post_resolution_folding_uses_the_resolver() {
    let mut parsed = parse_str("SELECT x WHERE price * qty > 50").unwrap();
    fold_statement(
        &parsed.statement,
        &mut parsed.arena,
        FoldMode::PostResolution(&OrdersResolver),
    )
    .unwrap();

    let Statement::Select(stmt) = &parsed.statement else { panic!() };
    // 19.99 * 3 = 59.97 > 50
    assert_eq!(
        parsed.arena.get(stmt.where_clause.unwrap()),
        &Expr::Bool(true)
    );
}

#[test]
fn resolved_null_propagates_through_comparison() {
    let mut parsed = parse_str("SELECT x WHERE note = 'y'").unwrap();
    fold_statement(
        &parsed.statement,
        &mut parsed.arena,
        FoldMode::PostResolution(&OrdersResolver),
    )
    .unwrap();
    let Statement::Select(stmt) = &parsed.statement else { panic!() };
    assert_eq!(parsed.arena.get(stmt.where_clause.unwrap()), &Expr::Null);
}

/// A source that yields characters from somewhere other than a string
/// slice, exercising the pull boundary.
struct ChunkedSource {
    chunks: Vec<Vec<char>>,
    chunk: usize,
    offset: usize,
}

impl ChunkedSource {
    fn new(parts: &[&str]) -> Self {
        Self {
            chunks: parts.iter().map(|p| p.chars().collect()).collect(),
            chunk: 0,
            offset: 0,
        }
    }
}

impl CharSource for ChunkedSource {
    fn next_char(&mut self) -> Option<char> {
        while self.chunk < self.chunks.len() {
            if let Some(&c) = self.chunks[self.chunk].get(self.offset) {
                self.offset += 1;
                return Some(c);
            }
            self.chunk += 1;
            self.offset = 0;
        }
        None
    }
}

#[test]
fn parser_accepts_any_char_source() {
    let source = ChunkedSource::new(&["SELECT a FR", "OM t WHERE a ", "<= 5"]);
    let mut sink = CollectedErrors::new();
    let parsed = Parser::new(source, &mut sink).parse().unwrap();
    assert!(sink.is_empty());
    let Statement::Select(stmt) = parsed.statement else { panic!() };
    assert!(stmt.where_clause.is_some());
}

#[test]
fn diagnostics_are_delivered_before_the_error_returns() {
    let mut sink = CollectedErrors::new();
    let source = quern::sql::StrSource::new("SELECT 'unclosed");
    let result = Parser::new(source, &mut sink).parse();
    assert_eq!(
        result.unwrap_err(),
        Error::UnterminatedLiteral { line: 1, column: 8 }
    );
    assert_eq!(sink.reports().len(), 1);
    assert_eq!(sink.reports()[0].0, ErrorCode::UnterminatedLiteral);
    assert!(sink.reports()[0].1.contains("line 1 column 8"));
}

#[test]
fn create_table_defaults_fold_like_any_expression() {
    let mut parsed = parse_str(
        "CREATE TABLE prices (amount DECIMAL(12, 4) NOT NULL DEFAULT 100 / 8)",
    )
    .unwrap();
    fold_statement(&parsed.statement, &mut parsed.arena, FoldMode::PreResolution).unwrap();

    let Statement::CreateTable(stmt) = &parsed.statement else { panic!() };
    let quern::sql::ColumnConstraint::Default(default) = stmt.columns[0].constraints[1] else {
        panic!("expected a default");
    };
    assert_eq!(parsed.arena.get(default), &Expr::Number(dec("12.5")));
}

#[test]
fn between_folds_once_desugared() {
    let mut parsed = parse_str("SELECT x WHERE 2 + 2 BETWEEN 3 AND 5").unwrap();
    fold_statement(&parsed.statement, &mut parsed.arena, FoldMode::PreResolution).unwrap();
    let Statement::Select(stmt) = &parsed.statement else { panic!() };
    assert_eq!(
        parsed.arena.get(stmt.where_clause.unwrap()),
        &Expr::Bool(true)
    );
}

#[test]
fn numeric_literal_overflow_is_rejected_while_lexing() {
    let wide = "9".repeat(41);
    let err = parse_str(&format!("SELECT {wide}")).unwrap_err();
    assert!(matches!(err, Error::InvalidLiteral { .. }));
}
