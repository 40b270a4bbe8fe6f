//! # Abstract Syntax Tree
//!
//! Statements are owned trees; expressions live in a per-statement
//! [`ExprArena`] and refer to each other through [`ExprId`] indices.
//! The arena keeps handles stable while it grows and lets the constant
//! folder rewrite nodes in place, so a folded subtree simply becomes a
//! literal node under the same id.
//!
//! ## Expression Shape
//!
//! ```text
//! WHERE price * qty > 100 AND region = 'EU'
//!
//!              And
//!             /   \
//!           Gt     Eq
//!          /  \   /  \
//!        Mul 100 region 'EU'
//!       /   \
//!   price   qty
//! ```
//!
//! Every operator node owns its children exclusively; no subtree is
//! shared between two parents. Rewrites rely on this: replacing a node
//! can never change an unrelated expression. Nodes orphaned by a
//! rewrite stay allocated until the arena is dropped with its
//! statement.
//!
//! Allocation is capped at [`MAX_EXPR_NODES`]; a statement that needs
//! more nodes fails with `OutOfMemory` instead of growing without
//! bound.

use super::token::BindVar;
use crate::config::MAX_EXPR_NODES;
use crate::decimal::Decimal;
use crate::error::{Error, Result};

/// Handle to an expression node in an [`ExprArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(u32);

impl ExprId {
    /// Stand-in for a child slot not yet filled during parsing. Never
    /// escapes the parser: every returned expression is complete.
    pub(crate) const PLACEHOLDER: ExprId = ExprId(u32::MAX);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Binary and unary operators, ordered by the expression grammar's
/// seven precedence levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Mul,
    Div,
    Add,
    Sub,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Is,
    IsNot,
    Not,
    And,
    Or,
}

impl Op {
    /// Precedence level, 1 = binds tightest, 7 = loosest.
    pub fn level(self) -> u8 {
        match self {
            Op::Mul | Op::Div => 1,
            Op::Add | Op::Sub => 2,
            Op::Eq | Op::Ne | Op::Lt | Op::Le | Op::Gt | Op::Ge => 3,
            Op::Is | Op::IsNot => 4,
            Op::Not => 5,
            Op::And => 6,
            Op::Or => 7,
        }
    }

    pub fn is_unary(self) -> bool {
        self == Op::Not
    }
}

/// A possibly-qualified name (`price` or `orders.price`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRef {
    pub qualifier: Option<String>,
    pub name: String,
}

/// One expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Decimal),
    Str(String),
    Bool(bool),
    Null,
    Name(NameRef),
    Bind(BindVar),
    Operator {
        op: Op,
        left: ExprId,
        /// `None` for unary operators.
        right: Option<ExprId>,
    },
}

impl Expr {
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expr::Number(_) | Expr::Str(_) | Expr::Bool(_) | Expr::Null
        )
    }
}

/// Growable node store for one statement's expressions.
#[derive(Debug, Default)]
pub struct ExprArena {
    nodes: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, expr: Expr) -> Result<ExprId> {
        if self.nodes.len() >= MAX_EXPR_NODES {
            return Err(Error::OutOfMemory(format!(
                "expression arena exceeded {MAX_EXPR_NODES} nodes"
            )));
        }
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(expr);
        Ok(id)
    }

    pub fn get(&self, id: ExprId) -> &Expr {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Structurally copies the subtree under `id` into fresh nodes,
    /// preserving the invariant that no node has two parents.
    pub fn deep_copy(&mut self, id: ExprId) -> Result<ExprId> {
        let copy = match self.get(id).clone() {
            Expr::Operator { op, left, right } => {
                let left = self.deep_copy(left)?;
                let right = match right {
                    Some(r) => Some(self.deep_copy(r)?),
                    None => None,
                };
                Expr::Operator { op, left, right }
            }
            leaf => leaf,
        };
        self.alloc(copy)
    }
}

/// Sort direction in `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// `NULLS FIRST` / `NULLS LAST` placement; `None` keeps the engine
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub expr: ExprId,
    pub direction: SortDirection,
    pub nulls: Option<NullsOrder>,
}

/// One entry of a select list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumn {
    /// Bare `*`.
    Wildcard,
    Expr { expr: ExprId, alias: Option<String> },
}

/// A table name with optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub left: FromClause,
    pub kind: JoinKind,
    pub right: TableRef,
    /// `None` only for cross joins; every other kind requires `ON`.
    pub condition: Option<ExprId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FromClause {
    Table(TableRef),
    Join(Box<JoinClause>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

/// A compound-select link: `<head> UNION [ALL] <right>`. Chains lean
/// right; the head statement carries any trailing `ORDER BY`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOperation {
    pub op: SetOpKind,
    pub all: bool,
    pub right: Box<SelectStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    pub distinct: bool,
    pub columns: Vec<SelectColumn>,
    pub from: Option<FromClause>,
    pub where_clause: Option<ExprId>,
    pub group_by: Vec<ExprId>,
    pub having: Option<ExprId>,
    pub set_op: Option<SetOperation>,
    pub order_by: Vec<OrderByItem>,
}

/// Where an INSERT gets its rows from: literal VALUES tuples or a
/// nested query.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    Values(Vec<Vec<ExprId>>),
    Select(Box<SelectStmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    pub table: String,
    pub columns: Vec<String>,
    pub source: InsertSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    pub table: String,
    pub assignments: Vec<(String, ExprId)>,
    pub where_clause: Option<ExprId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub table: String,
    pub where_clause: Option<ExprId>,
}

/// Column data types. Width arguments are optional where SQL allows
/// them to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    SmallInt,
    BigInt,
    Decimal(Option<u32>, Option<u32>),
    Varchar(Option<u32>),
    Char(Option<u32>),
    Text,
    Boolean,
    Float,
    Double,
    Date,
    Time,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    NoAction,
    SetNull,
    SetDefault,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    NotNull,
    Null,
    Unique,
    PrimaryKey,
    Default(ExprId),
    Check(ExprId),
    References {
        table: String,
        column: Option<String>,
        on_delete: Option<ReferentialAction>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    PrimaryKey {
        name: Option<String>,
        columns: Vec<String>,
    },
    Unique {
        name: Option<String>,
        columns: Vec<String>,
    },
    ForeignKey {
        name: Option<String>,
        columns: Vec<String>,
        ref_table: String,
        ref_columns: Vec<String>,
        on_delete: Option<ReferentialAction>,
    },
    Check {
        name: Option<String>,
        expr: ExprId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStmt {
    pub name: String,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTableStmt {
    pub name: String,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlterTableAction {
    AddColumn(ColumnDef),
    AddConstraint(TableConstraint),
    SetDefault { column: String, value: ExprId },
    DropDefault { column: String },
    SetNotNull { column: String },
    DropNotNull { column: String },
    ModifyColumn { column: String, data_type: DataType },
    DropColumn { column: String },
    DropConstraint { name: String },
    RenameColumn { from: String, to: String },
    RenameConstraint { from: String, to: String },
    RenameTable { to: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableStmt {
    pub name: String,
    pub action: AlterTableAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateDatabaseStmt {
    pub name: String,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropDatabaseStmt {
    pub name: String,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
    CreateTable(CreateTableStmt),
    DropTable(DropTableStmt),
    AlterTable(AlterTableStmt),
    CreateDatabase(CreateDatabaseStmt),
    DropDatabase(DropDatabaseStmt),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_hands_out_sequential_ids() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::Null).unwrap();
        let b = arena.alloc(Expr::Bool(true)).unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(arena.get(b), &Expr::Bool(true));
    }

    #[test]
    fn nodes_can_be_rewritten_in_place() {
        let mut arena = ExprArena::new();
        let id = arena.alloc(Expr::Null).unwrap();
        *arena.get_mut(id) = Expr::Bool(false);
        assert_eq!(arena.get(id), &Expr::Bool(false));
    }

    #[test]
    fn deep_copy_duplicates_every_node() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::Number("1".parse().unwrap())).unwrap();
        let b = arena.alloc(Expr::Number("2".parse().unwrap())).unwrap();
        let add = arena
            .alloc(Expr::Operator {
                op: Op::Add,
                left: a,
                right: Some(b),
            })
            .unwrap();
        let copy = arena.deep_copy(add).unwrap();
        assert_ne!(copy, add);
        let Expr::Operator { left, right, .. } = *arena.get(copy) else {
            panic!("copy is not an operator");
        };
        assert_ne!(left, a);
        assert_ne!(right.unwrap(), b);

        // Mutating the copy leaves the original untouched.
        *arena.get_mut(left) = Expr::Null;
        assert_eq!(arena.get(a), &Expr::Number("1".parse().unwrap()));
    }
}
