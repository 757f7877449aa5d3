//! SQL statement types
//!
//! Each supported command has one surface form and one payload struct. The
//! executor dispatches over `Statement` with an exhaustive match.

use crate::catalog::DataType;
use crate::storage::{Row, Value};
use indexmap::IndexMap;
use std::cmp::Ordering;

/// A parsed SQL statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// CREATE TABLE statement
    CreateTable(CreateTableStatement),
    /// INSERT statement
    Insert(InsertStatement),
    /// SELECT statement
    Select(SelectStatement),
    /// UPDATE statement
    Update(UpdateStatement),
    /// DELETE statement
    Delete(DeleteStatement),
}

impl Statement {
    /// Whether executing this statement mutates database state.
    ///
    /// Mutating statements trigger a full commit after execution.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Statement::Select(_))
    }
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    /// Table name
    pub table_name: String,
    /// Ordered column definitions
    pub columns: IndexMap<String, DataType>,
    /// Primary key column, if any
    pub primary_key: Option<String>,
    /// Columns carrying a UNIQUE constraint
    pub unique: Vec<String>,
}

/// INSERT statement
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Target table name
    pub table_name: String,
    /// Positional values, matched to schema columns in declared order
    pub values: Vec<Value>,
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Table to read from
    pub table_name: String,
    /// Optional alias for the table
    pub table_alias: Option<String>,
    /// Projection list; `None` means `*`
    pub columns: Option<Vec<String>>,
    /// Optional WHERE predicate
    pub predicate: Option<Predicate>,
    /// Optional JOIN clause
    pub join: Option<JoinClause>,
}

/// INNER JOIN clause of a SELECT
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// Right-hand table name
    pub table: String,
    /// Right-hand table alias (mandatory)
    pub alias: String,
    /// Join column on the left table
    pub left_column: String,
    /// Join column on the right table
    pub right_column: String,
}

/// UPDATE statement
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Target table name
    pub table_name: String,
    /// SET clause assignments, in written order
    pub assignments: Vec<Assignment>,
    /// Optional WHERE predicate
    pub predicate: Option<Predicate>,
}

/// Column assignment (for UPDATE)
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Column name
    pub column: String,
    /// New value
    pub value: Value,
}

/// DELETE statement
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// Target table name
    pub table_name: String,
    /// Optional WHERE predicate
    pub predicate: Option<Predicate>,
}

/// Comparison operator of a WHERE predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Ge,
    Le,
    Ne,
    Eq,
    Gt,
    Lt,
}

/// The single-comparison WHERE condition, evaluated per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Column whose value is compared
    pub column: String,
    /// Comparison operator
    pub op: CompareOp,
    /// Right-hand literal
    pub value: Value,
}

impl Predicate {
    /// Evaluate the predicate against a row.
    ///
    /// A row with NULL (or no value at all) in the compared column never
    /// satisfies any operator, `!=` included. Non-null values of
    /// incomparable types satisfy only `!=`.
    pub fn matches(&self, row: &Row) -> bool {
        let row_value = match row.get(&self.column) {
            Some(v) if !v.is_null() => v,
            _ => return false,
        };

        match (self.op, row_value.compare(&self.value)) {
            (CompareOp::Eq, ord) => ord == Some(Ordering::Equal),
            (CompareOp::Ne, Some(ord)) => ord != Ordering::Equal,
            (CompareOp::Ne, None) => true,
            (CompareOp::Gt, ord) => ord == Some(Ordering::Greater),
            (CompareOp::Lt, ord) => ord == Some(Ordering::Less),
            (CompareOp::Ge, Some(ord)) => ord != Ordering::Less,
            (CompareOp::Le, Some(ord)) => ord != Ordering::Greater,
            (_, None) => false,
        }
    }
}
