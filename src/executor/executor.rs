//! Statement executor for PocketDB
//!
//! Dispatches a parsed `Statement` against the table registry. Reads are
//! full scans; the join is a nested-loop inner equality join with no index
//! support.

use crate::catalog::TableSchema;
use crate::error::{Error, Result};
use crate::sql::ast::*;
use crate::storage::{Row, Table, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Result of executing a statement
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Nothing to report (CREATE TABLE, INSERT)
    None,
    /// Number of rows affected (UPDATE, DELETE)
    Count(usize),
    /// Matching rows (SELECT)
    Rows(Vec<Row>),
}

impl QueryResult {
    /// The selected rows, if this is a SELECT result
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// The affected-row count, if this is an UPDATE/DELETE result
    pub fn count(&self) -> Option<usize> {
        match self {
            QueryResult::Count(count) => Some(*count),
            _ => None,
        }
    }
}

/// Executes parsed statements against a set of tables
pub struct Executor<'a> {
    tables: &'a mut HashMap<String, Table>,
}

impl<'a> Executor<'a> {
    /// Create an executor over a table registry
    pub fn new(tables: &'a mut HashMap<String, Table>) -> Self {
        Self { tables }
    }

    /// Execute a statement
    pub fn execute(&mut self, stmt: Statement) -> Result<QueryResult> {
        match stmt {
            Statement::CreateTable(create) => self.execute_create_table(create),
            Statement::Insert(insert) => self.execute_insert(insert),
            Statement::Select(select) => self.execute_select(select),
            Statement::Update(update) => self.execute_update(update),
            Statement::Delete(delete) => self.execute_delete(delete),
        }
    }

    fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    fn execute_create_table(&mut self, create: CreateTableStatement) -> Result<QueryResult> {
        if self.tables.contains_key(&create.table_name) {
            return Err(Error::TableAlreadyExists(create.table_name));
        }

        let schema = TableSchema::new(create.columns, create.primary_key, create.unique);
        debug!(table = %create.table_name, columns = schema.column_count(), "creating table");
        self.tables.insert(
            create.table_name.clone(),
            Table::new(create.table_name, schema),
        );

        Ok(QueryResult::None)
    }

    fn execute_insert(&mut self, insert: InsertStatement) -> Result<QueryResult> {
        let table = self.table_mut(&insert.table_name)?;

        // Zip schema column order with the positional values: missing
        // trailing values become NULL, extra values are ignored.
        let mut row = Row::with_capacity(table.schema().column_count());
        let columns: Vec<String> = table.schema().column_names().map(String::from).collect();
        for (i, column) in columns.into_iter().enumerate() {
            let value = insert.values.get(i).cloned().unwrap_or(Value::Null);
            row.insert(column, value);
        }

        table.insert(row)?;
        Ok(QueryResult::None)
    }

    fn execute_select(&mut self, select: SelectStatement) -> Result<QueryResult> {
        if let Some(join) = &select.join {
            return self.execute_join(&select, join);
        }

        let table = self.table(&select.table_name)?;
        let rows = table.select(select.columns.as_deref(), select.predicate.as_ref());
        Ok(QueryResult::Rows(rows))
    }

    fn execute_update(&mut self, update: UpdateStatement) -> Result<QueryResult> {
        let table = self.table_mut(&update.table_name)?;
        let count = table.update(&update.assignments, update.predicate.as_ref())?;
        debug!(table = %update.table_name, count, "updated rows");
        Ok(QueryResult::Count(count))
    }

    fn execute_delete(&mut self, delete: DeleteStatement) -> Result<QueryResult> {
        let table = self.table_mut(&delete.table_name)?;
        let count = table.delete(delete.predicate.as_ref());
        debug!(table = %delete.table_name, count, "deleted rows");
        Ok(QueryResult::Count(count))
    }

    /// Nested-loop inner equality join.
    ///
    /// For every matching pair a merged record is built: left columns keyed
    /// `alias.column` when the left table has an alias (bare otherwise),
    /// right columns always keyed `alias.column`. The WHERE predicate runs
    /// against the merged record before projection.
    fn execute_join(&self, select: &SelectStatement, join: &JoinClause) -> Result<QueryResult> {
        let left_table = self.table(&select.table_name)?;
        let right_table = self.table(&join.table)?;
        let left_alias = select.table_alias.as_deref();

        let mut results = Vec::new();

        for left_row in left_table.rows() {
            let left_value = match left_row.get(&join.left_column) {
                Some(v) if !v.is_null() => v,
                _ => continue, // NULL never joins
            };

            for right_row in right_table.rows() {
                let matched = right_row
                    .get(&join.right_column)
                    .map_or(false, |rv| left_value.compare(rv) == Some(Ordering::Equal));
                if !matched {
                    continue;
                }

                let mut merged = Row::new();
                match left_alias {
                    Some(alias) => {
                        for (column, value) in left_row {
                            merged.insert(format!("{}.{}", alias, column), value.clone());
                        }
                    }
                    None => merged.extend(left_row.clone()),
                }
                for (column, value) in right_row {
                    merged.insert(format!("{}.{}", join.alias, column), value.clone());
                }

                if let Some(predicate) = &select.predicate {
                    if !predicate.matches(&merged) {
                        continue;
                    }
                }

                match &select.columns {
                    Some(columns) => results.push(project_joined(
                        columns,
                        &merged,
                        left_row,
                        right_row,
                        left_alias,
                        &join.alias,
                    )),
                    None => results.push(merged),
                }
            }
        }

        Ok(QueryResult::Rows(results))
    }
}

/// Resolve a join projection list against the merged record.
///
/// Each requested name tries, in order: an exact merged key; the matching
/// side when alias-qualified; the left row then the right row when bare.
/// Unresolvable names are omitted.
fn project_joined(
    columns: &[String],
    merged: &Row,
    left_row: &Row,
    right_row: &Row,
    left_alias: Option<&str>,
    right_alias: &str,
) -> Row {
    let mut projected = Row::new();

    for column in columns {
        let column = column.trim();
        if let Some(value) = merged.get(column) {
            projected.insert(column.to_string(), value.clone());
        } else if let Some((alias, name)) = column.split_once('.') {
            if Some(alias) == left_alias {
                if let Some(value) = left_row.get(name) {
                    projected.insert(column.to_string(), value.clone());
                }
            } else if alias == right_alias {
                if let Some(value) = right_row.get(name) {
                    projected.insert(column.to_string(), value.clone());
                }
            }
        } else if let Some(value) = left_row.get(column) {
            projected.insert(column.to_string(), value.clone());
        } else if let Some(value) = right_row.get(column) {
            projected.insert(column.to_string(), value.clone());
        }
    }

    projected
}
