//! Table storage for PocketDB
//!
//! A table owns its rows and the hash indexes over its primary-key and
//! unique columns. All mutations run constraint checks first and keep the
//! indexes aligned with row positions.

use super::constraints::ConstraintValidator;
use super::index::IndexManager;
use super::row::{Row, Value};
use crate::catalog::{DataType, TableSchema};
use crate::error::{Error, Result};
use crate::sql::ast::{Assignment, Predicate};

/// A database table: schema, rows and their indexes
#[derive(Debug)]
pub struct Table {
    /// Table name
    name: String,
    /// Table schema
    schema: TableSchema,
    /// Ordered rows; a row's position here is its identity
    rows: Vec<Row>,
    /// Hash indexes over primary-key and unique columns
    index_manager: IndexManager,
}

impl Table {
    /// Create a new empty table
    pub fn new(name: impl Into<String>, schema: TableSchema) -> Self {
        let mut table = Self {
            name: name.into(),
            schema,
            rows: Vec::new(),
            index_manager: IndexManager::new(),
        };
        table.build_indexes();
        table
    }

    /// Create a table from persisted rows (used when loading from storage)
    pub fn load(name: impl Into<String>, schema: TableSchema, rows: Vec<Row>) -> Self {
        let mut table = Self {
            name: name.into(),
            schema,
            rows,
            index_manager: IndexManager::new(),
        };
        table.build_indexes();
        table.index_manager.rebuild_all(&table.rows);
        table
    }

    fn build_indexes(&mut self) {
        let indexed: Vec<String> = self.schema.indexed_columns().map(String::from).collect();
        for column in indexed {
            self.index_manager.create_index(&column);
        }
    }

    /// Get the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the table schema
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// All rows, in position order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Insert a row.
    ///
    /// Constraints are validated against the current rows, then every value
    /// is coerced to its column type, then the row is appended and indexed.
    pub fn insert(&mut self, row: Row) -> Result<()> {
        ConstraintValidator::validate_row(&self.name, &self.schema, &row, &self.rows, None)?;

        let row = self.coerce_row(row)?;
        self.rows.push(row);

        let pos = self.rows.len() - 1;
        let row = &self.rows[pos];
        for (column, value) in row {
            if let Some(index) = self.index_manager.get_mut(column) {
                index.add(value, pos);
            }
        }

        Ok(())
    }

    /// Select rows matching a predicate, optionally projected.
    ///
    /// Always a full scan; indexes serve constraint checks only. Projected
    /// columns missing from a row come back as NULL.
    pub fn select(&self, columns: Option<&[String]>, predicate: Option<&Predicate>) -> Vec<Row> {
        let mut results = Vec::new();

        for row in &self.rows {
            if predicate.map_or(true, |p| p.matches(row)) {
                match columns {
                    Some(cols) => {
                        let mut projected = Row::new();
                        for col in cols {
                            projected.insert(
                                col.clone(),
                                row.get(col).cloned().unwrap_or(Value::Null),
                            );
                        }
                        results.push(projected);
                    }
                    None => results.push(row.clone()),
                }
            }
        }

        results
    }

    /// Update rows matching a predicate, returning the number updated.
    ///
    /// Assignment values are coerced to their column types up front, each
    /// matching row is re-validated with the updates applied (its own
    /// position excluded from uniqueness checks), indexes are remapped from
    /// the old values, and the coerced values are stored.
    pub fn update(
        &mut self,
        assignments: &[Assignment],
        predicate: Option<&Predicate>,
    ) -> Result<usize> {
        let mut coerced = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let ty = self.schema.column_type(&assignment.column).ok_or_else(|| {
                Error::Database(format!(
                    "unknown column '{}' in UPDATE of table '{}'",
                    assignment.column, self.name
                ))
            })?;
            coerced.push((
                assignment.column.clone(),
                coerce_value(&assignment.column, ty, assignment.value.clone())?,
            ));
        }

        let mut count = 0;
        for pos in 0..self.rows.len() {
            if !predicate.map_or(true, |p| p.matches(&self.rows[pos])) {
                continue;
            }

            let mut candidate = self.rows[pos].clone();
            for (column, value) in &coerced {
                candidate.insert(column.clone(), value.clone());
            }
            ConstraintValidator::validate_row(
                &self.name,
                &self.schema,
                &candidate,
                &self.rows,
                Some(pos),
            )?;

            for (column, value) in &coerced {
                let old_value = self.rows[pos].get(column).cloned().unwrap_or(Value::Null);
                if let Some(index) = self.index_manager.get_mut(column) {
                    index.update(&old_value, value, pos);
                }
            }

            self.rows[pos] = candidate;
            count += 1;
        }

        Ok(count)
    }

    /// Delete rows matching a predicate, returning the number deleted.
    ///
    /// Matching positions are removed in reverse order so earlier positions
    /// stay valid during removal; afterwards every index is rebuilt once,
    /// because the positions of all subsequent rows have shifted.
    pub fn delete(&mut self, predicate: Option<&Predicate>) -> usize {
        let matching: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| predicate.map_or(true, |p| p.matches(row)))
            .map(|(pos, _)| pos)
            .collect();

        for &pos in matching.iter().rev() {
            self.rows.remove(pos);
        }

        if !matching.is_empty() {
            self.index_manager.rebuild_all(&self.rows);
        }

        matching.len()
    }

    fn coerce_row(&self, row: Row) -> Result<Row> {
        let mut coerced = Row::with_capacity(row.len());
        for (column, value) in row {
            let value = match self.schema.column_type(&column) {
                Some(ty) => coerce_value(&column, ty, value)?,
                None => value,
            };
            coerced.insert(column, value);
        }
        Ok(coerced)
    }
}

/// Coerce a value to a column's declared type.
///
/// NULL passes through untouched. A string that cannot be read as the target
/// numeric type is an error.
fn coerce_value(column: &str, ty: DataType, value: Value) -> Result<Value> {
    let coerced = match (ty, value) {
        (_, Value::Null) => Value::Null,

        (DataType::Int, value @ Value::Integer(_)) => value,
        (DataType::Int, Value::Float(f)) => Value::Integer(f as i64),
        (DataType::Int, Value::Boolean(b)) => Value::Integer(b as i64),
        (DataType::Int, Value::String(s)) => match s.trim().parse() {
            Ok(i) => Value::Integer(i),
            Err(_) => {
                return Err(Error::Database(format!(
                    "cannot convert '{}' to INT for column '{}'",
                    s, column
                )))
            }
        },

        (DataType::Float, value @ Value::Float(_)) => value,
        (DataType::Float, Value::Integer(i)) => Value::Float(i as f64),
        (DataType::Float, Value::Boolean(b)) => Value::Float(b as i64 as f64),
        (DataType::Float, Value::String(s)) => match s.trim().parse() {
            Ok(f) => Value::Float(f),
            Err(_) => {
                return Err(Error::Database(format!(
                    "cannot convert '{}' to FLOAT for column '{}'",
                    s, column
                )))
            }
        },

        (DataType::Boolean, value @ Value::Boolean(_)) => value,
        (DataType::Boolean, Value::String(s)) => {
            let s = s.to_ascii_lowercase();
            Value::Boolean(s == "true" || s == "1" || s == "yes")
        }
        (DataType::Boolean, Value::Integer(i)) => Value::Boolean(i != 0),
        (DataType::Boolean, Value::Float(f)) => Value::Boolean(f != 0.0),

        (DataType::Varchar, value @ Value::String(_)) => value,
        (DataType::Varchar, other) => Value::String(other.to_string()),
    };

    Ok(coerced)
}
