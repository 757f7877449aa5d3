//! Constraint validation
//!
//! Stateless checks for PRIMARY KEY and UNIQUE violations, run against a
//! table's current rows before a row is inserted or updated. Equality is
//! numeric-aware, so an integer 1 collides with a float 1.0.

use super::row::{Row, Value};
use crate::catalog::TableSchema;
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Validates constraints on table operations
pub struct ConstraintValidator;

impl ConstraintValidator {
    /// Validate the PRIMARY KEY constraint for a candidate value.
    ///
    /// `exclude_pos` skips one row position from the duplicate scan; UPDATE
    /// passes the position of the row being rewritten.
    pub fn validate_primary_key(
        table_name: &str,
        primary_key_col: &str,
        new_value: Option<&Value>,
        existing_rows: &[Row],
        exclude_pos: Option<usize>,
    ) -> Result<()> {
        let new_value = match new_value {
            Some(v) if !v.is_null() => v,
            _ => {
                return Err(Error::PrimaryKey(format!(
                    "column '{}' cannot be NULL",
                    primary_key_col
                )))
            }
        };

        for (pos, row) in existing_rows.iter().enumerate() {
            if exclude_pos == Some(pos) {
                continue;
            }
            if let Some(value) = row.get(primary_key_col) {
                if value.compare(new_value) == Some(Ordering::Equal) {
                    return Err(Error::PrimaryKey(format!(
                        "value {} already exists in table '{}'",
                        new_value, table_name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Validate UNIQUE constraints for a candidate row.
    ///
    /// NULL candidates are skipped: any number of rows may hold NULL in a
    /// UNIQUE column.
    pub fn validate_unique(
        table_name: &str,
        unique_cols: &[String],
        new_row: &Row,
        existing_rows: &[Row],
        exclude_pos: Option<usize>,
    ) -> Result<()> {
        for col in unique_cols {
            let new_value = match new_row.get(col) {
                Some(v) if !v.is_null() => v,
                _ => continue,
            };

            for (pos, row) in existing_rows.iter().enumerate() {
                if exclude_pos == Some(pos) {
                    continue;
                }
                if let Some(value) = row.get(col) {
                    if value.compare(new_value) == Some(Ordering::Equal) {
                        return Err(Error::UniqueConstraint {
                            table: table_name.to_string(),
                            column: col.clone(),
                            value: new_value.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate all of a schema's constraints for a candidate row
    pub fn validate_row(
        table_name: &str,
        schema: &TableSchema,
        new_row: &Row,
        existing_rows: &[Row],
        exclude_pos: Option<usize>,
    ) -> Result<()> {
        if let Some(primary_key) = &schema.primary_key {
            Self::validate_primary_key(
                table_name,
                primary_key,
                new_row.get(primary_key),
                existing_rows,
                exclude_pos,
            )?;
        }

        if !schema.unique.is_empty() {
            Self::validate_unique(
                table_name,
                &schema.unique,
                new_row,
                existing_rows,
                exclude_pos,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;
    use indexmap::IndexMap;

    fn schema() -> TableSchema {
        let mut columns = IndexMap::new();
        columns.insert("id".to_string(), DataType::Int);
        columns.insert("email".to_string(), DataType::Varchar);
        TableSchema::new(columns, Some("id".to_string()), vec!["email".to_string()])
    }

    fn row(id: Value, email: Value) -> Row {
        let mut r = IndexMap::new();
        r.insert("id".to_string(), id);
        r.insert("email".to_string(), email);
        r
    }

    #[test]
    fn test_primary_key_rejects_null() {
        let err = ConstraintValidator::validate_primary_key("users", "id", None, &[], None)
            .unwrap_err();
        assert!(matches!(err, Error::PrimaryKey(_)));

        let err = ConstraintValidator::validate_primary_key(
            "users",
            "id",
            Some(&Value::Null),
            &[],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PrimaryKey(_)));
    }

    #[test]
    fn test_primary_key_rejects_duplicate() {
        let rows = vec![row(Value::Integer(1), Value::from("a@b.com"))];
        let err = ConstraintValidator::validate_primary_key(
            "users",
            "id",
            Some(&Value::Integer(1)),
            &rows,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PrimaryKey(_)));

        // A float that equals the stored integer collides too
        let err = ConstraintValidator::validate_primary_key(
            "users",
            "id",
            Some(&Value::Float(1.0)),
            &rows,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PrimaryKey(_)));
    }

    #[test]
    fn test_primary_key_excludes_own_row_on_update() {
        let rows = vec![row(Value::Integer(1), Value::from("a@b.com"))];
        ConstraintValidator::validate_primary_key(
            "users",
            "id",
            Some(&Value::Integer(1)),
            &rows,
            Some(0),
        )
        .unwrap();
    }

    #[test]
    fn test_unique_allows_multiple_nulls() {
        let rows = vec![
            row(Value::Integer(1), Value::Null),
            row(Value::Integer(2), Value::Null),
        ];
        let candidate = row(Value::Integer(3), Value::Null);
        ConstraintValidator::validate_row("users", &schema(), &candidate, &rows, None).unwrap();
    }

    #[test]
    fn test_unique_rejects_duplicate_non_null() {
        let rows = vec![row(Value::Integer(1), Value::from("a@b.com"))];
        let candidate = row(Value::Integer(2), Value::from("a@b.com"));
        let err = ConstraintValidator::validate_row("users", &schema(), &candidate, &rows, None)
            .unwrap_err();
        assert!(matches!(err, Error::UniqueConstraint { .. }));
    }
}
