//! Schema definitions for PocketDB
//!
//! A table schema is an ordered column→type map plus the key constraints.
//! Column order matters: positional `INSERT ... VALUES` maps values to
//! columns in declaration order.

use super::types::DataType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Table schema - defines the structure of a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Ordered mapping of column name to type
    pub columns: IndexMap<String, DataType>,
    /// Optional primary key column
    #[serde(default)]
    pub primary_key: Option<String>,
    /// Columns carrying a UNIQUE constraint
    #[serde(default)]
    pub unique: Vec<String>,
}

impl TableSchema {
    /// Create a new schema
    pub fn new(
        columns: IndexMap<String, DataType>,
        primary_key: Option<String>,
        unique: Vec<String>,
    ) -> Self {
        Self {
            columns,
            primary_key,
            unique,
        }
    }

    /// Get the type of a column
    pub fn column_type(&self, name: &str) -> Option<DataType> {
        self.columns.get(name).copied()
    }

    /// Check if a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns that carry a hash index (primary key and unique columns)
    pub fn indexed_columns(&self) -> impl Iterator<Item = &str> {
        self.primary_key
            .iter()
            .map(String::as_str)
            .chain(self.unique.iter().map(String::as_str))
    }

    /// Check if a column is the primary key
    pub fn is_primary_key(&self, name: &str) -> bool {
        self.primary_key.as_deref() == Some(name)
    }

    /// Check if a column carries a UNIQUE constraint
    pub fn is_unique(&self, name: &str) -> bool {
        self.unique.iter().any(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_schema() -> TableSchema {
        let mut columns = IndexMap::new();
        columns.insert("id".to_string(), DataType::Int);
        columns.insert("name".to_string(), DataType::Varchar);
        columns.insert("email".to_string(), DataType::Varchar);
        TableSchema::new(columns, Some("id".to_string()), vec!["email".to_string()])
    }

    #[test]
    fn test_schema_lookups() {
        let schema = users_schema();
        assert_eq!(schema.column_count(), 3);
        assert_eq!(schema.column_type("id"), Some(DataType::Int));
        assert_eq!(schema.column_type("missing"), None);
        assert!(schema.is_primary_key("id"));
        assert!(schema.is_unique("email"));
        assert!(!schema.is_unique("name"));

        let indexed: Vec<&str> = schema.indexed_columns().collect();
        assert_eq!(indexed, vec!["id", "email"]);
    }

    #[test]
    fn test_schema_round_trip_preserves_column_order() {
        let schema = users_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let back: TableSchema = serde_json::from_str(&json).unwrap();
        let names: Vec<&str> = back.column_names().collect();
        assert_eq!(names, vec!["id", "name", "email"]);
        assert_eq!(back.primary_key.as_deref(), Some("id"));
    }

    #[test]
    fn test_schema_missing_constraints_default() {
        let doc = r#"{"columns": {"id": "INT"}}"#;
        let schema: TableSchema = serde_json::from_str(doc).unwrap();
        assert!(schema.primary_key.is_none());
        assert!(schema.unique.is_empty());
    }
}
