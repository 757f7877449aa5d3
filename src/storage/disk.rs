//! JSON document storage
//!
//! Each table persists as one pretty-printed JSON document named
//! `<table>.json` under the database root directory:
//! `{"schema": {...}, "rows": [...]}`. Writes are direct overwrites.

use super::row::Row;
use crate::catalog::TableSchema;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk shape of a table document
#[derive(Debug, Serialize, Deserialize)]
struct TableDocument {
    schema: TableSchema,
    rows: Vec<Row>,
}

/// Handles saving and loading tables as JSON documents
#[derive(Debug)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Open storage rooted at a directory, creating it if absent
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            Error::Storage(format!(
                "failed to create database directory '{}': {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    /// The database root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_file(&self, table_name: &str) -> PathBuf {
        self.root.join(format!("{}.json", table_name))
    }

    /// Save a table's schema and rows to its JSON document
    pub fn save_table(&self, table_name: &str, schema: &TableSchema, rows: &[Row]) -> Result<()> {
        let document = TableDocument {
            schema: schema.clone(),
            rows: rows.to_vec(),
        };
        let json = serde_json::to_string_pretty(&document).map_err(|e| {
            Error::Storage(format!("failed to serialize table {}: {}", table_name, e))
        })?;
        fs::write(self.table_file(table_name), json).map_err(|e| {
            Error::Storage(format!("failed to save table {}: {}", table_name, e))
        })?;

        debug!(table = table_name, rows = rows.len(), "saved table");
        Ok(())
    }

    /// Load a table's schema and rows; `None` if no document exists
    pub fn load_table(&self, table_name: &str) -> Result<Option<(TableSchema, Vec<Row>)>> {
        let path = self.table_file(table_name);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| {
            Error::Storage(format!("failed to load table {}: {}", table_name, e))
        })?;
        let document: TableDocument = serde_json::from_str(&json).map_err(|e| {
            Error::Storage(format!("failed to load table {}: {}", table_name, e))
        })?;

        debug!(table = table_name, rows = document.rows.len(), "loaded table");
        Ok(Some((document.schema, document.rows)))
    }

    /// Check if a table document exists
    pub fn table_exists(&self, table_name: &str) -> bool {
        self.table_file(table_name).exists()
    }

    /// Delete a table document if it exists
    pub fn delete_table(&self, table_name: &str) -> Result<()> {
        let path = self.table_file(table_name);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                Error::Storage(format!("failed to delete table {}: {}", table_name, e))
            })?;
        }
        Ok(())
    }

    /// Table names discovered from existing documents
    pub fn list_tables(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut tables = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    tables.push(stem.to_string());
                }
            }
        }
        tables.sort();
        tables
    }
}
