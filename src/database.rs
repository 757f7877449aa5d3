//! Database facade
//!
//! The single entry point callers talk to: owns the tables, loads them
//! eagerly from storage at open, routes SQL through the parser and executor,
//! and serializes every table back to disk after any mutating statement.

use crate::error::{Error, Result};
use crate::executor::{Executor, QueryResult};
use crate::sql::Parser;
use crate::storage::{Storage, Table};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An embedded database rooted at a directory of JSON table documents
#[derive(Debug)]
pub struct Database {
    root: PathBuf,
    storage: Storage,
    tables: HashMap<String, Table>,
}

impl Database {
    /// Open a database, loading every persisted table
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let root = path.into();
        let storage = Storage::open(&root)?;

        let mut tables = HashMap::new();
        for table_name in storage.list_tables() {
            if let Some((schema, rows)) = storage.load_table(&table_name)? {
                tables.insert(table_name.clone(), Table::load(table_name, schema, rows));
            }
        }

        info!(path = %root.display(), tables = tables.len(), "opened database");
        Ok(Self {
            root,
            storage,
            tables,
        })
    }

    /// Execute a SQL statement.
    ///
    /// Parse and constraint errors propagate unchanged so callers can branch
    /// on their kind. Mutating statements (CREATE TABLE, INSERT, UPDATE,
    /// DELETE) trigger a commit of every table; a commit failure is wrapped
    /// into [`Error::Database`]. SELECT never commits.
    pub fn execute(&mut self, sql: &str) -> Result<QueryResult> {
        debug!(sql, "executing statement");
        let stmt = Parser::parse(sql)?;
        let is_mutation = stmt.is_mutation();

        let result = Executor::new(&mut self.tables).execute(stmt)?;

        if is_mutation {
            self.commit()
                .map_err(|e| Error::Database(format!("error committing changes: {}", e)))?;
        }

        Ok(result)
    }

    /// Serialize every table to its JSON document
    pub fn commit(&self) -> Result<()> {
        for (table_name, table) in &self.tables {
            self.storage
                .save_table(table_name, table.schema(), table.rows())?;
        }
        debug!(tables = self.tables.len(), "committed");
        Ok(())
    }

    /// The database root directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Get a table by name
    pub fn table(&self, table_name: &str) -> Option<&Table> {
        self.tables.get(table_name)
    }

    /// List all table names
    pub fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a table exists
    pub fn table_exists(&self, table_name: &str) -> bool {
        self.tables.contains_key(table_name)
    }
}
