//! Error types for PocketDB
//!
//! This module defines all error types used throughout the database engine.

use thiserror::Error;

/// The main error type for PocketDB
#[derive(Error, Debug)]
pub enum Error {
    // ========== Parser Errors ==========
    #[error("Parse error: {0}")]
    Parse(String),

    // ========== Table Errors ==========
    #[error("Table error: table '{0}' does not exist")]
    TableNotFound(String),

    #[error("Table error: table '{0}' already exists")]
    TableAlreadyExists(String),

    // ========== Constraint Errors ==========
    #[error("PRIMARY KEY violation: {0}")]
    PrimaryKey(String),

    #[error("UNIQUE constraint violation: value '{value}' already exists in column '{column}' of table '{table}'")]
    UniqueConstraint {
        table: String,
        column: String,
        value: String,
    },

    // ========== Storage Errors ==========
    #[error("Storage error: {0}")]
    Storage(String),

    // ========== Database Errors ==========
    #[error("Database error: {0}")]
    Database(String),
}

impl Error {
    /// Check if this error is a row-level constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Error::PrimaryKey(_) | Error::UniqueConstraint { .. })
    }
}

/// Result type alias for PocketDB operations
pub type Result<T> = std::result::Result<T, Error>;
