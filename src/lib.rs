//! PocketDB - A pocket-sized embedded relational database engine
//!
//! This library provides the core components of the engine:
//! - SQL parsing (statement types, pattern-based parser)
//! - Storage (rows, hash indexes, constraint checks, tables, JSON documents)
//! - Statement execution (including nested-loop joins)
//! - The `Database` facade callers issue SQL through
//!
//! The supported SQL dialect is deliberately small: one surface form per
//! command, a single WHERE comparison, at most one INNER JOIN. There are no
//! transactions and no concurrent writers; every mutating statement
//! serializes all tables back to disk.

pub mod catalog;
pub mod database;
pub mod error;
pub mod executor;
pub mod sql;
pub mod storage;

pub use database::Database;
pub use error::{Error, Result};
pub use executor::QueryResult;
