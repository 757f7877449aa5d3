//! Storage engine module
//!
//! This module contains the in-memory and on-disk data plumbing:
//! - Rows and values
//! - Hash indexes over key columns
//! - Constraint validation
//! - Tables
//! - JSON document persistence

pub mod constraints;
pub mod disk;
pub mod index;
pub mod row;
pub mod table;

pub use constraints::ConstraintValidator;
pub use disk::Storage;
pub use index::{HashIndex, IndexManager};
pub use row::{Row, Value};
pub use table::Table;
