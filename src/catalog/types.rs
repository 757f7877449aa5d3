//! Data types for PocketDB
//!
//! This module defines the SQL data types supported by the database.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL Data Types
///
/// Persisted table documents spell these the way SQL does (`"INT"`,
/// `"VARCHAR"`, ...), so the serde names match the SQL keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit integer
    #[serde(rename = "INT")]
    Int,
    /// 64-bit floating point
    #[serde(rename = "FLOAT")]
    Float,
    /// Variable-length character string
    #[serde(rename = "VARCHAR")]
    Varchar,
    /// Boolean type
    #[serde(rename = "BOOLEAN")]
    Boolean,
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "INT" => Ok(DataType::Int),
            "FLOAT" => Ok(DataType::Float),
            "VARCHAR" => Ok(DataType::Varchar),
            "BOOLEAN" => Ok(DataType::Boolean),
            other => Err(Error::Parse(format!("unknown column type '{}'", other))),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "INT"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Varchar => write!(f, "VARCHAR"),
            DataType::Boolean => write!(f, "BOOLEAN"),
        }
    }
}
