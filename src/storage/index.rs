//! Hash indexes for constraint checks
//!
//! One `HashIndex` exists per primary-key or unique column, mapping an
//! indexed value to the set of row positions holding it. NULL is never
//! stored. Indexes track row positions, so they must be rebuilt whenever
//! positions shift (after DELETE).

use super::row::{Row, Value};
use std::collections::{HashMap, HashSet};

/// Hash-based index over a single column
#[derive(Debug, Default)]
pub struct HashIndex {
    /// Name of the indexed column
    column: String,
    /// Indexed value → positions of rows holding it
    entries: HashMap<Value, HashSet<usize>>,
}

impl HashIndex {
    /// Create a new empty index for a column
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            entries: HashMap::new(),
        }
    }

    /// Name of the indexed column
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Rebuild the index from scratch over the given rows
    pub fn build(&mut self, rows: &[Row]) {
        self.entries.clear();
        for (pos, row) in rows.iter().enumerate() {
            if let Some(value) = row.get(&self.column) {
                self.add(value, pos);
            }
        }
    }

    /// Add a value at a row position; NULL is ignored
    pub fn add(&mut self, value: &Value, pos: usize) {
        if value.is_null() {
            return;
        }
        self.entries.entry(value.clone()).or_default().insert(pos);
    }

    /// Remove a value at a row position
    pub fn remove(&mut self, value: &Value, pos: usize) {
        if let Some(positions) = self.entries.get_mut(value) {
            positions.remove(&pos);
            if positions.is_empty() {
                self.entries.remove(value);
            }
        }
    }

    /// Remap a position from an old value to a new one
    pub fn update(&mut self, old_value: &Value, new_value: &Value, pos: usize) {
        self.remove(old_value, pos);
        self.add(new_value, pos);
    }

    /// Find row positions holding a value
    pub fn find(&self, value: &Value) -> HashSet<usize> {
        self.entries.get(value).cloned().unwrap_or_default()
    }

    /// Clear the index
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Manages the hash indexes of a single table
#[derive(Debug, Default)]
pub struct IndexManager {
    indexes: HashMap<String, HashIndex>,
}

impl IndexManager {
    /// Create a new empty index manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index on a column (no-op if one already exists)
    pub fn create_index(&mut self, column: &str) {
        self.indexes
            .entry(column.to_string())
            .or_insert_with(|| HashIndex::new(column));
    }

    /// Get the index for a column
    pub fn get(&self, column: &str) -> Option<&HashIndex> {
        self.indexes.get(column)
    }

    /// Get the index for a column, mutably
    pub fn get_mut(&mut self, column: &str) -> Option<&mut HashIndex> {
        self.indexes.get_mut(column)
    }

    /// Check if an index exists for a column
    pub fn has_index(&self, column: &str) -> bool {
        self.indexes.contains_key(column)
    }

    /// Rebuild every index from the given rows
    pub fn rebuild_all(&mut self, rows: &[Row]) {
        for index in self.indexes.values_mut() {
            index.build(rows);
        }
    }

    /// Clear every index
    pub fn clear_all(&mut self) {
        for index in self.indexes.values_mut() {
            index.clear();
        }
    }
}
