use crate::data::{MonthEntry, MonthKey};
use crate::error::PickerError;
use std::collections::HashMap;

/// Insertion-ordered store of months, addressable both by key and by position.
///
/// Backed by a vector of `(key, value)` pairs plus a key → position map, so
/// both lookups are O(1) and inserts never reorder existing entries.
#[derive(Debug, Clone)]
pub struct MonthIndex<V = MonthEntry> {
    entries: Vec<(MonthKey, V)>,
    positions: HashMap<MonthKey, usize>,
}

impl<V> Default for MonthIndex<V> {
    fn default() -> Self {
        MonthIndex {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<V> MonthIndex<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        MonthIndex {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Appends `value` under `key`. Re-putting an existing key replaces the
    /// value in place and keeps its original position.
    pub fn put(&mut self, key: MonthKey, value: V) {
        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.positions.insert(key, self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: MonthKey) -> Result<&V, PickerError> {
        let pos = self.index_of(key)?;
        Ok(&self.entries[pos].1)
    }

    pub fn index_of(&self, key: MonthKey) -> Result<usize, PickerError> {
        self.positions
            .get(&key)
            .copied()
            .ok_or(PickerError::NotFound { key })
    }

    pub fn at(&self, position: usize) -> Option<&V> {
        self.entries.get(position).map(|(_, v)| v)
    }

    pub fn at_mut(&mut self, position: usize) -> Option<&mut V> {
        self.entries.get_mut(position).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MonthKey, &V)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}
