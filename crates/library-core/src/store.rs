//! Insertion-ordered in-memory record storage.
//!
//! Each service owns one [`Registry`] for its entity type. Records live in a
//! dense vector and a key index maps the primary key to the slot, so listing
//! queries return entries in the order they were added.

use std::collections::HashMap;

/// Exposes the primary key a record is stored under.
pub trait Keyed {
    fn key(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Keyed> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|slot| &self.entries[*slot])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        let slot = *self.index.get(key)?;
        self.entries.get_mut(slot)
    }

    /// Stores a new record. The record is handed back untouched when its key
    /// is already taken.
    pub fn insert(&mut self, record: T) -> Result<&mut T, T> {
        if self.index.contains_key(record.key()) {
            return Err(record);
        }

        let slot = self.entries.len();
        self.index.insert(record.key().to_string(), slot);
        self.entries.push(record);
        Ok(&mut self.entries[slot])
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        let slot = self.index.remove(key)?;
        let record = self.entries.remove(slot);
        for position in self.index.values_mut() {
            if *position > slot {
                *position -= 1;
            }
        }
        Some(record)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.entries.iter_mut()
    }
}
