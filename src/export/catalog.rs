use std::collections::HashMap;

use crate::domain::Key;

/// An insertion-ordered collection holding at most one entry per [`Key`].
///
/// Additional keys may be registered as aliases of a stored entry; they
/// answer [`Catalog::contains`] but never add an entry.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    entries: Vec<T>,
    index: HashMap<Key, usize>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Catalog<T> {
    /// Whether an entry is stored under `key` or one of its aliases.
    pub fn contains(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    /// The entry stored under `key` or one of its aliases.
    pub fn get(&self, key: &Key) -> Option<&T> {
        self.index.get(key).map(|&position| &self.entries[position])
    }

    /// Stores `entry` under `key`.
    ///
    /// Returns `false`, leaving the catalog unchanged, if `key` is already
    /// present.
    pub fn insert(&mut self, key: Key, entry: T) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Makes `alias` refer to the entry stored under `key`.
    ///
    /// Does nothing if `key` is absent or `alias` is already taken.
    pub fn alias(&mut self, alias: Key, key: &Key) {
        if let Some(&position) = self.index.get(key) {
            self.index.entry(alias).or_insert(position);
        }
    }

    /// The number of entries. Aliases are not counted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Consumes the catalog, returning the entries in insertion order.
    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }
}
