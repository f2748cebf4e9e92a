//! TableHandle: a table that may be absent.
//!
//! Some hosts keep a table in a slot that outlives it: created lazily,
//! torn down explicitly, possibly used after teardown. `TableHandle` makes
//! that state explicit. Operations on an absent table never panic; they
//! report the misuse (see the `misuse-warnings` feature) and return a
//! harmless default.

use crate::diag::misuse;
use crate::strategy::{Djb2, IdentityEq, KeyEq, KeyHash, Word};
use crate::table::Table;

pub struct TableHandle<K, V, E = IdentityEq, H = Djb2> {
    table: Option<Table<K, V, E, H>>,
}

impl<K: Word, V> TableHandle<K, V> {
    /// Live handle over a table with the default strategies.
    pub fn create(capacity: usize) -> Self {
        Self {
            table: Some(Table::with_capacity(capacity)),
        }
    }
}

impl<K, V, E, H> TableHandle<K, V, E, H> {
    /// Handle with no table behind it.
    pub fn absent() -> Self {
        Self { table: None }
    }

    pub fn is_live(&self) -> bool {
        self.table.is_some()
    }

    pub fn table(&self) -> Option<&Table<K, V, E, H>> {
        self.table.as_ref()
    }

    pub fn table_mut(&mut self) -> Option<&mut Table<K, V, E, H>> {
        self.table.as_mut()
    }

    /// Drop the table's bookkeeping. Keys and values are dropped with it;
    /// for reference-like keys and values that never frees their referents.
    pub fn destroy(&mut self) {
        if self.table.take().is_none() {
            misuse!("destroy called on an absent table");
        }
    }
}

impl<K, V, E, H> TableHandle<K, V, E, H>
where
    E: KeyEq<K>,
    H: KeyHash<K>,
{
    /// Live handle over a table with custom strategies.
    pub fn create_with(capacity: usize, eq: E, hash: H) -> Self {
        Self {
            table: Some(Table::with_strategies(capacity, eq, hash)),
        }
    }

    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.table.as_mut() {
            Some(t) => t.put(key, value),
            None => {
                misuse!("put on an absent table");
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        match self.table.as_ref() {
            Some(t) => t.get(key),
            None => {
                misuse!("get on an absent table");
                None
            }
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        match self.table.as_ref() {
            Some(t) => t.contains_key(key),
            None => {
                misuse!("contains_key on an absent table");
                false
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        match self.table.as_mut() {
            Some(t) => t.remove(key),
            None => {
                misuse!("remove on an absent table");
                None
            }
        }
    }

    /// Entries stored, 0 when absent.
    pub fn len(&self) -> usize {
        self.table.as_ref().map_or(0, |t| t.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot count, 0 when absent.
    pub fn capacity(&self) -> usize {
        self.table.as_ref().map_or(0, |t| t.capacity())
    }
}

impl<K, V, E, H> From<Table<K, V, E, H>> for TableHandle<K, V, E, H> {
    fn from(table: Table<K, V, E, H>) -> Self {
        Self { table: Some(table) }
    }
}

impl<K, V, E, H> Default for TableHandle<K, V, E, H> {
    fn default() -> Self {
        Self::absent()
    }
}
