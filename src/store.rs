//! In-memory model storage.
//!
//! [`ModelStore`] keeps records keyed by primary key and hands out
//! [`QuerySet`] snapshots, which is all the generic views need from a
//! persistence layer.

use crate::error::Result;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// A record type served by the generic views.
pub trait Model: Clone + fmt::Debug + Send + Sync + 'static {
    /// Model name used in representations, e.g. `User`.
    const NAME: &'static str;

    /// Primary key.
    fn pk(&self) -> i64;
}

/// Thread-safe, cloneable handle to a keyed collection of records.
#[derive(Debug, Clone)]
pub struct ModelStore<M: Model> {
    records: Arc<RwLock<BTreeMap<i64, M>>>,
}

impl<M: Model> ModelStore<M> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Build a store holding `records`; later duplicates of a key win.
    pub fn from_records(records: impl IntoIterator<Item = M>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Insert or replace a record, returning the one it displaced.
    pub fn insert(&self, record: M) -> Option<M> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.pk(), record)
    }

    pub fn get(&self, pk: i64) -> Option<M> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pk)
            .cloned()
    }

    /// Snapshot of every record, ordered by primary key.
    pub fn all(&self) -> QuerySet<M> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        QuerySet::new(records.values().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M: Model + DeserializeOwned> ModelStore<M> {
    /// Load a JSON array of records from `path`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let records: Vec<M> = serde_json::from_str(&raw)?;
        Ok(Self::from_records(records))
    }
}

impl<M: Model> Default for ModelStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered snapshot of records.
#[derive(Clone, PartialEq)]
pub struct QuerySet<M> {
    items: Vec<M>,
}

impl<M: Model> QuerySet<M> {
    pub fn new(items: Vec<M>) -> Self {
        Self { items }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Keep only the records matching `predicate`.
    pub fn filter(self, predicate: impl Fn(&M) -> bool) -> Self {
        Self::new(self.items.into_iter().filter(|item| predicate(item)).collect())
    }

    pub fn get_by_pk(&self, pk: i64) -> Option<&M> {
        self.items.iter().find(|item| item.pk() == pk)
    }

    pub fn into_vec(self) -> Vec<M> {
        self.items
    }
}

impl<M: fmt::Debug> fmt::Debug for QuerySet<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.items.iter().map(|item| format!("{:?}", item)).collect();
        write!(f, "<QuerySet [{}]>", items.join(", "))
    }
}

impl<'a, M: Model> IntoIterator for &'a QuerySet<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
