//! Date-Keyed Cache Store
//!
//! In-memory snapshots partitioned by calendar date. Single-writer by
//! convention: only the owning controller mutates a partition; the rollover
//! watcher merely invalidates, which forces the next read to re-fetch.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Todo, TodoPatch};

/// A cache domain the rollover watcher can invalidate wholesale
pub trait CacheDomain: Send + Sync {
    fn invalidate_all(&self);
}

/// Per-date ordered to-do snapshots
///
/// A partition is absent until first filled; `restore` can put back either a
/// captured sequence or the absent state, which is what per-mutation rollback
/// relies on.
#[derive(Default)]
pub struct TodoCache {
    partitions: RwLock<HashMap<String, Vec<Todo>>>,
}

impl TodoCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<Todo>>> {
        self.partitions.read().expect("todo cache lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<Todo>>> {
        self.partitions.write().expect("todo cache lock poisoned")
    }

    /// Current snapshot for a date; None if never filled or invalidated
    pub fn snapshot(&self, for_date: &str) -> Option<Vec<Todo>> {
        self.read().get(for_date).cloned()
    }

    /// Number of entries currently cached for a date
    pub fn len(&self, for_date: &str) -> usize {
        self.read().get(for_date).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, for_date: &str) -> bool {
        self.len(for_date) == 0
    }

    /// Replace a partition wholesale with server truth
    pub fn fill(&self, for_date: &str, todos: Vec<Todo>) {
        self.write().insert(for_date.to_string(), todos);
    }

    /// Put back a previously captured snapshot, including the absent state
    pub fn restore(&self, for_date: &str, snapshot: Option<Vec<Todo>>) {
        let mut partitions = self.write();
        match snapshot {
            Some(todos) => {
                partitions.insert(for_date.to_string(), todos);
            }
            None => {
                partitions.remove(for_date);
            }
        }
    }

    /// Append a speculative entry
    pub fn append(&self, for_date: &str, todo: Todo) {
        self.write()
            .entry(for_date.to_string())
            .or_default()
            .push(todo);
    }

    /// Patch the entry matched by id in place
    pub fn patch(&self, for_date: &str, id: &str, patch: &TodoPatch) {
        if let Some(todos) = self.write().get_mut(for_date) {
            if let Some(todo) = todos.iter_mut().find(|t| t.id == id) {
                patch.apply_to(todo);
            }
        }
    }

    /// Remove the entry matched by id
    pub fn remove(&self, for_date: &str, id: &str) {
        if let Some(todos) = self.write().get_mut(for_date) {
            todos.retain(|t| t.id != id);
        }
    }

    /// Swap a temporary entry for the server-confirmed one
    pub fn replace_entry(&self, for_date: &str, temp_id: &str, entry: Todo) {
        if let Some(todos) = self.write().get_mut(for_date) {
            if let Some(todo) = todos.iter_mut().find(|t| t.id == temp_id) {
                *todo = entry;
            }
        }
    }

    /// Rebuild the partition in exactly the given id order; ids not present
    /// in the partition are dropped
    pub fn reorder(&self, for_date: &str, ordered_ids: &[String]) {
        if let Some(todos) = self.write().get_mut(for_date) {
            let mut by_id: HashMap<String, Todo> =
                todos.drain(..).map(|t| (t.id.clone(), t)).collect();
            *todos = ordered_ids
                .iter()
                .filter_map(|id| by_id.remove(id))
                .collect();
        }
    }

    /// Evict a single partition, forcing a re-fetch on next read
    pub fn invalidate(&self, for_date: &str) {
        self.write().remove(for_date);
    }
}

impl CacheDomain for TodoCache {
    fn invalidate_all(&self) {
        self.write().clear();
    }
}

/// One cached value per date (notes, reflections)
pub struct SlotCache<T> {
    slots: RwLock<HashMap<String, T>>,
}

impl<T: Clone> SlotCache<T> {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, for_date: &str) -> Option<T> {
        self.slots
            .read()
            .expect("slot cache lock poisoned")
            .get(for_date)
            .cloned()
    }

    pub fn put(&self, for_date: &str, value: T) {
        self.slots
            .write()
            .expect("slot cache lock poisoned")
            .insert(for_date.to_string(), value);
    }

    pub fn invalidate(&self, for_date: &str) {
        self.slots
            .write()
            .expect("slot cache lock poisoned")
            .remove(for_date);
    }
}

impl<T: Clone> Default for SlotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync> CacheDomain for SlotCache<T> {
    fn invalidate_all(&self) {
        self.slots
            .write()
            .expect("slot cache lock poisoned")
            .clear();
    }
}
