//! Optimistic To-Do Controller
//!
//! Each mutation follows one template: capture the partition snapshot, apply
//! the intended effect to the cache before the backend call resolves, then
//! either keep the speculative state (confirmed) or restore the snapshot
//! (rolled back), and finally re-fetch the partition either way.
//!
//! Snapshots are captured per mutation instance, not globally, so
//! overlapping in-flight mutations can only roll back their own basis.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::clock::Clock;
use crate::dates;
use crate::domain::{DomainError, DomainResult, NewTodo, Todo, TodoPatch};
use crate::notify::Notifier;
use crate::repository::TodoRepository;
use crate::store::TodoCache;

pub struct TodoController<R: TodoRepository> {
    repo: Arc<R>,
    cache: Arc<TodoCache>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    timezone: String,
    /// Pending "add" input text per date partition
    drafts: Mutex<HashMap<String, String>>,
    /// Ids already duplicated to tomorrow in this session
    moved_to_tomorrow: Mutex<HashSet<String>>,
    temp_seq: AtomicU64,
}

impl<R: TodoRepository> TodoController<R> {
    pub fn new(
        repo: Arc<R>,
        cache: Arc<TodoCache>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            cache,
            notifier,
            clock,
            timezone: timezone.into(),
            drafts: Mutex::new(HashMap::new()),
            moved_to_tomorrow: Mutex::new(HashSet::new()),
            temp_seq: AtomicU64::new(0),
        }
    }

    /// Snapshot for a date, fetching and filling the partition on first read
    pub async fn todos_for(&self, for_date: &str) -> DomainResult<Vec<Todo>> {
        if let Some(todos) = self.cache.snapshot(for_date) {
            return Ok(todos);
        }
        let todos = self.repo.list(for_date).await?;
        self.cache.fill(for_date, todos.clone());
        Ok(todos)
    }

    // ========================
    // Add-input draft state
    // ========================

    pub fn set_draft(&self, for_date: &str, text: impl Into<String>) {
        self.drafts
            .lock()
            .expect("draft lock poisoned")
            .insert(for_date.to_string(), text.into());
    }

    pub fn draft(&self, for_date: &str) -> Option<String> {
        self.drafts
            .lock()
            .expect("draft lock poisoned")
            .get(for_date)
            .cloned()
    }

    fn clear_draft(&self, for_date: &str) {
        self.drafts
            .lock()
            .expect("draft lock poisoned")
            .remove(for_date);
    }

    // ========================
    // Mutations
    // ========================

    /// Create an entry on a date partition.
    ///
    /// The synthetic entry appears in the cache immediately (temporary id,
    /// rank past the current tail) and the date's draft input is cleared; on
    /// failure the snapshot and the draft are both restored so the user can
    /// retry without retyping.
    pub async fn create(
        &self,
        for_date: &str,
        title: &str,
        due_date: Option<String>,
    ) -> DomainResult<Todo> {
        let title = title.trim();
        if title.is_empty() {
            // Rejected before any speculative write or backend call.
            return Err(DomainError::InvalidInput("title must not be empty".into()));
        }

        let previous = self.cache.snapshot(for_date);
        let temp = Todo {
            id: format!("temp-{}", self.temp_seq.fetch_add(1, Ordering::Relaxed)),
            title: title.to_string(),
            done: false,
            order: previous.as_ref().map_or(0, |t| t.len() as i64) * 100,
            for_date: for_date.to_string(),
            due_date: due_date.clone(),
        };
        let temp_id = temp.id.clone();
        self.cache.append(for_date, temp);
        self.clear_draft(for_date);

        let request = NewTodo {
            title: title.to_string(),
            for_date: for_date.to_string(),
            due_date,
        };
        let result = match self.repo.create(&request).await {
            Ok(created) => {
                self.cache.replace_entry(for_date, &temp_id, created.clone());
                Ok(created)
            }
            Err(err) => {
                self.cache.restore(for_date, previous);
                self.set_draft(for_date, title);
                self.notifier.error("Failed to create To-Do");
                log::warn!("create failed for {}: {}", for_date, err);
                Err(err)
            }
        };
        self.reconcile(for_date).await;
        result
    }

    /// Patch an entry by id
    pub async fn update(&self, for_date: &str, id: &str, patch: TodoPatch) -> DomainResult<Todo> {
        let previous = self.cache.snapshot(for_date);
        self.cache.patch(for_date, id, &patch);

        let result = match self.repo.update(id, &patch).await {
            Ok(updated) => Ok(updated),
            Err(err) => {
                self.cache.restore(for_date, previous);
                self.notifier.error("Failed to update To-Do");
                log::warn!("update failed for {}: {}", id, err);
                Err(err)
            }
        };
        self.reconcile(for_date).await;
        result
    }

    /// Delete an entry by id
    pub async fn delete(&self, for_date: &str, id: &str) -> DomainResult<()> {
        let previous = self.cache.snapshot(for_date);
        self.cache.remove(for_date, id);

        let result = match self.repo.delete(id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.cache.restore(for_date, previous);
                self.notifier.error("Failed to delete To-Do");
                log::warn!("delete failed for {}: {}", id, err);
                Err(err)
            }
        };
        self.reconcile(for_date).await;
        result
    }

    /// Rebuild the partition in the given id order
    pub async fn reorder(&self, for_date: &str, ordered_ids: Vec<String>) -> DomainResult<()> {
        let previous = self.cache.snapshot(for_date);
        self.cache.reorder(for_date, &ordered_ids);

        let result = match self.repo.reorder(&ordered_ids).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.cache.restore(for_date, previous);
                self.notifier.error("Failed to reorder To-Dos");
                log::warn!("reorder failed for {}: {}", for_date, err);
                Err(err)
            }
        };
        self.reconcile(for_date).await;
        result
    }

    /// Copy an entry onto tomorrow's partition.
    ///
    /// Not optimistic: the copy appears only after server confirmation. A
    /// repeat call for an id already moved in this session is a no-op
    /// (returns None) with an informational notice.
    pub async fn duplicate_to_tomorrow(&self, id: &str) -> DomainResult<Option<Todo>> {
        if self
            .moved_to_tomorrow
            .lock()
            .expect("moved-set lock poisoned")
            .contains(id)
        {
            self.notifier.info("This To-Do has already been moved to tomorrow");
            return Ok(None);
        }

        let tomorrow = dates::tomorrow_in(self.clock.now(), &self.timezone);
        match self.repo.duplicate_to_tomorrow(id, &tomorrow).await {
            Ok(created) => {
                self.moved_to_tomorrow
                    .lock()
                    .expect("moved-set lock poisoned")
                    .insert(id.to_string());
                self.notifier.success("To-Do duplicated to tomorrow");
                self.reconcile(&tomorrow).await;
                Ok(Some(created))
            }
            Err(err) => {
                self.notifier.error("Failed to duplicate To-Do");
                log::warn!("duplicate failed for {}: {}", id, err);
                Err(err)
            }
        }
    }

    /// Authoritative re-fetch after a mutation settles. Entries the server no
    /// longer returns are dropped; a failed fetch leaves the cache as-is and
    /// the next read or rollover picks it up.
    async fn reconcile(&self, for_date: &str) {
        match self.repo.list(for_date).await {
            Ok(todos) => self.cache.fill(for_date, todos),
            Err(err) => log::warn!("reconcile fetch failed for {}: {}", for_date, err),
        }
    }
}
