//! In-Memory Backend
//!
//! Reference implementation of the repository traits, used by tests and as
//! the default backend until a remote one is wired in. A failure can be
//! injected for the next matching to-do operation to exercise the
//! controller's rollback paths.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{
    DailyNote, DomainError, DomainResult, NewTodo, Profile, ProfilePatch, Reflection, Todo,
    TodoPatch,
};

use super::traits::{JournalRepository, ProfileRepository, TodoRepository};

/// To-do operation kinds, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoOp {
    List,
    Create,
    Update,
    Delete,
    Reorder,
    Duplicate,
}

#[derive(Default)]
pub struct MemoryBackend {
    todos: Mutex<Vec<Todo>>,
    profile: Mutex<Option<Profile>>,
    notes: Mutex<HashMap<String, DailyNote>>,
    reflections: Mutex<HashMap<String, Reflection>>,
    next_id: AtomicU64,
    fail_next: Mutex<HashSet<TodoOp>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next occurrence of `op` fail with a persistence error
    pub fn fail_next(&self, op: TodoOp) {
        self.fail_next
            .lock()
            .expect("backend lock poisoned")
            .insert(op);
    }

    pub fn seed_profile(&self, profile: Profile) {
        *self.profile.lock().expect("backend lock poisoned") = Some(profile);
    }

    fn check_failure(&self, op: TodoOp) -> DomainResult<()> {
        if self
            .fail_next
            .lock()
            .expect("backend lock poisoned")
            .remove(&op)
        {
            return Err(DomainError::Persistence(format!(
                "injected failure for {:?}",
                op
            )));
        }
        Ok(())
    }

    fn allocate_id(&self) -> String {
        format!("srv-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl TodoRepository for MemoryBackend {
    async fn list(&self, for_date: &str) -> DomainResult<Vec<Todo>> {
        self.check_failure(TodoOp::List)?;
        let todos = self.todos.lock().expect("backend lock poisoned");
        let mut matching: Vec<Todo> = todos
            .iter()
            .filter(|t| t.for_date == for_date)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal ranks.
        matching.sort_by_key(|t| t.order);
        Ok(matching)
    }

    async fn create(&self, new_todo: &NewTodo) -> DomainResult<Todo> {
        self.check_failure(TodoOp::Create)?;
        if new_todo.title.trim().is_empty() {
            return Err(DomainError::InvalidInput("title must not be empty".into()));
        }
        let mut todos = self.todos.lock().expect("backend lock poisoned");
        let count = todos
            .iter()
            .filter(|t| t.for_date == new_todo.for_date)
            .count() as i64;
        let created = Todo {
            id: self.allocate_id(),
            title: new_todo.title.trim().to_string(),
            done: false,
            order: count * 100,
            for_date: new_todo.for_date.clone(),
            due_date: new_todo.due_date.clone(),
        };
        todos.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, patch: &TodoPatch) -> DomainResult<Todo> {
        self.check_failure(TodoOp::Update)?;
        let mut todos = self.todos.lock().expect("backend lock poisoned");
        let todo = todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("todo {}", id)))?;
        patch.apply_to(todo);
        Ok(todo.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.check_failure(TodoOp::Delete)?;
        let mut todos = self.todos.lock().expect("backend lock poisoned");
        let before = todos.len();
        todos.retain(|t| t.id != id);
        if todos.len() == before {
            return Err(DomainError::NotFound(format!("todo {}", id)));
        }
        Ok(())
    }

    async fn reorder(&self, ordered_ids: &[String]) -> DomainResult<()> {
        self.check_failure(TodoOp::Reorder)?;
        let mut todos = self.todos.lock().expect("backend lock poisoned");
        for (rank, id) in ordered_ids.iter().enumerate() {
            if let Some(todo) = todos.iter_mut().find(|t| t.id == *id) {
                todo.order = rank as i64 * 100;
            }
        }
        Ok(())
    }

    async fn duplicate_to_tomorrow(&self, id: &str, tomorrow: &str) -> DomainResult<Todo> {
        self.check_failure(TodoOp::Duplicate)?;
        let mut todos = self.todos.lock().expect("backend lock poisoned");
        let source = todos
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("todo {}", id)))?;
        let count = todos.iter().filter(|t| t.for_date == tomorrow).count() as i64;
        let copy = Todo {
            id: self.allocate_id(),
            title: source.title,
            done: false,
            order: count * 100,
            for_date: tomorrow.to_string(),
            due_date: None,
        };
        todos.push(copy.clone());
        Ok(copy)
    }
}

#[async_trait]
impl ProfileRepository for MemoryBackend {
    async fn get(&self) -> DomainResult<Option<Profile>> {
        Ok(self.profile.lock().expect("backend lock poisoned").clone())
    }

    async fn update(&self, patch: &ProfilePatch) -> DomainResult<Profile> {
        let mut guard = self.profile.lock().expect("backend lock poisoned");
        let profile = guard
            .as_mut()
            .ok_or_else(|| DomainError::NotFound("profile".into()))?;
        patch.apply_to(profile);
        Ok(profile.clone())
    }

    async fn complete_onboarding(&self, timezone: &str) -> DomainResult<Profile> {
        let mut guard = self.profile.lock().expect("backend lock poisoned");
        let profile = guard.get_or_insert_with(Profile::default);
        profile.timezone = timezone.to_string();
        profile.onboarding_completed = true;
        Ok(profile.clone())
    }
}

#[async_trait]
impl JournalRepository for MemoryBackend {
    async fn note(&self, for_date: &str) -> DomainResult<Option<DailyNote>> {
        Ok(self
            .notes
            .lock()
            .expect("backend lock poisoned")
            .get(for_date)
            .cloned())
    }

    async fn upsert_note(&self, note: &DailyNote) -> DomainResult<DailyNote> {
        self.notes
            .lock()
            .expect("backend lock poisoned")
            .insert(note.for_date.clone(), note.clone());
        Ok(note.clone())
    }

    async fn reflection(&self, for_date: &str) -> DomainResult<Option<Reflection>> {
        Ok(self
            .reflections
            .lock()
            .expect("backend lock poisoned")
            .get(for_date)
            .cloned())
    }

    async fn upsert_reflection(&self, reflection: &Reflection) -> DomainResult<Reflection> {
        self.reflections
            .lock()
            .expect("backend lock poisoned")
            .insert(reflection.for_date.clone(), reflection.clone());
        Ok(reflection.clone())
    }
}
