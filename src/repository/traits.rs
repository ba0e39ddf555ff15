//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for the persistence collaborator.
//! Implementations can use a remote API, SQLite, in-memory, etc.
//! All operations are async to support various backends.

use async_trait::async_trait;

use crate::domain::{
    DailyNote, DomainResult, NewTodo, Profile, ProfilePatch, Reflection, Todo, TodoPatch,
};

/// Persistence operations for to-do entries
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Entries for one date partition, in display order
    async fn list(&self, for_date: &str) -> DomainResult<Vec<Todo>>;

    /// Create an entry; the server assigns id and order
    async fn create(&self, new_todo: &NewTodo) -> DomainResult<Todo>;

    /// Partial update by id
    async fn update(&self, id: &str, patch: &TodoPatch) -> DomainResult<Todo>;

    /// Delete by id; fails if the id is unknown
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Persist a new display order for the given ids
    async fn reorder(&self, ordered_ids: &[String]) -> DomainResult<()>;

    /// Create a copy of the entry on the following calendar date
    async fn duplicate_to_tomorrow(&self, id: &str, tomorrow: &str) -> DomainResult<Todo>;
}

/// Persistence operations for the user profile
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get(&self) -> DomainResult<Option<Profile>>;

    /// Partial update; fails if no profile exists yet
    async fn update(&self, patch: &ProfilePatch) -> DomainResult<Profile>;

    /// Mark onboarding complete, creating the profile if necessary
    async fn complete_onboarding(&self, timezone: &str) -> DomainResult<Profile>;
}

/// Persistence operations for daily notes and reflections
#[async_trait]
pub trait JournalRepository: Send + Sync {
    async fn note(&self, for_date: &str) -> DomainResult<Option<DailyNote>>;

    async fn upsert_note(&self, note: &DailyNote) -> DomainResult<DailyNote>;

    async fn reflection(&self, for_date: &str) -> DomainResult<Option<Reflection>>;

    async fn upsert_reflection(&self, reflection: &Reflection) -> DomainResult<Reflection>;
}
