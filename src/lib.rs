//! Dayplan Core
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - store: Date-keyed cache snapshots
//! - controller: Optimistic mutation surface driven by the UI layer
//! - watcher: Local-midnight rollover invalidation

pub mod clock;
pub mod controller;
pub mod dates;
pub mod domain;
pub mod notify;
pub mod repository;
pub mod store;
pub mod watcher;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{JournalController, ProfileController, TodoController};
pub use dates::ReviewPolicy;
pub use domain::{
    DailyNote, DomainError, DomainResult, NewTodo, Profile, ProfilePatch, Reflection, Todo,
    TodoPatch,
};
pub use notify::{LogNotifier, Notifier};
pub use repository::{JournalRepository, MemoryBackend, ProfileRepository, TodoRepository};
pub use store::{CacheDomain, SlotCache, TodoCache};
pub use watcher::DateRolloverWatcher;
