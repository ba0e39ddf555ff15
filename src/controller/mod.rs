//! Controllers
//!
//! Imperative mutation surface the UI layer drives. Each controller owns a
//! cache domain; to-do mutations are optimistic, with rollback on failure
//! and an authoritative re-fetch once the backend call settles.

mod journal;
mod profile;
mod todos;


pub use journal::JournalController;
pub use profile::ProfileController;
pub use todos::TodoController;
