//! Domain Layer
//!
//! Core entities and business rules.

mod entity;
mod journal;
mod profile;
mod todo;

pub use entity::{DomainError, DomainResult, Entity};
pub use journal::{DailyNote, Reflection};
pub use profile::{Profile, ProfilePatch};
pub use todo::{NewTodo, Todo, TodoPatch};
