//! Repository Layer
//!
//! Data access abstractions and implementations.

mod memory;
mod traits;

#[cfg(test)]
mod tests;

pub use memory::{MemoryBackend, TodoOp};
pub use traits::{JournalRepository, ProfileRepository, TodoRepository};
