//! To-Do Entity
//!
//! A single to-do entry. Entries are partitioned by the calendar date they
//! belong to (`for_date`); within a partition `order` defines the display
//! rank, ties broken by insertion.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A to-do entry
///
/// `id` is server-assigned once confirmed. Before confirmation the
/// controller uses a locally-generated `temp-` id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier (globally unique once server-confirmed)
    pub id: String,
    /// To-do text
    pub title: String,
    /// Completion status
    pub done: bool,
    /// Display rank within the partition (sparse, multiples of 100)
    pub order: i64,
    /// Calendar date partition key (`YYYY-MM-DD`)
    pub for_date: String,
    /// Optional due date (`YYYY-MM-DD`)
    #[serde(default)]
    pub due_date: Option<String>,
}

impl Todo {
    /// Whether this entry still carries a locally-generated id pending
    /// server confirmation
    pub fn is_temporary(&self) -> bool {
        self.id.starts_with("temp-")
    }
}

impl Entity for Todo {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

/// Creation request; the server assigns `id` and `order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    pub for_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Partial update applied field-wise to an entry matched by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl TodoPatch {
    /// Patch that only toggles completion
    pub fn done(value: bool) -> Self {
        Self {
            done: Some(value),
            ..Self::default()
        }
    }

    /// Patch that only rewrites the title
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }

    /// Apply the patch to an entry in place
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(done) = self.done {
            todo.done = done;
        }
        if let Some(due_date) = &self.due_date {
            todo.due_date = Some(due_date.clone());
        }
    }
}
