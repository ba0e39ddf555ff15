//! Journal Controller
//!
//! Read-through caches for the daily note and reflection. Saves are not
//! optimistic; the slot is updated with the server-returned value once the
//! call confirms.

use std::sync::Arc;

use crate::domain::{DailyNote, DomainError, DomainResult, Reflection};
use crate::notify::Notifier;
use crate::repository::JournalRepository;
use crate::store::SlotCache;

pub struct JournalController<R: JournalRepository> {
    repo: Arc<R>,
    notes: Arc<SlotCache<DailyNote>>,
    reflections: Arc<SlotCache<Reflection>>,
    notifier: Arc<dyn Notifier>,
}

impl<R: JournalRepository> JournalController<R> {
    pub fn new(
        repo: Arc<R>,
        notes: Arc<SlotCache<DailyNote>>,
        reflections: Arc<SlotCache<Reflection>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repo,
            notes,
            reflections,
            notifier,
        }
    }

    pub async fn note_for(&self, for_date: &str) -> DomainResult<Option<DailyNote>> {
        if let Some(note) = self.notes.get(for_date) {
            return Ok(Some(note));
        }
        let note = self.repo.note(for_date).await?;
        if let Some(note) = &note {
            self.notes.put(for_date, note.clone());
        }
        Ok(note)
    }

    pub async fn save_note(&self, for_date: &str, content: &str) -> DomainResult<DailyNote> {
        let note = DailyNote {
            for_date: for_date.to_string(),
            content: content.to_string(),
        };
        match self.repo.upsert_note(&note).await {
            Ok(saved) => {
                self.notes.put(for_date, saved.clone());
                self.notifier.success("Note saved");
                Ok(saved)
            }
            Err(err) => {
                self.notifier.error("Failed to save note");
                log::warn!("note save failed for {}: {}", for_date, err);
                Err(err)
            }
        }
    }

    pub async fn reflection_for(&self, for_date: &str) -> DomainResult<Option<Reflection>> {
        if let Some(reflection) = self.reflections.get(for_date) {
            return Ok(Some(reflection));
        }
        let reflection = self.repo.reflection(for_date).await?;
        if let Some(reflection) = &reflection {
            self.reflections.put(for_date, reflection.clone());
        }
        Ok(reflection)
    }

    /// Save a reflection; an all-empty one is rejected before the backend
    /// call
    pub async fn save_reflection(&self, reflection: Reflection) -> DomainResult<Reflection> {
        if reflection.is_empty() {
            return Err(DomainError::InvalidInput(
                "fill in at least one field".into(),
            ));
        }
        let for_date = reflection.for_date.clone();
        match self.repo.upsert_reflection(&reflection).await {
            Ok(saved) => {
                self.reflections.put(&for_date, saved.clone());
                self.notifier.success("Reflection saved");
                Ok(saved)
            }
            Err(err) => {
                self.notifier.error("Failed to save reflection");
                log::warn!("reflection save failed for {}: {}", for_date, err);
                Err(err)
            }
        }
    }
}
