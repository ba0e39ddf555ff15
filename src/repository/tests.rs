//! Repository Integration Tests
//!
//! Tests for the in-memory backend implementation of the repository traits.

#[cfg(test)]
mod tests {
    use crate::domain::{DailyNote, DomainError, NewTodo, Reflection, TodoPatch};
    use crate::repository::{
        JournalRepository, MemoryBackend, ProfileRepository, TodoRepository,
    };

    fn new_todo(title: &str, for_date: &str) -> NewTodo {
        NewTodo {
            title: title.to_string(),
            for_date: for_date.to_string(),
            due_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_sparse_order() {
        let backend = MemoryBackend::new();

        let first = backend
            .create(&new_todo("Buy milk", "2024-06-01"))
            .await
            .expect("Failed to create");
        let second = backend
            .create(&new_todo("Walk dog", "2024-06-01"))
            .await
            .expect("Failed to create");

        assert_eq!(first.id, "srv-1");
        assert_eq!(first.order, 0);
        assert_eq!(second.order, 100);
        assert!(!first.done);
    }

    #[tokio::test]
    async fn test_list_is_partitioned_and_ordered() {
        let backend = MemoryBackend::new();
        backend.create(&new_todo("a", "2024-06-01")).await.unwrap();
        backend.create(&new_todo("b", "2024-06-02")).await.unwrap();
        backend.create(&new_todo("c", "2024-06-01")).await.unwrap();

        let todos = backend.list("2024-06-01").await.expect("List failed");
        let titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_update_patches_fields() {
        let backend = MemoryBackend::new();
        let created = backend.create(&new_todo("Original", "2024-06-01")).await.unwrap();

        let updated = TodoRepository::update(&backend, &created.id, &TodoPatch::done(true))
            .await
            .expect("Update failed");
        assert!(updated.done);
        assert_eq!(updated.title, "Original");
    }

    #[tokio::test]
    async fn test_delete_unknown_id_fails() {
        let backend = MemoryBackend::new();
        let created = backend.create(&new_todo("To delete", "2024-06-01")).await.unwrap();

        backend.delete(&created.id).await.expect("Delete failed");
        let err = backend.delete(&created.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reorder_rewrites_ranks() {
        let backend = MemoryBackend::new();
        let a = backend.create(&new_todo("a", "2024-06-01")).await.unwrap();
        let b = backend.create(&new_todo("b", "2024-06-01")).await.unwrap();

        backend
            .reorder(&[b.id.clone(), a.id.clone()])
            .await
            .expect("Reorder failed");

        let todos = backend.list("2024-06-01").await.unwrap();
        let ids: Vec<&str> = todos.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![b.id.as_str(), a.id.as_str()]);
    }

    #[tokio::test]
    async fn test_duplicate_lands_on_tomorrow() {
        let backend = MemoryBackend::new();
        let source = backend.create(&new_todo("Review PR", "2024-06-01")).await.unwrap();

        let copy = backend
            .duplicate_to_tomorrow(&source.id, "2024-06-02")
            .await
            .expect("Duplicate failed");

        assert_eq!(copy.title, "Review PR");
        assert_eq!(copy.for_date, "2024-06-02");
        assert_ne!(copy.id, source.id);
        assert!(!copy.done);
    }

    #[tokio::test]
    async fn test_profile_update_requires_existing() {
        let backend = MemoryBackend::new();

        let err = ProfileRepository::update(&backend, &crate::domain::ProfilePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let profile = backend
            .complete_onboarding("America/New_York")
            .await
            .expect("Onboarding failed");
        assert!(profile.onboarding_completed);
        assert_eq!(profile.timezone, "America/New_York");
    }

    #[tokio::test]
    async fn test_journal_upserts() {
        let backend = MemoryBackend::new();

        let note = DailyNote {
            for_date: "2024-06-01".to_string(),
            content: "first".to_string(),
        };
        backend.upsert_note(&note).await.unwrap();
        backend
            .upsert_note(&DailyNote {
                content: "second".to_string(),
                ..note.clone()
            })
            .await
            .unwrap();

        let stored = backend.note("2024-06-01").await.unwrap().unwrap();
        assert_eq!(stored.content, "second");

        let reflection = Reflection {
            for_date: "2024-06-01".to_string(),
            what_went_well: Some("shipped".to_string()),
            ..Default::default()
        };
        backend.upsert_reflection(&reflection).await.unwrap();
        assert!(backend.reflection("2024-06-01").await.unwrap().is_some());
        assert!(backend.reflection("2024-06-02").await.unwrap().is_none());
    }
}
