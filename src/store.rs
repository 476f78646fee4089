//! In-memory task storage.
//!
//! The store owns the authoritative task collection. All mutations go through
//! its methods, and every operation takes the single collection lock, so ids
//! stay unique and insertion order is preserved even on a multi-threaded
//! runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Title was empty or whitespace-only after trimming.
    #[error("Task title is required")]
    EmptyTitle,

    /// No task with the given id exists in the collection.
    #[error("Task not found")]
    NotFound,
}

/// A single to-do item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned at creation and immutable afterwards.
    pub id: Uuid,

    /// Display text. Never empty or whitespace-only.
    pub title: String,

    /// Whether the task has been completed.
    pub completed: bool,

    /// Creation timestamp (ISO 8601 on the wire), immutable.
    pub created_at: DateTime<Utc>,
}

/// Partial update applied to an existing task.
///
/// Fields are independent: a patch may change the title, the completed flag,
/// or both. Absent fields leave the record untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// In-memory store for the task collection.
///
/// Tasks are kept in insertion order; updates mutate records in place and
/// never reorder the collection.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
        }
    }

    /// Return a snapshot of the full collection in insertion order.
    pub async fn list(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// Create a new task from a title.
    ///
    /// The title is trimmed; an empty result fails with
    /// [`StoreError::EmptyTitle`] and nothing is stored.
    pub async fn create(&self, title: &str) -> Result<Task, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed: false,
            created_at: Utc::now(),
        };

        let mut tasks = self.tasks.write().await;
        tasks.push(task.clone());
        tracing::debug!("Created task {}", task.id);
        Ok(task)
    }

    /// Apply a partial update to an existing task and return the new record.
    ///
    /// A patched title is trimmed and must be non-empty, same rule as
    /// [`create`](Self::create). Validation happens before any field is
    /// written, so a rejected patch leaves the record untouched.
    pub async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;

        let title = match patch.title.as_deref().map(str::trim) {
            Some("") => return Err(StoreError::EmptyTitle),
            other => other,
        };

        if let Some(title) = title {
            task.title = title.to_string();
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }

        tracing::debug!("Updated task {}", task.id);
        Ok(task.clone())
    }

    /// Remove a task from the collection.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;

        tasks.remove(index);
        tracing::debug!("Deleted task {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_unique_ids_and_defaults() {
        let store = TaskStore::new();
        let a = store.create("Buy milk").await.unwrap();
        let b = store.create("Walk dog").await.unwrap();

        assert_ne!(a.id, b.id);
        assert!(!a.completed);
        assert!(!b.completed);
    }

    #[tokio::test]
    async fn create_trims_title() {
        let store = TaskStore::new();
        let task = store.create("  Buy milk  ").await.unwrap();
        assert_eq!(task.title, "Buy milk");

        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Buy milk");
    }

    #[tokio::test]
    async fn create_rejects_blank_title_without_mutation() {
        let store = TaskStore::new();

        for title in ["", "   ", "\t\n"] {
            let err = store.create(title).await.unwrap_err();
            assert!(matches!(err, StoreError::EmptyTitle));
        }

        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn update_completed_leaves_other_fields_alone() {
        let store = TaskStore::new();
        let task = store.create("Buy milk").await.unwrap();

        let updated = store
            .update(
                task.id,
                TaskPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, task.title);
        assert_eq!(updated.created_at, task.created_at);

        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert!(listed[0].completed);
    }

    #[tokio::test]
    async fn update_title_and_completed_apply_independently() {
        let store = TaskStore::new();
        let task = store.create("Buy milk").await.unwrap();

        let renamed = store
            .update(
                task.id,
                TaskPatch {
                    title: Some("Buy oat milk".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.title, "Buy oat milk");
        assert!(!renamed.completed);

        let done = store
            .update(
                task.id,
                TaskPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(done.title, "Buy oat milk");
        assert!(done.completed);
    }

    #[tokio::test]
    async fn update_rejects_blank_title() {
        let store = TaskStore::new();
        let task = store.create("Buy milk").await.unwrap();

        let err = store
            .update(
                task.id,
                TaskPatch {
                    title: Some("   ".to_string()),
                    completed: Some(true),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptyTitle));

        // Rejected patch applies nothing, including the completed flag.
        let listed = store.list().await;
        assert_eq!(listed[0].title, "Buy milk");
        assert!(!listed[0].completed);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = TaskStore::new();
        store.create("Buy milk").await.unwrap();

        let err = store
            .update(Uuid::new_v4(), TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_record_and_keeps_order() {
        let store = TaskStore::new();
        let a = store.create("first").await.unwrap();
        let b = store.create("second").await.unwrap();
        let c = store.create("third").await.unwrap();

        store.delete(b.id).await.unwrap();

        let listed = store.list().await;
        let ids: Vec<Uuid> = listed.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn delete_twice_fails_second_time() {
        let store = TaskStore::new();
        let task = store.create("Buy milk").await.unwrap();

        store.delete(task.id).await.unwrap();
        let err = store.delete(task.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn list_preserves_insertion_order_across_updates() {
        let store = TaskStore::new();
        let a = store.create("first").await.unwrap();
        let b = store.create("second").await.unwrap();

        store
            .update(
                a.id,
                TaskPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let ids: Vec<Uuid> = store.list().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }
}
