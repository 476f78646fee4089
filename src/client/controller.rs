//! Mirror state and display filtering.

use std::str::FromStr;
use std::sync::Arc;

use uuid::Uuid;

use crate::store::{Task, TaskPatch};

use super::{ClientError, TaskApi};

/// Which tasks the mirror displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            other => Err(format!("Unknown filter: {}", other)),
        }
    }
}

/// Why the visible list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The collection itself is empty.
    NoTasks,
    /// Tasks exist, but none match the current filter.
    NoneMatchFilter,
}

/// Incomplete vs. total counts, recomputed on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub remaining: usize,
    pub total: usize,
}

/// Local mirror of the server's task collection plus a display filter.
///
/// Mutations go to the server first; the mirror is patched only after the
/// corresponding request succeeds. A failed request leaves the mirror in its
/// prior state.
pub struct TaskMirror {
    api: Arc<dyn TaskApi>,
    tasks: Vec<Task>,
    filter: Filter,
}

impl TaskMirror {
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            filter: Filter::All,
        }
    }

    /// Replace the mirror wholesale with the server's collection.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.tasks = self.api.list().await?;
        Ok(())
    }

    /// Create a task and append it to the mirror.
    pub async fn add(&mut self, title: &str) -> Result<Task, ClientError> {
        let task = self.api.create(title).await?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Set a task's completed flag and patch the mirror in place.
    pub async fn set_completed(&mut self, id: Uuid, completed: bool) -> Result<(), ClientError> {
        let patch = TaskPatch {
            completed: Some(completed),
            ..Default::default()
        };
        let updated = self.api.update(id, patch).await?;
        self.replace(updated);
        Ok(())
    }

    /// Rename a task and patch the mirror in place.
    pub async fn rename(&mut self, id: Uuid, title: &str) -> Result<(), ClientError> {
        let patch = TaskPatch {
            title: Some(title.to_string()),
            ..Default::default()
        };
        let updated = self.api.update(id, patch).await?;
        self.replace(updated);
        Ok(())
    }

    /// Delete a task on the server, then drop it from the mirror.
    pub async fn remove(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.api.delete(id).await?;
        self.tasks.retain(|t| t.id != id);
        Ok(())
    }

    /// Delete every completed task, one request at a time.
    ///
    /// A failed delete is logged and skipped; remaining deletes still
    /// proceed. Returns the number of tasks actually removed. There is no
    /// rollback; after a partial failure the mirror stays stale until the
    /// next [`refresh`](Self::refresh).
    pub async fn clear_completed(&mut self) -> usize {
        let completed: Vec<Uuid> = self
            .tasks
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.id)
            .collect();

        let mut removed = 0;
        for id in completed {
            match self.api.delete(id).await {
                Ok(()) => {
                    self.tasks.retain(|t| t.id != id);
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to delete task {}: {}", id, e);
                }
            }
        }
        removed
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// The mirrored collection, unfiltered.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks matching the current filter, in insertion order.
    pub fn visible(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).collect()
    }

    /// Why the visible list is empty, if it is.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.tasks.is_empty() {
            Some(EmptyState::NoTasks)
        } else if self.visible().is_empty() {
            Some(EmptyState::NoneMatchFilter)
        } else {
            None
        }
    }

    /// Incomplete vs. total counts over the full mirror.
    pub fn counts(&self) -> TaskCounts {
        TaskCounts {
            remaining: self.tasks.iter().filter(|t| !t.completed).count(),
            total: self.tasks.len(),
        }
    }

    fn replace(&mut self, updated: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == updated.id) {
            *slot = updated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreError, TaskStore};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use tokio::sync::Mutex;

    /// In-process stand-in for the HTTP transport, backed by a real store.
    struct FakeApi {
        store: TaskStore,
        fail_deletes: Mutex<HashSet<Uuid>>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                store: TaskStore::new(),
                fail_deletes: Mutex::new(HashSet::new()),
            }
        }

        async fn fail_delete_of(&self, id: Uuid) {
            self.fail_deletes.lock().await.insert(id);
        }
    }

    fn api_error(err: StoreError) -> ClientError {
        let status = match err {
            StoreError::EmptyTitle => 400,
            StoreError::NotFound => 404,
        };
        ClientError::Api {
            status,
            message: err.to_string(),
        }
    }

    #[async_trait]
    impl TaskApi for FakeApi {
        async fn list(&self) -> Result<Vec<Task>, ClientError> {
            Ok(self.store.list().await)
        }

        async fn create(&self, title: &str) -> Result<Task, ClientError> {
            self.store.create(title).await.map_err(api_error)
        }

        async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, ClientError> {
            self.store.update(id, patch).await.map_err(api_error)
        }

        async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
            if self.fail_deletes.lock().await.contains(&id) {
                return Err(ClientError::Api {
                    status: 500,
                    message: "injected failure".to_string(),
                });
            }
            self.store.delete(id).await.map_err(api_error)
        }
    }

    async fn mirror_with(api: Arc<FakeApi>) -> TaskMirror {
        let mut mirror = TaskMirror::new(api);
        mirror.refresh().await.unwrap();
        mirror
    }

    #[tokio::test]
    async fn refresh_replaces_the_mirror_wholesale() {
        let api = Arc::new(FakeApi::new());
        api.store.create("one").await.unwrap();
        api.store.create("two").await.unwrap();

        let mirror = mirror_with(Arc::clone(&api)).await;
        assert_eq!(mirror.tasks().len(), 2);
        assert_eq!(mirror.tasks()[0].title, "one");
    }

    #[tokio::test]
    async fn add_appends_without_refetch() {
        let api = Arc::new(FakeApi::new());
        let mut mirror = mirror_with(Arc::clone(&api)).await;

        mirror.add("Buy milk").await.unwrap();
        assert_eq!(mirror.tasks().len(), 1);
        assert_eq!(mirror.tasks()[0].title, "Buy milk");

        // Server and mirror agree without another list call.
        assert_eq!(api.store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_add_leaves_mirror_untouched() {
        let api = Arc::new(FakeApi::new());
        let mut mirror = mirror_with(Arc::clone(&api)).await;

        let err = mirror.add("   ").await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 400, .. }));
        assert!(mirror.tasks().is_empty());
    }

    #[tokio::test]
    async fn set_completed_patches_in_place() {
        let api = Arc::new(FakeApi::new());
        let mut mirror = mirror_with(Arc::clone(&api)).await;

        mirror.add("one").await.unwrap();
        mirror.add("two").await.unwrap();
        let first = mirror.tasks()[0].id;

        mirror.set_completed(first, true).await.unwrap();

        assert!(mirror.tasks()[0].completed);
        assert!(!mirror.tasks()[1].completed);
        // Order unchanged.
        assert_eq!(mirror.tasks()[0].id, first);
    }

    #[tokio::test]
    async fn remove_drops_the_task_locally() {
        let api = Arc::new(FakeApi::new());
        let mut mirror = mirror_with(Arc::clone(&api)).await;

        mirror.add("one").await.unwrap();
        mirror.add("two").await.unwrap();
        let first = mirror.tasks()[0].id;

        mirror.remove(first).await.unwrap();
        assert_eq!(mirror.tasks().len(), 1);
        assert_eq!(mirror.tasks()[0].title, "two");
    }

    #[tokio::test]
    async fn filters_select_the_right_views() {
        let api = Arc::new(FakeApi::new());
        let mut mirror = mirror_with(Arc::clone(&api)).await;

        mirror.add("done").await.unwrap();
        mirror.add("pending").await.unwrap();
        let done = mirror.tasks()[0].id;
        mirror.set_completed(done, true).await.unwrap();

        mirror.set_filter(Filter::Active);
        let visible: Vec<&str> = mirror.visible().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(visible, vec!["pending"]);

        mirror.set_filter(Filter::Completed);
        let visible: Vec<&str> = mirror.visible().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(visible, vec!["done"]);

        mirror.set_filter(Filter::All);
        assert_eq!(mirror.visible().len(), 2);
    }

    #[tokio::test]
    async fn counts_track_remaining_and_total() {
        let api = Arc::new(FakeApi::new());
        let mut mirror = mirror_with(Arc::clone(&api)).await;

        mirror.add("one").await.unwrap();
        mirror.add("two").await.unwrap();
        let first = mirror.tasks()[0].id;
        mirror.set_completed(first, true).await.unwrap();

        assert_eq!(
            mirror.counts(),
            TaskCounts {
                remaining: 1,
                total: 2
            }
        );
    }

    #[tokio::test]
    async fn empty_states_are_distinguished() {
        let api = Arc::new(FakeApi::new());
        let mut mirror = mirror_with(Arc::clone(&api)).await;

        assert_eq!(mirror.empty_state(), Some(EmptyState::NoTasks));

        mirror.add("pending").await.unwrap();
        assert_eq!(mirror.empty_state(), None);

        mirror.set_filter(Filter::Completed);
        assert_eq!(mirror.empty_state(), Some(EmptyState::NoneMatchFilter));
    }

    #[tokio::test]
    async fn clear_completed_removes_each_completed_task() {
        let api = Arc::new(FakeApi::new());
        let mut mirror = mirror_with(Arc::clone(&api)).await;

        mirror.add("keep").await.unwrap();
        mirror.add("done-1").await.unwrap();
        mirror.add("done-2").await.unwrap();
        let d1 = mirror.tasks()[1].id;
        let d2 = mirror.tasks()[2].id;
        mirror.set_completed(d1, true).await.unwrap();
        mirror.set_completed(d2, true).await.unwrap();

        let removed = mirror.clear_completed().await;
        assert_eq!(removed, 2);
        assert_eq!(mirror.tasks().len(), 1);
        assert_eq!(mirror.tasks()[0].title, "keep");
        assert_eq!(api.store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn clear_completed_continues_past_a_failure() {
        let api = Arc::new(FakeApi::new());
        let mut mirror = mirror_with(Arc::clone(&api)).await;

        mirror.add("done-1").await.unwrap();
        mirror.add("done-2").await.unwrap();
        mirror.add("done-3").await.unwrap();
        let ids: Vec<Uuid> = mirror.tasks().iter().map(|t| t.id).collect();
        for id in &ids {
            mirror.set_completed(*id, true).await.unwrap();
        }

        api.fail_delete_of(ids[1]).await;

        let removed = mirror.clear_completed().await;
        assert_eq!(removed, 2);

        // The failed delete stays in the mirror and on the server.
        let remaining: Vec<Uuid> = mirror.tasks().iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![ids[1]]);
        let server: Vec<Uuid> = api.store.list().await.iter().map(|t| t.id).collect();
        assert_eq!(server, vec![ids[1]]);
    }

    #[test]
    fn filter_parses_from_str() {
        assert_eq!("all".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!("active".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!("completed".parse::<Filter>().unwrap(), Filter::Completed);
        assert!("bogus".parse::<Filter>().is_err());
    }
}
