//! Per-process cache of the remote task inventory.

use crate::api::{ApiError, TodoistApi};
use crate::types::Task;

/// Read-through cache backing all graph lookups.
///
/// The active inventory is fetched once, on first use, and held for the
/// life of the process. Entries are immutable snapshots and are never
/// refreshed; decisions that depend on up-to-date completion state must
/// go through [`TaskStore::api`] instead of the cache.
pub struct TaskStore<A> {
    api: A,
    active: Option<Vec<Task>>,
    inactive: Vec<Task>,
}

impl<A: TodoistApi> TaskStore<A> {
    /// Create a store over the given gateway with an empty secondary cache.
    pub fn new(api: A) -> Self {
        Self::with_inactive(api, Vec::new())
    }

    /// Create a store with a pre-populated inactive-task cache.
    ///
    /// Nothing in this process fills the secondary cache on its own; it
    /// exists for an external backfill of completed or archived tasks
    /// that `get` lookups should resolve without a remote call.
    pub fn with_inactive(api: A, inactive: Vec<Task>) -> Self {
        Self {
            api,
            active: None,
            inactive,
        }
    }

    /// The gateway this store reads through.
    ///
    /// Used for live lookups and mutations that must bypass the snapshot.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The full active-task inventory, fetched on first call and memoized
    /// unconditionally afterwards.
    pub fn active_tasks(&mut self) -> Result<&[Task], ApiError> {
        if self.active.is_none() {
            let tasks = self.api.list_tasks(None)?;
            log::info!("populated active task cache with {} task(s)", tasks.len());
            self.active = Some(tasks);
        }
        Ok(self.active.as_deref().unwrap_or(&[]))
    }

    /// Look up a task: active cache first, then the inactive cache, then a
    /// direct fetch. A task the remote side no longer knows yields `None`.
    pub fn task(&mut self, id: &str) -> Result<Option<Task>, ApiError> {
        if let Some(task) = self.active_tasks()?.iter().find(|t| t.id == id) {
            return Ok(Some(task.clone()));
        }
        if let Some(task) = self.inactive.iter().find(|t| t.id == id) {
            return Ok(Some(task.clone()));
        }
        match self.api.get_task(id) {
            Ok(task) => Ok(Some(task)),
            Err(ApiError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CountingInner {
        tasks: Vec<Task>,
        list_calls: u32,
        get_calls: u32,
    }

    #[derive(Clone, Default)]
    struct CountingApi {
        inner: Arc<Mutex<CountingInner>>,
    }

    impl TodoistApi for CountingApi {
        fn list_tasks(&self, _filter: Option<&str>) -> Result<Vec<Task>, ApiError> {
            let mut inner = self.inner.lock().unwrap();
            inner.list_calls += 1;
            Ok(inner.tasks.clone())
        }

        fn get_task(&self, id: &str) -> Result<Task, ApiError> {
            let mut inner = self.inner.lock().unwrap();
            inner.get_calls += 1;
            inner
                .tasks
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound { id: id.to_string() })
        }

        fn update_labels(&self, _id: &str, _labels: &[String]) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn make_task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            content: format!("Task {}", id),
            description: String::new(),
            labels: vec![],
            is_completed: false,
            created_at: None,
        }
    }

    #[test]
    fn test_active_tasks_memoized() {
        let api = CountingApi::default();
        api.inner.lock().unwrap().tasks = vec![make_task("1"), make_task("2")];

        let mut store = TaskStore::new(api.clone());
        assert_eq!(store.active_tasks().unwrap().len(), 2);
        assert_eq!(store.active_tasks().unwrap().len(), 2);
        assert_eq!(api.inner.lock().unwrap().list_calls, 1);
    }

    #[test]
    fn test_task_found_in_active_cache() {
        let api = CountingApi::default();
        api.inner.lock().unwrap().tasks = vec![make_task("1")];

        let mut store = TaskStore::new(api.clone());
        let task = store.task("1").unwrap();
        assert_eq!(task.unwrap().id, "1");
        // Cache hit, no direct fetch.
        assert_eq!(api.inner.lock().unwrap().get_calls, 0);
    }

    #[test]
    fn test_task_found_in_inactive_cache() {
        let api = CountingApi::default();
        let mut store = TaskStore::with_inactive(api.clone(), vec![make_task("old")]);

        let task = store.task("old").unwrap();
        assert_eq!(task.unwrap().id, "old");
        assert_eq!(api.inner.lock().unwrap().get_calls, 0);
    }

    #[test]
    fn test_task_falls_back_to_direct_fetch() {
        let api = CountingApi::default();
        let mut store = TaskStore::new(api.clone());

        // Memoize an empty inventory, then let the task appear remotely.
        store.active_tasks().unwrap();
        api.inner.lock().unwrap().tasks = vec![make_task("remote-only")];

        let task = store.task("remote-only").unwrap();
        assert_eq!(task.unwrap().id, "remote-only");
        assert_eq!(api.inner.lock().unwrap().get_calls, 1);
    }

    #[test]
    fn test_task_not_found_anywhere() {
        let api = CountingApi::default();
        let mut store = TaskStore::new(api);
        assert!(store.task("ghost").unwrap().is_none());
    }
}
