//! Shared test infrastructure for sequent integration tests.
//!
//! Provides an in-memory TodoistApi with a mutation log, plus a TestEnv
//! helper for consistent setup.

#![allow(dead_code)]

use sequent::{ApiError, Dispatcher, Labeler, Task, TaskStore, TodoistApi};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    tasks: Vec<Task>,
    update_log: Vec<(String, Vec<String>)>,
    update_attempts: u32,
    list_calls: u32,
    get_calls: u32,
    fail_updates: bool,
}

/// In-memory stand-in for the remote service.
///
/// Clones share state, so a copy can inspect calls made through the copy
/// owned by a store or dispatcher.
#[derive(Clone, Default)]
pub struct FakeApi {
    inner: Arc<Mutex<Inner>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a task.
    pub fn put_task(&self, task: Task) {
        let mut inner = self.inner.lock().unwrap();
        inner.tasks.retain(|t| t.id != task.id);
        inner.tasks.push(task);
    }

    /// Flip a task's completion flag.
    pub fn set_completed(&self, id: &str, completed: bool) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(task) = inner.tasks.iter_mut().find(|t| t.id == id) {
            task.is_completed = completed;
        }
    }

    /// Remove a task entirely, as the remote service does on deletion.
    pub fn delete_task(&self, id: &str) {
        self.inner.lock().unwrap().tasks.retain(|t| t.id != id);
    }

    /// Make every label update fail with a remote error.
    pub fn fail_updates(&self) {
        self.inner.lock().unwrap().fail_updates = true;
    }

    /// Current remote copy of a task.
    pub fn task(&self, id: &str) -> Option<Task> {
        self.inner.lock().unwrap().tasks.iter().find(|t| t.id == id).cloned()
    }

    /// Every successful label mutation, in order.
    pub fn update_log(&self) -> Vec<(String, Vec<String>)> {
        self.inner.lock().unwrap().update_log.clone()
    }

    /// Label mutations attempted, successful or not.
    pub fn update_attempts(&self) -> u32 {
        self.inner.lock().unwrap().update_attempts
    }

    pub fn list_calls(&self) -> u32 {
        self.inner.lock().unwrap().list_calls
    }

    pub fn get_calls(&self) -> u32 {
        self.inner.lock().unwrap().get_calls
    }
}

impl TodoistApi for FakeApi {
    fn list_tasks(&self, filter: Option<&str>) -> Result<Vec<Task>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.list_calls += 1;

        let active: Vec<Task> = inner.tasks.iter().filter(|t| !t.is_completed).cloned().collect();
        Ok(match filter {
            None => active,
            Some(expr) => {
                if let Some(label) = expr.strip_prefix("!@") {
                    active.into_iter().filter(|t| !t.has_label(label)).collect()
                } else if let Some(label) = expr.strip_prefix('@') {
                    active.into_iter().filter(|t| t.has_label(label)).collect()
                } else {
                    active
                }
            }
        })
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

    fn update_labels(&self, id: &str, labels: &[String]) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.update_attempts += 1;
        if inner.fail_updates {
            return Err(ApiError::Remote {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        if let Some(task) = inner.tasks.iter_mut().find(|t| t.id == id) {
            task.labels = labels.to_vec();
        }
        inner.update_log.push((id.to_string(), labels.to_vec()));
        Ok(())
    }
}

/// A description line declaring a dependency on the given task id.
pub fn dep_line(id: &str) -> String {
    format!("< https://app.todoist.com/showTask?id={}", id)
}

/// Build a webhook event payload.
pub fn make_event(name: &str, id: &str, description: &str) -> sequent::Event {
    serde_json::from_value(serde_json::json!({
        "event_name": name,
        "event_data": { "id": id, "description": description },
    }))
    .expect("valid event payload")
}

/// Build an item:updated event carrying an old-state snapshot.
pub fn make_update_event(id: &str, description: &str, old_description: &str) -> sequent::Event {
    serde_json::from_value(serde_json::json!({
        "event_name": "item:updated",
        "event_data": { "id": id, "description": description },
        "event_data_extra": { "old_item": { "description": old_description } },
    }))
    .expect("valid event payload")
}

/// Test environment wiring a FakeApi into the store and labeler.
pub struct TestEnv {
    pub api: FakeApi,
    pub store: TaskStore<FakeApi>,
    pub labeler: Labeler,
}

impl TestEnv {
    /// Create a fresh environment managing the `next` label.
    pub fn new() -> Self {
        let api = FakeApi::new();
        let store = TaskStore::new(api.clone());
        Self {
            api,
            store,
            labeler: Labeler::new("next"),
        }
    }

    /// Add an active task with a description.
    pub fn add_task(&self, id: &str, description: &str) -> Task {
        let task = Task {
            id: id.to_string(),
            content: format!("Task {}", id),
            description: description.to_string(),
            labels: vec![],
            is_completed: false,
            created_at: None,
        };
        self.api.put_task(task.clone());
        task
    }

    /// Add an active task carrying labels.
    pub fn add_labeled_task(&self, id: &str, description: &str, labels: &[&str]) -> Task {
        let task = Task {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            ..self.add_task(id, description)
        };
        self.api.put_task(task.clone());
        task
    }

    /// Add a completed task.
    pub fn add_completed_task(&self, id: &str) -> Task {
        let task = Task {
            is_completed: true,
            ..self.add_task(id, "")
        };
        self.api.put_task(task.clone());
        task
    }

    /// Consume the environment into a dispatcher over its store.
    pub fn into_dispatcher(self) -> (FakeApi, Dispatcher<FakeApi>) {
        let dispatcher = Dispatcher::new(self.store, self.labeler);
        (self.api, dispatcher)
    }

    /// Assert a task's current remote label set.
    pub fn assert_labels(&self, id: &str, expected: &[&str]) {
        let task = self.api.task(id).unwrap_or_else(|| panic!("no task {}", id));
        let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            task.labels, expected,
            "unexpected labels on task {}: {:?}",
            id, task.labels
        );
    }
}
