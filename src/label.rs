//! The marker state machine.
//!
//! Each task is in one of two states: marker present (it has at least one
//! incomplete dependency) or marker absent. [`Labeler::reconcile`] is the
//! transition function; there are no intermediate or error states. A
//! failed mutation leaves the remote state unchanged until the next
//! triggering notification.

use crate::api::{ApiError, TodoistApi};
use crate::resolver;
use crate::store::TaskStore;
use crate::types::Task;

/// Default marker label.
pub const DEFAULT_LABEL: &str = "next";

/// Decides and applies marker transitions for a configured label.
pub struct Labeler {
    label: String,
}

impl Labeler {
    /// Create a labeler managing the given marker label.
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    /// The marker label this labeler manages.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bring a task's marker in line with its dependencies' completion
    /// state. Returns whether a mutation was applied.
    ///
    /// Dependencies are resolved fresh when not supplied. Completion state
    /// is always fetched live through the gateway, since the inventory
    /// snapshot may carry stale completion flags. On a successful mutation the
    /// in-memory task is updated so a repeated reconcile is a no-op.
    ///
    /// Mutation failures are soft: logged, reported as `false`, and never
    /// allowed to abort a surrounding batch.
    pub fn reconcile<A: TodoistApi>(
        &self,
        store: &mut TaskStore<A>,
        task: &mut Task,
        dependencies: Option<Vec<Task>>,
    ) -> Result<bool, ApiError> {
        let dependencies = match dependencies {
            Some(deps) => deps,
            None => resolver::resolve_dependencies(store, task)?,
        };

        let mut blocked = false;
        for dependency in &dependencies {
            match store.api().get_task(&dependency.id) {
                Ok(live) => {
                    if !live.is_completed {
                        blocked = true;
                        break;
                    }
                }
                // A dependency that vanished since resolution no longer blocks.
                Err(ApiError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        if blocked {
            Ok(self.add(store, task))
        } else {
            Ok(self.remove(store, task))
        }
    }

    /// Attach the marker if absent. Returns whether a mutation was applied.
    fn add<A: TodoistApi>(&self, store: &TaskStore<A>, task: &mut Task) -> bool {
        if task.has_label(&self.label) {
            return false;
        }
        let mut labels = task.labels.clone();
        labels.push(self.label.clone());
        match store.api().update_labels(&task.id, &labels) {
            Ok(()) => {
                log::info!("added {} label to task {}", self.label, task.id);
                task.labels = labels;
                true
            }
            Err(e) => {
                log::warn!("failed to add {} label to task {}: {}", self.label, task.id, e);
                false
            }
        }
    }

    /// Detach the marker if present. Returns whether a mutation was applied.
    fn remove<A: TodoistApi>(&self, store: &TaskStore<A>, task: &mut Task) -> bool {
        if !task.has_label(&self.label) {
            return false;
        }
        let labels: Vec<String> = task
            .labels
            .iter()
            .filter(|l| *l != &self.label)
            .cloned()
            .collect();
        match store.api().update_labels(&task.id, &labels) {
            Ok(()) => {
                log::info!("removed {} label from task {}", self.label, task.id);
                task.labels = labels;
                true
            }
            Err(e) => {
                log::warn!(
                    "failed to remove {} label from task {}: {}",
                    self.label,
                    task.id,
                    e
                );
                false
            }
        }
    }
}

impl Default for Labeler {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}
