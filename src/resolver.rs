//! Dependency extraction and graph traversal.
//!
//! The dependency graph is never stored: it is recomputed from raw
//! description text on every access. A task declares a dependency by
//! quoting a link to it on its own line:
//!
//! ```text
//! < https://app.todoist.com/showTask?id=42
//! ```

use crate::api::{ApiError, TodoistApi};
use crate::store::TaskStore;
use crate::types::Task;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static TASK_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://(?:app\.)?todoist\.com/showTask\?id=(\d+)").expect("valid task link regex")
});

/// Extract the set of task ids referenced by a description.
///
/// Only lines that begin with the `<` quote marker are considered; every
/// other line contributes nothing. Duplicate references collapse.
pub fn extract_references(description: &str) -> HashSet<String> {
    let mut ids = HashSet::new();
    for line in description.lines() {
        if !line.starts_with('<') {
            continue;
        }
        if let Some(captures) = TASK_LINK_RE.captures(line) {
            ids.insert(captures[1].to_string());
        }
    }
    ids
}

/// Resolve a set of referenced ids to tasks via the store.
///
/// Ids that no longer resolve to a live task are silently dropped.
pub fn resolve_ids<A: TodoistApi>(
    store: &mut TaskStore<A>,
    ids: &HashSet<String>,
) -> Result<Vec<Task>, ApiError> {
    let mut tasks = Vec::new();
    for id in ids {
        if let Some(task) = store.task(id)? {
            tasks.push(task);
        }
    }
    Ok(tasks)
}

/// Resolve a task's dependencies from its description.
pub fn resolve_dependencies<A: TodoistApi>(
    store: &mut TaskStore<A>,
    task: &Task,
) -> Result<Vec<Task>, ApiError> {
    resolve_ids(store, &extract_references(&task.description))
}

/// Find every active task whose resolved dependency set contains `id`.
///
/// Full scan of the active cache with re-extraction per candidate; no
/// reverse index is maintained.
pub fn find_dependents<A: TodoistApi>(
    store: &mut TaskStore<A>,
    id: &str,
) -> Result<Vec<Task>, ApiError> {
    let candidates = store.active_tasks()?.to_vec();
    let mut dependents = Vec::new();
    for candidate in candidates {
        let dependencies = resolve_dependencies(store, &candidate)?;
        if dependencies.iter().any(|d| d.id == id) {
            dependents.push(candidate);
        }
    }
    Ok(dependents)
}
