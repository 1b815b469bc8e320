//! Batch repair of marker state across the inventory.
//!
//! Webhooks can be missed; a sweep walks both sides of the marker
//! (tasks carrying it and tasks lacking it) and reconciles each, so
//! stale markers clear and missing ones appear.

use crate::api::{ApiError, TodoistApi};
use crate::label::Labeler;
use crate::store::TaskStore;

/// Outcome of a sweep.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Tasks examined across both inventory slices.
    pub examined: usize,
    /// Tasks whose marker was added or removed.
    pub updated: usize,
}

/// Reconcile every task carrying or lacking the marker.
///
/// Uses the service's native filter syntax (`@label` / `!@label`) to pull
/// the two slices, then runs the ordinary reconcile over each task. Soft
/// mutation failures are already absorbed by the labeler; anything else
/// aborts the sweep.
pub fn run<A: TodoistApi>(
    store: &mut TaskStore<A>,
    labeler: &Labeler,
) -> Result<SweepReport, ApiError> {
    let marked = store.api().list_tasks(Some(&format!("@{}", labeler.label())))?;
    let unmarked = store.api().list_tasks(Some(&format!("!@{}", labeler.label())))?;

    let mut report = SweepReport::default();
    for mut task in marked.into_iter().chain(unmarked) {
        report.examined += 1;
        if labeler.reconcile(store, &mut task, None)? {
            report.updated += 1;
        }
    }

    log::info!(
        "sweep examined {} task(s), updated {}",
        report.examined,
        report.updated
    );
    Ok(report)
}
