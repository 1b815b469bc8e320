//! Event-to-handler dispatch for lifecycle notifications.

use crate::api::{ApiError, TodoistApi};
use crate::label::Labeler;
use crate::resolver;
use crate::store::TaskStore;
use crate::types::{Event, EventKind, Task};

/// Maps inbound notifications to the matching reconciliation routine.
///
/// Processing is synchronous start-to-finish; the caller is responsible
/// for delivering one event at a time.
pub struct Dispatcher<A> {
    store: TaskStore<A>,
    labeler: Labeler,
}

impl<A: TodoistApi> Dispatcher<A> {
    /// Create a dispatcher over a store and labeler.
    pub fn new(store: TaskStore<A>, labeler: Labeler) -> Self {
        Self { store, labeler }
    }

    /// Process a single notification.
    ///
    /// Unknown event names are logged and ignored. Errors from the remote
    /// service (including `RetriesExhausted`) propagate to the caller as a
    /// processing failure for this notification; soft mutation failures do
    /// not.
    pub fn handle(&mut self, event: &Event) -> Result<(), ApiError> {
        let Some(kind) = EventKind::parse(&event.event_name) else {
            log::info!("unknown event: {}", event.event_name);
            return Ok(());
        };

        match kind {
            EventKind::Added => self.on_added(event),
            EventKind::Updated => self.on_updated(event),
            EventKind::Completed | EventKind::Uncompleted | EventKind::Deleted => {
                log::info!("{} for task {}", event.event_name, event.event_data.id);
                self.reconcile_dependents(&event.event_data.id)
            }
        }
    }

    /// A new task may already reference dependencies: reconcile it using
    /// the references in the notification's own payload, never a cache.
    fn on_added(&mut self, event: &Event) -> Result<(), ApiError> {
        let id = &event.event_data.id;
        log::info!("task added: {}", id);

        let Some(mut task) = self.fetch_live(id)? else {
            return Ok(());
        };
        let references = resolver::extract_references(&event.event_data.description);
        let dependencies = resolver::resolve_ids(&mut self.store, &references)?;
        self.labeler.reconcile(&mut self.store, &mut task, Some(dependencies))?;
        Ok(())
    }

    /// Only updates that change the reference set matter. When they do,
    /// dependencies are re-derived from current state rather than trusting
    /// either payload snapshot.
    fn on_updated(&mut self, event: &Event) -> Result<(), ApiError> {
        let id = &event.event_data.id;
        log::info!("task updated: {}", id);

        let new_refs = resolver::extract_references(&event.event_data.description);
        let old_refs = event
            .event_data_extra
            .as_ref()
            .and_then(|extra| extra.old_item.as_ref())
            .map(|old| resolver::extract_references(&old.description))
            .unwrap_or_default();
        if new_refs == old_refs {
            return Ok(());
        }

        let Some(mut task) = self.fetch_live(id)? else {
            return Ok(());
        };
        self.labeler.reconcile(&mut self.store, &mut task, None)?;
        Ok(())
    }

    /// Re-evaluate every dependent of the subject task. Completion may
    /// clear a dependent's last blocker; un-completion may reintroduce
    /// one; deletion drops the reference from future resolutions.
    fn reconcile_dependents(&mut self, id: &str) -> Result<(), ApiError> {
        let dependents = resolver::find_dependents(&mut self.store, id)?;
        log::info!("{} dependent(s) of task {}", dependents.len(), id);
        for mut task in dependents {
            self.labeler.reconcile(&mut self.store, &mut task, None)?;
        }
        Ok(())
    }

    /// Fetch the subject task live. A task deleted between the event and
    /// its processing is logged and skipped rather than failing the batch.
    fn fetch_live(&mut self, id: &str) -> Result<Option<Task>, ApiError> {
        match self.store.api().get_task(id) {
            Ok(task) => Ok(Some(task)),
            Err(ApiError::NotFound { .. }) => {
                log::info!("task {} no longer exists, skipping", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
