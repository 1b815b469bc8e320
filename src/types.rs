//! Core data types: remote task copies and webhook events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A read-through copy of a task owned by the remote service.
///
/// The local system never mutates these in place; a fresh fetch is the
/// only way a change on the remote side becomes visible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Opaque identifier assigned by the remote service
    pub id: String,

    /// Short task title
    #[serde(default)]
    pub content: String,

    /// Freeform description; dependency references live in here
    #[serde(default)]
    pub description: String,

    /// Labels currently attached to the task
    #[serde(default)]
    pub labels: Vec<String>,

    /// Completion flag
    #[serde(default, alias = "checked")]
    pub is_completed: bool,

    /// When the remote service created the task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Check whether a label is currently attached.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Lifecycle notification delivered by the remote service's webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// One of the `item:*` names; unrecognized names are ignored
    pub event_name: String,

    /// Payload describing the subject task
    pub event_data: EventData,

    /// Present on mutations; carries a snapshot of the prior state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_data_extra: Option<EventExtra>,
}

/// The `event_data` payload of a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    /// Subject task id; the service serializes this as a string or a number
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,

    /// Description at the time of the event
    #[serde(default)]
    pub description: String,

    /// Labels at the time of the event
    #[serde(default)]
    pub labels: Vec<String>,

    /// Completion flag at the time of the event
    #[serde(default, alias = "checked")]
    pub is_completed: bool,
}

/// The `event_data_extra` payload of a mutation notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventExtra {
    /// Snapshot of the task before the mutation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_item: Option<OldItem>,
}

/// The prior-state snapshot inside `event_data_extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OldItem {
    /// Description before the mutation
    #[serde(default)]
    pub description: String,

    /// Labels before the mutation
    #[serde(default)]
    pub labels: Vec<String>,
}

/// The fixed enumeration of handled lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Added,
    Updated,
    Completed,
    Uncompleted,
    Deleted,
}

impl EventKind {
    /// Map a wire event name to its kind. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "item:added" => Some(EventKind::Added),
            "item:updated" => Some(EventKind::Updated),
            "item:completed" => Some(EventKind::Completed),
            "item:uncompleted" => Some(EventKind::Uncompleted),
            "item:deleted" => Some(EventKind::Deleted),
            _ => None,
        }
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
