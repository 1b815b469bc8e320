//! Capability interface over the remote task service.

use crate::types::Task;

/// Errors surfaced by remote service calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The service rejected the call for exceeding its allowed frequency.
    RateLimited,
    /// The requested task does not exist on the remote side.
    NotFound { id: String },
    /// Any other error response from the service.
    Remote { status: u16, message: String },
    /// The call never reached the service.
    Transport(String),
    /// A rate-limited call was retried up to the attempt ceiling.
    RetriesExhausted,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::RateLimited => write!(f, "rate limit exceeded"),
            ApiError::NotFound { id } => write!(f, "task not found: {}", id),
            ApiError::Remote { status, message } => {
                write!(f, "remote error ({}): {}", status, message)
            }
            ApiError::Transport(message) => write!(f, "transport error: {}", message),
            ApiError::RetriesExhausted => write!(f, "max retries exceeded for API call"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The narrow contract this system needs from the remote task service.
///
/// `ResilientApi` wraps any implementation with retry and pacing; the
/// rest of the system only ever sees this trait.
pub trait TodoistApi {
    /// List active tasks, optionally restricted by a filter expression in
    /// the service's native syntax (e.g. `@next`, `!@next`).
    fn list_tasks(&self, filter: Option<&str>) -> Result<Vec<Task>, ApiError>;

    /// Fetch a single task by id.
    fn get_task(&self, id: &str) -> Result<Task, ApiError>;

    /// Replace a task's label set.
    fn update_labels(&self, id: &str, labels: &[String]) -> Result<(), ApiError>;
}
