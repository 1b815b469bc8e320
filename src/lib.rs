//! Sequent: dependency-aware task labeling for Todoist.
//!
//! Sequent keeps a derived marker label (default `next`) on tasks whose
//! descriptions reference incomplete dependencies, reacting to the
//! service's lifecycle webhooks. Dependencies are declared by quoting a
//! task link on its own line inside a description:
//!
//! ```text
//! < https://app.todoist.com/showTask?id=42
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sequent::{Dispatcher, Event, Labeler, ResilientApi, RestApi, TaskStore};
//!
//! let api = ResilientApi::new(RestApi::new("access-token"));
//! let store = TaskStore::new(api);
//! let mut dispatcher = Dispatcher::new(store, Labeler::new("next"));
//!
//! let payload = r#"{
//!     "event_name": "item:completed",
//!     "event_data": { "id": "42" }
//! }"#;
//! let event: Event = serde_json::from_str(payload).unwrap();
//! dispatcher.handle(&event).unwrap();
//! ```

mod api;
mod label;
mod resilient;
mod rest;
mod store;
mod types;

pub mod events;
pub mod resolver;
pub mod server;
pub mod sweep;

// Re-export public API
pub use api::{ApiError, TodoistApi};
pub use events::Dispatcher;
pub use label::{DEFAULT_LABEL, Labeler};
pub use resilient::{ResilientApi, Sleeper, ThreadSleeper};
pub use rest::RestApi;
pub use server::ServerConfig;
pub use store::TaskStore;
pub use types::{Event, EventData, EventExtra, EventKind, OldItem, Task};
