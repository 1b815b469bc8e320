//! Retry, backoff, and pacing around raw remote calls.
//!
//! Every outbound call in the system funnels through [`ResilientApi`],
//! which makes its mandatory post-call pacing a simple global rate
//! limiter on top of the per-call retry loop.

use crate::api::{ApiError, TodoistApi};
use crate::types::Task;
use std::time::Duration;

/// Maximum attempts per call before giving up.
const MAX_ATTEMPTS: u32 = 5;

/// Base of the exponential backoff. Waits are `2^(attempt + 4)` seconds:
/// 16, 32, 64, 128, 256 across the retry window.
const BACKOFF_BASE: u64 = 2;

/// Minimum delay enforced after every attempt, retried or not.
const PACING_DELAY: Duration = Duration::from_secs(2);

/// Blocking sleep seam so retry behavior is testable without wall-clock
/// delays.
pub trait Sleeper: Send {
    /// Block the calling thread for the given duration.
    fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by `std::thread::sleep`.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Composition wrapper adding retry and pacing to any [`TodoistApi`].
pub struct ResilientApi<C> {
    inner: C,
    sleeper: Box<dyn Sleeper>,
}

impl<C: TodoistApi> ResilientApi<C> {
    /// Wrap a raw client with the default thread sleeper.
    pub fn new(inner: C) -> Self {
        Self::with_sleeper(inner, Box::new(ThreadSleeper))
    }

    /// Wrap a raw client with an explicit sleeper.
    pub fn with_sleeper(inner: C, sleeper: Box<dyn Sleeper>) -> Self {
        Self { inner, sleeper }
    }

    /// Run one remote call under the retry policy.
    ///
    /// Rate-limited responses back off and retry up to [`MAX_ATTEMPTS`];
    /// every other error propagates on the spot. The pacing delay runs
    /// after each attempt regardless of its outcome.
    fn call<T>(&self, mut op: impl FnMut(&C) -> Result<T, ApiError>) -> Result<T, ApiError> {
        for attempt in 0..MAX_ATTEMPTS {
            match op(&self.inner) {
                Ok(value) => {
                    self.sleeper.sleep(PACING_DELAY);
                    return Ok(value);
                }
                Err(ApiError::RateLimited) => {
                    let wait = Duration::from_secs(BACKOFF_BASE.pow(attempt + 4));
                    log::warn!(
                        "rate limit exceeded, waiting {}s before retrying",
                        wait.as_secs()
                    );
                    self.sleeper.sleep(wait);
                    self.sleeper.sleep(PACING_DELAY);
                }
                Err(e) => {
                    self.sleeper.sleep(PACING_DELAY);
                    return Err(e);
                }
            }
        }
        Err(ApiError::RetriesExhausted)
    }
}

impl<C: TodoistApi> TodoistApi for ResilientApi<C> {
    fn list_tasks(&self, filter: Option<&str>) -> Result<Vec<Task>, ApiError> {
        self.call(|api| api.list_tasks(filter))
    }

    fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        self.call(|api| api.get_task(id))
    }

    fn update_labels(&self, id: &str, labels: &[String]) -> Result<(), ApiError> {
        self.call(|api| api.update_labels(id, labels))
    }
}
