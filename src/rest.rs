//! Blocking client for the Todoist REST v2 API.

use crate::api::{ApiError, TodoistApi};
use crate::types::Task;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};

const DEFAULT_BASE_URL: &str = "https://api.todoist.com/rest/v2";

/// Raw HTTP implementation of [`TodoistApi`].
///
/// Carries no retry or pacing of its own; wrap it in
/// [`crate::ResilientApi`] before handing it to the rest of the system.
pub struct RestApi {
    http: Client,
    token: String,
    base_url: String,
}

impl RestApi {
    /// Create a client against the production API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Create a client against an alternate endpoint.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    fn check(response: Response, id: Option<&str>) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }
        if status == StatusCode::NOT_FOUND
            && let Some(id) = id
        {
            return Err(ApiError::NotFound { id: id.to_string() });
        }
        let message = response.text().unwrap_or_default();
        Err(ApiError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    fn transport(error: reqwest::Error) -> ApiError {
        ApiError::Transport(error.to_string())
    }
}

impl TodoistApi for RestApi {
    fn list_tasks(&self, filter: Option<&str>) -> Result<Vec<Task>, ApiError> {
        let mut request = self
            .http
            .get(format!("{}/tasks", self.base_url))
            .bearer_auth(&self.token);
        if let Some(filter) = filter {
            request = request.query(&[("filter", filter)]);
        }
        let response = request.send().map_err(Self::transport)?;
        Self::check(response, None)?.json().map_err(Self::transport)
    }

    fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        let response = self
            .http
            .get(format!("{}/tasks/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .send()
            .map_err(Self::transport)?;
        Self::check(response, Some(id))?.json().map_err(Self::transport)
    }

    fn update_labels(&self, id: &str, labels: &[String]) -> Result<(), ApiError> {
        let response = self
            .http
            .post(format!("{}/tasks/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "labels": labels }))
            .send()
            .map_err(Self::transport)?;
        Self::check(response, Some(id))?;
        Ok(())
    }
}
