//! Connection settings and wire-only types for the user service.

use serde::Deserialize;
use std::time::Duration;

/// Header carrying the application key on every request.
pub const APP_ID_HEADER: &str = "app-id";

/// Configuration for connecting to the user service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://dummyapi.io/data/v1")
    pub url: String,
    /// Application key sent as the `app-id` header
    pub app_id: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Create a config with default timeouts.
    pub fn new(url: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            app_id: app_id.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Override the request timeouts.
    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }
}

/// Error body returned by the service, e.g. `{"error": "RESOURCE_NOT_FOUND"}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Human readable message: the error code plus any detail payload.
    pub(crate) fn message(&self) -> String {
        match &self.data {
            Some(data) => format!("{} {}", self.error, data),
            None => self.error.clone(),
        }
    }
}
