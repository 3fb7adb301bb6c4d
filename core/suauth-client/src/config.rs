//! Client identity and endpoint configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Server used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Identifies this SDK in the user agent.
pub const SDK_NAME: &str = "Rust SDK";

/// Identity and endpoint settings for a [`ValidationClient`](crate::ValidationClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Account that owns the application.
    pub owner_id: String,
    /// Application ID issued by the server.
    pub app_id: String,
    /// Application name, sent with every request and used in the user agent.
    pub app_name: String,
    /// Application version, used in the user agent.
    pub version: String,
    /// Server base URL (e.g. `https://licenses.example.com`).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            owner_id: String::new(),
            app_id: String::new(),
            app_name: String::new(),
            version: "1.0.0".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Creates a config for the default server.
    pub fn new(
        owner_id: impl Into<String>,
        app_id: impl Into<String>,
        app_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            app_id: app_id.into(),
            app_name: app_name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// Sets the server base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Returns the base URL without trailing slashes.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Returns the user agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> String {
        format!("{}/{} ({SDK_NAME})", self.app_name, self.version)
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
