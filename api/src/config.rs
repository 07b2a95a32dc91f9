//! Client configuration.

use crate::error::ApiError;
use std::time::Duration;

/// Environment variable holding the service base URL
pub const ENV_API_URL: &str = "TODOSYNC_API_URL";
/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "TODOSYNC_API_KEY";
/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "TODOSYNC_TIMEOUT_SECS";

/// Connection settings for [`crate::HttpTaskApi`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://todo.example.com/api/1.1`
    ///
    /// Endpoints are appended as `{base_url}/todo-lists/...`.
    pub base_url: String,

    /// Value of the `API-KEY` header, if the service requires one.
    pub api_key: Option<String>,

    /// Per-request timeout.
    ///
    /// Default: 10 seconds
    pub timeout: Duration,
}

impl ApiConfig {
    /// Create a configuration for `base_url` with default settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the configuration from `TODOSYNC_API_URL`, `TODOSYNC_API_KEY`
    /// and `TODOSYNC_TIMEOUT_SECS`.
    ///
    /// Unset variables fall back to [`ApiConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] if the timeout is not a whole
    /// number of seconds.
    pub fn from_env() -> Result<Self, ApiError> {
        let mut config = std::env::var(ENV_API_URL).map_or_else(|_| Self::default(), Self::new);

        if let Ok(api_key) = std::env::var(ENV_API_KEY) {
            config = config.with_api_key(api_key);
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                ApiError::InvalidConfig(format!("{ENV_TIMEOUT_SECS}={raw}: {e}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
