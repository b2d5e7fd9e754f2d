//! Client runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the API client and the session store. Front ends read the environment (after
//! loading `.env`) and hand the raw values to [`ClientConfig::from_env_values`]; nothing below
//! this point reads process-wide environment variables.

use crate::constants::{
    DEFAULT_BACKEND_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_STATE_DIR, ENV_BACKEND_URL,
    ENV_HTTP_TIMEOUT_SECS, ENV_STATE_DIR,
};
use crate::{ReportError, ReportResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    backend_url: Url,
    state_dir: PathBuf,
    http_timeout: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidInput` if the backend URL cannot carry a path (for example
    /// `mailto:`), the state directory is empty or the timeout is zero.
    pub fn new(backend_url: Url, state_dir: PathBuf, http_timeout: Duration) -> ReportResult<Self> {
        if backend_url.cannot_be_a_base() {
            return Err(ReportError::InvalidInput(format!(
                "{ENV_BACKEND_URL} must be an http(s) origin, got {backend_url}"
            )));
        }
        if state_dir.as_os_str().is_empty() {
            return Err(ReportError::InvalidInput(format!(
                "{ENV_STATE_DIR} cannot be empty"
            )));
        }
        if http_timeout.is_zero() {
            return Err(ReportError::InvalidInput(format!(
                "{ENV_HTTP_TIMEOUT_SECS} must be greater than zero"
            )));
        }

        Ok(Self {
            backend_url,
            state_dir,
            http_timeout,
        })
    }

    /// Build the configuration from optional raw environment values, applying defaults for
    /// missing or blank values.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidInput` for an unparseable URL or timeout, or for any value
    /// [`ClientConfig::new`] rejects.
    pub fn from_env_values(
        backend_url: Option<String>,
        state_dir: Option<String>,
        http_timeout_secs: Option<String>,
    ) -> ReportResult<Self> {
        let backend_url = non_blank(backend_url).unwrap_or_else(|| DEFAULT_BACKEND_URL.into());
        let backend_url = Url::parse(&backend_url).map_err(|e| {
            ReportError::InvalidInput(format!("{ENV_BACKEND_URL} is not a valid URL: {e}"))
        })?;

        let state_dir = PathBuf::from(non_blank(state_dir).unwrap_or_else(|| DEFAULT_STATE_DIR.into()));

        let http_timeout_secs = match non_blank(http_timeout_secs) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ReportError::InvalidInput(format!(
                    "{ENV_HTTP_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                ))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Self::new(
            backend_url,
            state_dir,
            Duration::from_secs(http_timeout_secs),
        )
    }

    /// The backend origin as configured.
    pub fn backend_url(&self) -> &Url {
        &self.backend_url
    }

    /// Base URL every API path is appended to: `<backend>/api`.
    pub fn api_base_url(&self) -> String {
        format!(
            "{}{}",
            self.backend_url.as_str().trim_end_matches('/'),
            api_shared::paths::API_PREFIX
        )
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
