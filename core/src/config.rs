//! Gateway configuration.
//!
//! Fixed at gateway construction and shared read-only by every call.

use std::fmt;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

pub const BASE_URL_ENV: &str = "MOVIES_BASE_URL";
pub const API_KEY_ENV: &str = "MOVIES_API_KEY";
pub const TIMEOUT_ENV: &str = "MOVIES_TIMEOUT_SECS";

#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    /// Overall per-request deadline. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read configuration from `MOVIES_BASE_URL`, `MOVIES_API_KEY` and
    /// `MOVIES_TIMEOUT_SECS`.
    ///
    /// Never fails: a missing or malformed value falls back to a default and
    /// is reported through `tracing`. A base URL that cannot form requests
    /// surfaces later as `GatewayError::InvalidConfig` on each call.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let api_key = lookup(API_KEY_ENV).unwrap_or_default();
        if api_key.is_empty() {
            warn!("{API_KEY_ENV} is not set; requests will be sent without a credential");
        }

        let timeout = lookup(TIMEOUT_ENV).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => {
                warn!(value = %raw, "ignoring invalid {TIMEOUT_ENV}");
                None
            }
            Ok(secs) => Some(Duration::from_secs(secs)),
        });

        Self {
            base_url,
            api_key,
            timeout,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
