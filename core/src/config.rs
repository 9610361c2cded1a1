//! Client configuration passed to `ResourceClient` at construction.

use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("mahasiswa-core/", env!("CARGO_PKG_VERSION"));

/// Endpoint and transport settings for one resource.
///
/// `base_url` is the collection endpoint, e.g.
/// `http://127.0.0.1:3000/api/mahasiswa`. It is not validated here: an
/// unusable URL surfaces as `RequestSetupFailed` from the first operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Whole-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
