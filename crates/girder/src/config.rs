use std::fmt;
use std::time::Duration;

/// Default timeout for a single HTTP request (chunk uploads included).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Connection settings for a Girder server.
///
/// Built once at startup and handed to [`Client::new`](crate::Client::new);
/// the token is never read from ambient state.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base API URL, e.g. `https://girder.example.org/api/v1`.
    pub api_url: String,
    /// Value of the `Girder-Token` header.
    pub token: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
