use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";

/// Where the prediction service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` waits until the transport itself gives up.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout: timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_URL, None)
    }
}
