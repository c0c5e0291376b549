//! Connection settings for the 123pan client.

use std::time::Duration;

/// Default service origin.
pub const DEFAULT_BASE_URL: &str = "https://www.123pan.com";

/// Timeout applied to every HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`super::Pan123Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service origin, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Optional proxy URL (e.g., "http://proxy:8080" or "socks5://proxy:1080")
    pub proxy: Option<String>,
}

impl ClientConfig {
    /// Use a different service origin.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Route requests through a proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Change the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL for an API path such as "/a/api/share/create".
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://www.123pan.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_url_building() {
        let config = ClientConfig::default().with_base_url("http://localhost:8080/");
        assert_eq!(
            config.url("/a/api/file/trash"),
            "http://localhost:8080/a/api/file/trash"
        );
    }
}
