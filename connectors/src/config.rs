use std::time::Duration;

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const ALLORIGINS_PROXY_URL: &str = "https://api.allorigins.win";

/// Endpoints and limits used by the chart fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Base URL of the market data API
    pub api_base_url: String,
    /// Base URL of the pass-through proxy used when the API is unreachable
    pub proxy_base_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_base_url: COINGECKO_API_URL.to_string(),
            proxy_base_url: ALLORIGINS_PROXY_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl FetcherConfig {
    pub fn new(api_base_url: impl AsRef<str>, proxy_base_url: impl AsRef<str>) -> Self {
        Self {
            api_base_url: api_base_url.as_ref().trim().trim_end_matches('/').to_string(),
            proxy_base_url: proxy_base_url.as_ref().trim().trim_end_matches('/').to_string(),
            request_timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
