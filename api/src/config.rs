use connectors::{
    config::{ALLORIGINS_PROXY_URL, COINGECKO_API_URL},
    FetcherConfig,
};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub fetcher: FetcherConfig,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let api_url =
            std::env::var("COINGECKO_API_URL").unwrap_or_else(|_| COINGECKO_API_URL.to_string());
        let proxy_url =
            std::env::var("CHART_PROXY_URL").unwrap_or_else(|_| ALLORIGINS_PROXY_URL.to_string());

        let mut fetcher = FetcherConfig::new(api_url, proxy_url);
        if let Some(secs) = std::env::var("CHART_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s > 0)
        {
            fetcher = fetcher.with_timeout(Duration::from_secs(secs));
        }

        Self {
            host,
            port,
            fetcher,
        }
    }
}
