pub mod coingecko;
pub mod config;
pub mod fetcher;
pub mod http;

use async_trait::async_trait;
use common::Result;

pub use config::FetcherConfig;
pub use fetcher::ChartDataFetcher;
pub use http::ReqwestClient;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait defining the transport used to reach the upstream API and the proxy
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a GET and return whatever the server answered.
    ///
    /// Only failures to obtain a response are errors; a non-success status is
    /// returned as a normal `HttpResponse`.
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;
}
