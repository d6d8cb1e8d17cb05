use crate::{FetcherConfig, HttpClient, HttpResponse};
use async_trait::async_trait;
use common::{Error, Result};
use tracing::debug;

/// `HttpClient` backed by reqwest
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

// Send failures (connect, timeout, malformed request) mean no response was
// received; anything else keeps the reqwest error intact.
fn classify(err: reqwest::Error) -> Error {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        Error::Network(err.to_string())
    } else {
        Error::HttpError(err)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(Error::HttpError)?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse { status, body })
    }
}
