use crate::{coingecko, FetcherConfig, HttpClient, HttpResponse};
use common::{
    models::{ChartRequest, FetchState, PricePoint},
    Error, FetchStage, Result,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const JSON_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Fetches market chart series, falling back to a pass-through proxy when
/// the upstream API cannot be reached directly.
pub struct ChartDataFetcher {
    client: Arc<dyn HttpClient>,
    config: FetcherConfig,
}

impl ChartDataFetcher {
    pub fn new(client: Arc<dyn HttpClient>, config: FetcherConfig) -> Self {
        Self { client, config }
    }

    /// Run one chart request and collapse the outcome into a terminal state.
    ///
    /// Returns `None` without touching the network when the request names no
    /// coin, so the caller's current state stays as it is.
    pub async fn fetch(&self, request: &ChartRequest) -> Option<FetchState> {
        if request.is_noop() {
            debug!("Skipping chart fetch: no coin selected");
            return None;
        }

        let result = self.fetch_series(request).await;
        match &result {
            Ok(series) => info!(
                "Fetched {} chart points for {} ({} {})",
                series.len(),
                request.coin_id,
                request.window_label(),
                request.currency
            ),
            Err(e) => error!("Chart fetch failed for {}: {}", request.coin_id, e),
        }

        Some(FetchState::from_result(result))
    }

    /// Fetch, normalise and validate the series for `request`.
    pub async fn fetch_series(&self, request: &ChartRequest) -> Result<Vec<PricePoint>> {
        let url = coingecko::market_chart_url(
            &self.config.api_base_url,
            &request.coin_id,
            &request.currency,
            request.days,
        )?;

        debug!(
            "Fetching chart data: coin={}, days={}, currency={}",
            request.coin_id, request.days, request.currency
        );

        let response = self.get_with_fallback(&url).await?;
        let payload = coingecko::unwrap_payload(&response.body)?;

        coingecko::parse_market_chart(&payload, request.days)
    }

    async fn get_with_fallback(&self, url: &str) -> Result<HttpResponse> {
        let direct = match self.client.get(url, &[]).await {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) => Error::UpstreamStatus {
                stage: FetchStage::Direct,
                status: response.status,
            },
            Err(e) => e,
        };

        warn!("Direct chart request failed ({}), retrying through proxy", direct);

        let proxy_url = coingecko::proxy_url(&self.config.proxy_base_url, url)?;
        let proxy = match self.client.get(&proxy_url, &[JSON_CONTENT_TYPE]).await {
            Ok(response) if response.is_success() => {
                debug!("Proxy request succeeded: {}", proxy_url);
                return Ok(response);
            }
            Ok(response) => Error::UpstreamStatus {
                stage: FetchStage::Proxy,
                status: response.status,
            },
            Err(e) => e,
        };

        Err(Error::FallbackExhausted {
            direct: Box::new(direct),
            proxy: Box::new(proxy),
        })
    }
}
