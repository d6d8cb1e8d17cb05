use async_trait::async_trait;
use common::{
    error::CONNECTIVITY_MESSAGE,
    models::{ChartRequest, FetchStatus},
    Error, Result,
};
use connectors::{ChartDataFetcher, FetcherConfig, HttpClient, HttpResponse};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const API: &str = "https://api.test/v3";
const PROXY: &str = "https://proxy.test";

enum Reply {
    Status(u16, String),
    Offline,
    Broken(&'static str),
}

#[derive(Default)]
struct ScriptedClient {
    direct: Mutex<VecDeque<Reply>>,
    proxy: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedClient {
    fn direct(self, reply: Reply) -> Self {
        self.direct.lock().unwrap().push_back(reply);
        self
    }

    fn proxy(self, reply: Reply) -> Self {
        self.proxy.lock().unwrap().push_back(reply);
        self
    }

    fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push((
            url.to_string(),
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));

        let queue = if url.starts_with(PROXY) {
            &self.proxy
        } else {
            &self.direct
        };
        let reply = queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request to {url}"));

        match reply {
            Reply::Status(status, body) => Ok(HttpResponse { status, body }),
            Reply::Offline => Err(Error::Network("error sending request: connection refused".into())),
            Reply::Broken(msg) => Err(Error::ParseError(msg.to_string())),
        }
    }
}

fn fetcher(client: &Arc<ScriptedClient>) -> ChartDataFetcher {
    ChartDataFetcher::new(client.clone(), FetcherConfig::new(API, PROXY))
}

fn chart_body() -> String {
    json!({
        "prices": [[1_700_000_000_000i64, 47686.24], [1_700_003_600_000i64, 48234.12]],
        "market_caps": [[1_700_000_000_000i64, 9.3e11], [1_700_003_600_000i64, 9.4e11]],
        "total_volumes": [[1_700_000_000_000i64, 2.1e10], [1_700_003_600_000i64, 2.2e10]]
    })
    .to_string()
}

fn envelope(body: &str) -> String {
    json!({ "contents": body, "status": { "http_code": 200 } }).to_string()
}

#[tokio::test]
async fn direct_success_skips_proxy() {
    let client = Arc::new(ScriptedClient::default().direct(Reply::Status(200, chart_body())));
    let state = fetcher(&client)
        .fetch(&ChartRequest::new("bitcoin", 7, "aud"))
        .await
        .unwrap();

    assert_eq!(state.status, FetchStatus::Ready);
    assert_eq!(state.series.len(), 2);
    assert_eq!(state.series[0].market_cap, 9.3e11);
    assert_eq!(state.series[1].volume, 2.2e10);

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0,
        "https://api.test/v3/coins/bitcoin/market_chart?vs_currency=aud&days=7"
    );
    assert!(calls[0].1.is_empty());
}

#[tokio::test]
async fn empty_coin_id_makes_no_request() {
    let client = Arc::new(ScriptedClient::default());
    let result = fetcher(&client).fetch(&ChartRequest::new("", 7, "usd")).await;

    assert!(result.is_none());
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn transport_failure_falls_back_to_proxy() {
    let client = Arc::new(
        ScriptedClient::default()
            .direct(Reply::Offline)
            .proxy(Reply::Status(200, envelope(&chart_body()))),
    );
    let state = fetcher(&client)
        .fetch(&ChartRequest::new("bitcoin", 30, "usd"))
        .await
        .unwrap();

    assert_eq!(state.status, FetchStatus::Ready);
    let prices: Vec<f64> = state.series.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![47686.24, 48234.12]);

    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].0.starts_with("https://proxy.test/get?url=https%3A%2F%2Fapi.test%2Fv3%2Fcoins%2Fbitcoin"));
    assert_eq!(
        calls[1].1,
        vec![("Content-Type".to_string(), "application/json".to_string())]
    );
}

#[tokio::test]
async fn direct_error_status_falls_back_to_proxy() {
    let client = Arc::new(
        ScriptedClient::default()
            .direct(Reply::Status(429, "rate limited".into()))
            .proxy(Reply::Status(200, envelope(&chart_body()))),
    );
    let series = fetcher(&client)
        .fetch_series(&ChartRequest::new("ethereum", 1, "usd"))
        .await
        .unwrap();

    assert_eq!(series.len(), 2);
}

#[tokio::test]
async fn proxy_error_status_is_reported() {
    let client = Arc::new(
        ScriptedClient::default()
            .direct(Reply::Offline)
            .proxy(Reply::Status(500, "upstream exploded".into())),
    );
    let request = ChartRequest::new("bitcoin", 7, "usd");

    let err = fetcher(&client).fetch_series(&request).await.unwrap_err();
    match &err {
        Error::FallbackExhausted { direct, proxy } => {
            assert!(direct.is_network());
            assert!(proxy.to_string().contains("500"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let client = Arc::new(
        ScriptedClient::default()
            .direct(Reply::Offline)
            .proxy(Reply::Status(500, String::new())),
    );
    let state = fetcher(&client).fetch(&request).await.unwrap();
    assert_eq!(state.status, FetchStatus::Failed);
    assert!(state.series.is_empty());
    assert!(state.error_message.unwrap().contains("500"));
}

#[tokio::test]
async fn both_paths_offline_reports_connectivity() {
    let client = Arc::new(
        ScriptedClient::default()
            .direct(Reply::Offline)
            .proxy(Reply::Offline),
    );
    let state = fetcher(&client)
        .fetch(&ChartRequest::new("bitcoin", 7, "usd"))
        .await
        .unwrap();

    assert_eq!(state.status, FetchStatus::Failed);
    assert_eq!(state.error_message.as_deref(), Some(CONNECTIVITY_MESSAGE));
}

#[tokio::test]
async fn other_proxy_errors_surface_their_message() {
    let client = Arc::new(
        ScriptedClient::default()
            .direct(Reply::Offline)
            .proxy(Reply::Broken("proxy returned garbage")),
    );
    let state = fetcher(&client)
        .fetch(&ChartRequest::new("bitcoin", 7, "usd"))
        .await
        .unwrap();

    assert_eq!(state.error_message.as_deref(), Some("proxy returned garbage"));
}

#[tokio::test]
async fn empty_prices_reports_window() {
    for (days, expected) in [
        (1, "No price data available for 1 day"),
        (90, "No price data available for 90 days"),
    ] {
        let client = Arc::new(
            ScriptedClient::default().direct(Reply::Status(200, json!({ "prices": [] }).to_string())),
        );
        let state = fetcher(&client)
            .fetch(&ChartRequest::new("bitcoin", days, "usd"))
            .await
            .unwrap();

        assert_eq!(state.status, FetchStatus::Failed);
        assert_eq!(state.error_message.as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn invalid_points_are_filtered_through_proxy_path() {
    let inner = json!({
        "prices": [[1, 47686.24], [2, 0], [3, "NaN"], [4, "Infinity"], [5, 48234.12]]
    })
    .to_string();
    let client = Arc::new(
        ScriptedClient::default()
            .direct(Reply::Status(403, String::new()))
            .proxy(Reply::Status(200, envelope(&inner))),
    );
    let state = fetcher(&client)
        .fetch(&ChartRequest::new("bitcoin", 7, "usd"))
        .await
        .unwrap();

    let prices: Vec<f64> = state.series.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![47686.24, 48234.12]);
    assert!(state.series.iter().all(|p| p.volume == 0.0 && p.market_cap == 0.0));
}

#[tokio::test]
async fn repeated_fetches_replace_rather_than_accumulate() {
    let client = Arc::new(
        ScriptedClient::default()
            .direct(Reply::Status(200, chart_body()))
            .direct(Reply::Status(200, chart_body())),
    );
    let fetcher = fetcher(&client);
    let request = ChartRequest::new("bitcoin", 7, "usd");

    let first = fetcher.fetch(&request).await.unwrap();
    let second = fetcher.fetch(&request).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.series.len(), 2);
}
