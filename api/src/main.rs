mod config;
mod handler;
mod service;

use axum::{routing::get, Router};
use config::ApiConfig;
use connectors::{ChartDataFetcher, ReqwestClient};
use service::ChartService;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting CoinChart API");

    // Load configuration from environment
    let config = ApiConfig::from_env();
    info!(
        "Chart upstream: {}, proxy: {}",
        config.fetcher.api_base_url, config.fetcher.proxy_base_url
    );

    let client = ReqwestClient::new(&config.fetcher)
        .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
    let fetcher = Arc::new(ChartDataFetcher::new(
        Arc::new(client),
        config.fetcher.clone(),
    ));
    let service = Arc::new(ChartService::new(fetcher));

    // Create CORS middleware
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/v1/coins/:id/chart", get(handler::get_chart))
        .route("/api/v1/chart", get(handler::get_chart_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
