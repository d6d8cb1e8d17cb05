use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    models::{ChartRequest, FetchState},
    Error as CommonError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::service::ChartService;

type SharedService = Arc<ChartService>;

const DEFAULT_DAYS: u32 = 7;
const DEFAULT_CURRENCY: &str = "usd";

// Create a wrapper for our common::Error type
pub struct ApiError(CommonError);

impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        ApiError(err)
    }
}

// Convert our API error wrapper to an Axum response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CommonError::ParseError(_) => StatusCode::BAD_REQUEST,
            CommonError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        };

        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.user_message(),
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub days: Option<u32>,
    pub currency: Option<String>,
}

// Fetch the chart for a coin; failures come back as a `failed` state
pub async fn get_chart(
    State(service): State<SharedService>,
    Path(coin_id): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<FetchState>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_DAYS);
    if days == 0 {
        return Err(CommonError::ParseError("days must be a positive integer".to_string()).into());
    }

    let currency = query
        .currency
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    if currency.trim().is_empty() {
        return Err(CommonError::ParseError("currency must not be empty".to_string()).into());
    }

    let request = ChartRequest::new(coin_id, days, currency);
    debug!(
        "Chart requested for {} ({} window, {})",
        request.coin_id,
        request.window_label(),
        request.currency
    );

    Ok(Json(service.refresh(&request).await))
}

// Return the most recent chart state
pub async fn get_chart_state(State(service): State<SharedService>) -> Json<FetchState> {
    Json(service.state().await)
}
