use crate::Error;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One sample of a coin's market chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Price in the requested currency
    pub price: f64,
    /// Traded volume, 0 when the upstream omits it
    pub volume: f64,
    /// Market capitalisation, 0 when the upstream omits it
    pub market_cap: f64,
}

impl PricePoint {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Whether the point carries a usable price.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Parameters of a single chart fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub coin_id: String,
    pub days: u32,
    pub currency: String,
}

impl ChartRequest {
    pub fn new(coin_id: impl Into<String>, days: u32, currency: impl AsRef<str>) -> Self {
        Self {
            coin_id: coin_id.into().trim().to_string(),
            days,
            currency: currency.as_ref().trim().to_lowercase(),
        }
    }

    /// A request without a coin is skipped rather than failed.
    pub fn is_noop(&self) -> bool {
        self.coin_id.is_empty()
    }

    /// Label for the chart window, e.g. "24 hour" or "30 day".
    pub fn window_label(&self) -> String {
        if self.days == 1 {
            "24 hour".to_string()
        } else {
            format!("{} day", self.days)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Snapshot of the chart panel: the series plus how it got there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState {
    pub series: Vec<PricePoint>,
    pub status: FetchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Default for FetchState {
    fn default() -> Self {
        Self {
            series: Vec::new(),
            status: FetchStatus::Idle,
            error_message: None,
        }
    }
}

impl FetchState {
    pub fn loading() -> Self {
        Self {
            status: FetchStatus::Loading,
            ..Self::default()
        }
    }

    pub fn ready(series: Vec<PricePoint>) -> Self {
        Self {
            series,
            status: FetchStatus::Ready,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            series: Vec::new(),
            status: FetchStatus::Failed,
            error_message: Some(message.into()),
        }
    }

    /// Collapse a fetch outcome into the terminal state the UI renders.
    pub fn from_result(result: Result<Vec<PricePoint>, Error>) -> Self {
        match result {
            Ok(series) => Self::ready(series),
            Err(e) => Self::failed(e.user_message()),
        }
    }
}
