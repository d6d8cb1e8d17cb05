use thiserror::Error;

/// Message shown when neither the upstream API nor the proxy could be reached.
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to fetch chart data. Please check your internet connection.";

/// Which leg of the fetch strategy produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Direct,
    Proxy,
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStage::Direct => write!(f, "direct"),
            FetchStage::Proxy => write!(f, "proxy"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The request never produced a response (connect, timeout, request build).
    #[error("Network error: {0}")]
    Network(String),

    #[error("{stage} request failed with status {status}")]
    UpstreamStatus { stage: FetchStage, status: u16 },

    #[error("Parsing error: {0}")]
    ParseError(String),

    #[error("No price data available for {} {}", .days, day_word(.days))]
    EmptyPayload { days: u32 },

    #[error("No valid price data found for {} {}", .days, day_word(.days))]
    NoValidPoints { days: u32 },

    #[error("direct request failed ({direct}); proxy request failed ({proxy})")]
    FallbackExhausted { direct: Box<Error>, proxy: Box<Error> },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// True when the error means no response was received at all.
    pub fn is_network(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::HttpError(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// Text suitable for showing next to an empty chart.
    pub fn user_message(&self) -> String {
        match self {
            Error::FallbackExhausted { proxy, .. } => proxy.user_message(),
            Error::UpstreamStatus {
                stage: FetchStage::Proxy,
                status,
            } => format!("Proxy request failed with status {}", status),
            e if e.is_network() => CONNECTIVITY_MESSAGE.to_string(),
            Error::ParseError(msg) => msg.clone(),
            e => e.to_string(),
        }
    }
}

fn day_word(days: &u32) -> &'static str {
    if *days == 1 {
        "day"
    } else {
        "days"
    }
}
