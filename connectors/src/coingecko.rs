use common::{models::PricePoint, Error, Result};
use reqwest::Url;
use serde_json::Value;

/// `{base}/coins/{id}/market_chart?vs_currency={currency}&days={days}`
///
/// The coin id is pushed as a single encoded path segment, so `/`, `?` and `#`
/// inside it cannot change the shape of the upstream request.
pub fn market_chart_url(base: &str, coin_id: &str, currency: &str, days: u32) -> Result<String> {
    if matches!(coin_id, "." | "..") {
        return Err(Error::ConfigError(format!("Invalid coin id: {}", coin_id)));
    }

    let endpoint = format!("{}/coins", base);
    let mut url = Url::parse(&endpoint)
        .map_err(|e| Error::ConfigError(format!("Invalid market chart URL {}: {}", endpoint, e)))?;

    url.path_segments_mut()
        .map_err(|_| Error::ConfigError(format!("Market chart URL cannot take a path: {}", endpoint)))?
        .pop_if_empty()
        .push(coin_id)
        .push("market_chart");

    url.query_pairs_mut()
        .append_pair("vs_currency", currency)
        .append_pair("days", &days.to_string());

    Ok(url.to_string())
}

/// `{proxy}/get?url={target}` with the target URL percent-encoded
pub fn proxy_url(proxy_base: &str, target: &str) -> Result<String> {
    let endpoint = format!("{}/get", proxy_base);
    let url = Url::parse_with_params(&endpoint, &[("url", target)])
        .map_err(|e| Error::ConfigError(format!("Invalid proxy URL {}: {}", endpoint, e)))?;

    Ok(url.to_string())
}

/// Parse a response body into the market chart payload.
///
/// The proxy wraps the upstream body as a JSON string under `contents`; that
/// string is parsed again so both paths yield the same shape.
pub fn unwrap_payload(body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::ParseError(format!("Failed to parse chart response: {}", e)))?;

    match value.get("contents") {
        Some(Value::String(contents)) if !contents.is_empty() => serde_json::from_str(contents)
            .map_err(|e| Error::ParseError(format!("Failed to parse proxied chart data: {}", e))),
        _ => Ok(value),
    }
}

/// Turn a market chart payload into a validated series.
pub fn parse_market_chart(payload: &Value, days: u32) -> Result<Vec<PricePoint>> {
    let prices = match payload.get("prices").and_then(Value::as_array) {
        Some(prices) if !prices.is_empty() => prices,
        _ => return Err(Error::EmptyPayload { days }),
    };

    let volumes = payload.get("total_volumes").and_then(Value::as_array);
    let market_caps = payload.get("market_caps").and_then(Value::as_array);

    let mut points: Vec<PricePoint> = prices
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            // [timestamp, price]
            let pair = entry.as_array()?;
            let timestamp = pair.first().and_then(as_timestamp)?;
            let price = pair.get(1).map(coerce_f64).unwrap_or(f64::NAN);

            Some(PricePoint {
                timestamp,
                price,
                volume: series_value(volumes, i),
                market_cap: series_value(market_caps, i),
            })
        })
        .collect();

    points.retain(PricePoint::is_valid);

    if points.is_empty() {
        return Err(Error::NoValidPoints { days });
    }

    // Upstream is chronological already; a stable sort keeps that order intact
    // and the first point wins for a repeated timestamp.
    points.sort_by_key(|p| p.timestamp);
    points.dedup_by_key(|p| p.timestamp);

    Ok(points)
}

fn as_timestamp(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

// Numbers pass through; numeric strings are parsed; anything else is NaN.
fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn series_value(series: Option<&Vec<Value>>, index: usize) -> f64 {
    let value = series
        .and_then(|s| s.get(index))
        .and_then(Value::as_array)
        .and_then(|pair| pair.get(1))
        .map(coerce_f64)
        .unwrap_or(0.0);

    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
