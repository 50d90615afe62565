use serde::{Deserialize, Serialize};

/// Message carried by the soft "empty series" chart response.
pub const NO_DATA_MESSAGE: &str = "No data available";

/// Currency reported when the provider does not name one.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Quote response body: `{"meta": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub meta: QuoteMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteMeta {
    pub symbol: String,
    pub short_name: String,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub regular_market_change: f64,
    pub regular_market_change_percent: f64,
    pub regular_market_volume: u64,
    pub market_cap: u64,
    pub currency: String,
}

/// Chart response body in the layout of Yahoo's v8 chart result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub currency: String,
    pub regular_market_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartIndicators {
    pub quote: Vec<QuoteIndicator>,
}

/// Parallel OHLCV columns; each has one entry per timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteIndicator {
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub volume: Vec<Option<u64>>,
}

impl QuoteIndicator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            open: Vec::with_capacity(capacity),
            high: Vec::with_capacity(capacity),
            low: Vec::with_capacity(capacity),
            close: Vec::with_capacity(capacity),
            volume: Vec::with_capacity(capacity),
        }
    }
}

/// `{"error": "..."}` body used for both the soft and the hard error paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn no_data() -> Self {
        Self::new(NO_DATA_MESSAGE)
    }
}

/// Everything the finance endpoint can answer with status 200.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FinancePayload {
    Quote(QuoteResult),
    Chart(ChartResult),
    NoData(ErrorBody),
}

impl FinancePayload {
    pub fn no_data() -> Self {
        Self::NoData(ErrorBody::no_data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_meta_serializes_with_camel_case_keys() {
        let payload = FinancePayload::Quote(QuoteResult {
            meta: QuoteMeta {
                symbol: String::from("AAPL"),
                short_name: String::from("Apple Inc."),
                regular_market_price: Some(150.0),
                previous_close: None,
                regular_market_change: 0.0,
                regular_market_change_percent: 0.0,
                regular_market_volume: 0,
                market_cap: 0,
                currency: String::from("USD"),
            },
        });

        let value = serde_json::to_value(&payload).expect("serializes");
        let meta = &value["meta"];
        assert_eq!(meta["shortName"], "Apple Inc.");
        assert_eq!(meta["regularMarketPrice"], 150.0);
        assert!(meta["previousClose"].is_null());
        assert_eq!(meta["regularMarketVolume"], 0);
    }

    #[test]
    fn no_data_payload_is_a_bare_error_object() {
        let value = serde_json::to_value(FinancePayload::no_data()).expect("serializes");
        assert_eq!(value, serde_json::json!({ "error": "No data available" }));
    }
}
