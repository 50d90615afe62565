use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime};

/// Per-symbol metadata snapshot as reported by the provider.
///
/// Every field is optional: an unknown ticker produces an empty snapshot
/// rather than an error, and providers routinely omit individual fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteInfo {
    pub regular_market_price: Option<f64>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub regular_market_volume: Option<u64>,
    pub market_cap: Option<u64>,
    pub currency: Option<String>,
    pub short_name: Option<String>,
}

/// One OHLCV sample; `None` marks a value the provider left undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub ts: UtcDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl HistorySample {
    /// Builds a sample, turning NaN and infinite prices into `None`.
    pub fn new(
        ts: UtcDateTime,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
        volume: Option<u64>,
    ) -> Self {
        Self {
            ts,
            open: finite(open),
            high: finite(high),
            low: finite(low),
            close: finite(close),
            volume,
        }
    }

    /// True when the provider reported nothing at all for this timestamp.
    pub fn is_blank(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }
}

/// Ascending OHLCV history for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub symbol: Symbol,
    pub currency: Option<String>,
    pub samples: Vec<HistorySample>,
}

impl History {
    pub fn new(symbol: Symbol, currency: Option<String>, samples: Vec<HistorySample>) -> Self {
        Self {
            symbol,
            currency,
            samples,
        }
    }

    pub fn empty(symbol: Symbol) -> Self {
        Self::new(symbol, None, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Close of the `n`th sample counting back from the newest (0 = latest).
    pub fn close_from_end(&self, n: usize) -> Option<f64> {
        self.samples.iter().rev().nth(n).and_then(|sample| sample.close)
    }
}

pub(crate) fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
