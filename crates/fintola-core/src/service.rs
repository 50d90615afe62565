//! The quote proxy handler, independent of the HTTP framework serving it.

use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::data_source::{fetch_history, fetch_quote_data, MarketDataProvider};
use crate::shape::{shape_chart, shape_quote};
use crate::{CoreError, FinancePayload, Interval, Period, Symbol};

/// Symbol used when the request does not name one.
pub const DEFAULT_SYMBOL: &str = "RELIANCE.NS";

/// Raw query string of the finance endpoint.
///
/// Blank values count as absent, so `?symbol=` falls back to the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinanceQuery {
    pub symbol: Option<String>,
    /// The `type` parameter.
    pub kind: Option<String>,
    pub period: Option<String>,
    pub interval: Option<String>,
}

impl FinanceQuery {
    /// Builds the query from decoded key/value pairs. The first occurrence of
    /// a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "symbol" => &mut query.symbol,
                "type" => &mut query.kind,
                "period" => &mut query.period,
                "interval" => &mut query.interval,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}

/// What the caller asked for, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinanceRequest {
    Quote {
        symbol: Symbol,
    },
    Chart {
        symbol: Symbol,
        period: Period,
        interval: Interval,
    },
}

impl FinanceRequest {
    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::Quote { symbol } | Self::Chart { symbol, .. } => symbol,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Quote { .. } => "quote",
            Self::Chart { .. } => "chart",
        }
    }
}

impl TryFrom<&FinanceQuery> for FinanceRequest {
    type Error = CoreError;

    fn try_from(query: &FinanceQuery) -> Result<Self, Self::Error> {
        let symbol = Symbol::parse(present(&query.symbol).unwrap_or(DEFAULT_SYMBOL))?;

        // Unknown types are served as quotes.
        if present(&query.kind) != Some("chart") {
            return Ok(Self::Quote { symbol });
        }

        let period = present(&query.period)
            .map(Period::from_str)
            .transpose()?
            .unwrap_or_default();
        let interval = present(&query.interval)
            .map(Interval::from_str)
            .transpose()?
            .unwrap_or_default();

        Ok(Self::Chart {
            symbol,
            period,
            interval,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Stateless request handler over a shared provider.
#[derive(Clone)]
pub struct FinanceService {
    provider: Arc<dyn MarketDataProvider>,
}

impl FinanceService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Validates the query and answers it.
    pub async fn handle(&self, query: &FinanceQuery) -> Result<FinancePayload, CoreError> {
        let request = FinanceRequest::try_from(query)?;
        info!(symbol = %request.symbol(), kind = request.kind(), "finance request");

        match request {
            FinanceRequest::Quote { symbol } => self.get_quote(&symbol).await,
            FinanceRequest::Chart {
                symbol,
                period,
                interval,
            } => self.get_chart(&symbol, period, interval).await,
        }
    }

    pub async fn get_quote(&self, symbol: &Symbol) -> Result<FinancePayload, CoreError> {
        let (info, history) = fetch_quote_data(self.provider.as_ref(), symbol).await?;
        Ok(FinancePayload::Quote(shape_quote(symbol, &info, &history)))
    }

    pub async fn get_chart(
        &self,
        symbol: &Symbol,
        period: Period,
        interval: Interval,
    ) -> Result<FinancePayload, CoreError> {
        let history = fetch_history(self.provider.as_ref(), symbol, period, interval).await?;
        Ok(shape_chart(symbol, &history))
    }
}
