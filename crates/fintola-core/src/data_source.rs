//! Market-data provider contract and the stateless fetch functions built on it.
//!
//! The proxy needs exactly two things from a provider:
//!
//! | Call | Returns | Used by |
//! |------|---------|---------|
//! | [`MarketDataProvider::info`] | [`QuoteInfo`] | quote requests |
//! | [`MarketDataProvider::history`] | [`History`] | quote and chart requests |
//!
//! Handlers never hold on to provider results between requests; they go
//! through [`fetch_quote_data`] and [`fetch_history`].

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{History, Interval, Period, QuoteInfo, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure, timeout or non-success upstream status.
    Unavailable,
    /// Upstream rejected the request parameters.
    InvalidRequest,
    /// Upstream answered with something we could not interpret.
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SourceError {}

/// Parameters of a history lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub period: Period,
    pub interval: Interval,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, period: Period, interval: Interval) -> Self {
        Self {
            symbol,
            period,
            interval,
        }
    }
}

/// Market-data provider capability.
///
/// Implementations must be `Send + Sync`; one instance serves every request.
pub trait MarketDataProvider: Send + Sync {
    /// Short provider name reported by the health endpoint.
    fn name(&self) -> &'static str;

    /// Fetches the metadata snapshot for `symbol`.
    ///
    /// An unknown symbol is not an error: it yields an empty [`QuoteInfo`].
    fn info<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteInfo, SourceError>> + Send + 'a>>;

    /// Fetches ascending OHLCV samples.
    ///
    /// An unknown symbol or a window without trading yields an empty
    /// [`History`].
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<History, SourceError>> + Send + 'a>>;
}

/// Info snapshot plus the two most recent daily samples, fetched concurrently.
pub async fn fetch_quote_data(
    provider: &dyn MarketDataProvider,
    symbol: &Symbol,
) -> Result<(QuoteInfo, History), SourceError> {
    let recent = HistoryRequest::new(symbol.clone(), Period::TwoDays, Interval::OneDay);
    tokio::try_join!(provider.info(symbol), provider.history(recent))
}

/// History for a (symbol, period, interval) triple.
pub async fn fetch_history(
    provider: &dyn MarketDataProvider,
    symbol: &Symbol,
    period: Period,
    interval: Interval,
) -> Result<History, SourceError> {
    provider
        .history(HistoryRequest::new(symbol.clone(), period, interval))
        .await
}
