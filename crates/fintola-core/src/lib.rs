//! # Fintola Core
//!
//! Domain types, the Yahoo Finance adapter and response shaping for the
//! fintola quote proxy.
//!
//! ## Overview
//!
//! - **Validated request parameters**: symbol, period and interval
//! - **Provider contract** with a session-aware Yahoo adapter
//! - **Response shaping** into the Yahoo-chart-like quote and chart bodies
//! - **[`FinanceService`]**, the framework-independent request handler
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo) |
//! | [`data_source`] | Provider trait and fetch functions |
//! | [`domain`] | Parameters, snapshots and response bodies |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`service`] | Request handler |
//! | [`shape`] | Provider data to response body |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fintola_core::{FinanceQuery, FinanceService, ReqwestHttpClient, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let http = Arc::new(ReqwestHttpClient::new("fintola")?);
//!     let service = FinanceService::new(Arc::new(YahooAdapter::new(http)));
//!
//!     let query = FinanceQuery {
//!         symbol: Some("AAPL".into()),
//!         ..FinanceQuery::default()
//!     };
//!     println!("{}", serde_json::to_string(&service.handle(&query).await?)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ HTTP route      │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ FinanceService  │────▶│ shape_quote /    │
//! │                 │     │ shape_chart      │
//! └────────┬────────┘     └──────────────────┘
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ MarketData      │────▶│ HttpClient       │
//! │ Provider        │     │ (reqwest)        │
//! └─────────────────┘     └──────────────────┘
//! ```

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod service;
pub mod shape;

// Adapter implementations
pub use adapters::{YahooAdapter, YahooSession};

// Provider trait and fetch functions
pub use data_source::{
    fetch_history, fetch_quote_data, HistoryRequest, MarketDataProvider, SourceError,
    SourceErrorKind,
};

// Domain models
pub use domain::{
    ChartIndicators, ChartMeta, ChartResult, ErrorBody, FinancePayload, History, HistorySample,
    Interval, Period, QuoteIndicator, QuoteInfo, QuoteMeta, QuoteResult, Symbol, UtcDateTime,
    DEFAULT_CURRENCY, NO_DATA_MESSAGE,
};

// Error types
pub use error::{CoreError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, DEFAULT_TIMEOUT_MS,
};

// Request handling
pub use service::{FinanceQuery, FinanceRequest, FinanceService, DEFAULT_SYMBOL};
pub use shape::{shape_chart, shape_quote};
