//! # Domain Models
//!
//! Request parameters, provider snapshots and response shapes for the quote
//! proxy.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated Yahoo ticker |
//! | [`Period`] | Chart lookback window (`1mo`, `ytd`, ...) |
//! | [`Interval`] | Sampling interval (`1d`, `1wk`, ...) |
//! | [`UtcDateTime`] | UTC timestamp |
//! | [`QuoteInfo`] | Provider metadata snapshot for one symbol |
//! | [`History`] | Ascending OHLCV samples for one symbol |
//! | [`QuoteResult`] | Quote response body |
//! | [`ChartResult`] | Chart response body |
//!
//! Provider values that are undefined upstream are carried as `None` all the
//! way to the wire, where they serialize as `null`.

mod models;
mod output;
mod range;
mod symbol;
mod timestamp;

pub use models::{History, HistorySample, QuoteInfo};
pub(crate) use models::finite;
pub use output::{
    ChartIndicators, ChartMeta, ChartResult, ErrorBody, FinancePayload, QuoteIndicator,
    QuoteMeta, QuoteResult, DEFAULT_CURRENCY, NO_DATA_MESSAGE,
};
pub use range::{Interval, Period};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
