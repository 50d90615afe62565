use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::data_source::{HistoryRequest, MarketDataProvider, SourceError};
use crate::domain::finite;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, DEFAULT_TIMEOUT_MS};
use crate::{History, HistorySample, QuoteInfo, Symbol, UtcDateTime};

const QUERY2: &str = "https://query2.finance.yahoo.com";
const REFERER: &str = "https://finance.yahoo.com/";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URLS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const SUMMARY_MODULES: &str = "price,summaryDetail,financialData";
const CRUMB_TTL: Duration = Duration::from_secs(3600);

// ============================================================================
// Yahoo session - cookie/crumb handshake
// ============================================================================

#[derive(Debug, Clone)]
struct Crumb {
    value: String,
    fetched_at: Instant,
}

/// Yahoo session credential.
///
/// quoteSummary requires a session cookie from fc.yahoo.com (kept by the HTTP
/// client's cookie jar) and a crumb token paired with it. The crumb is reused
/// for an hour; the lock is held across a refresh so concurrent requests
/// share one handshake.
#[derive(Debug, Default)]
pub struct YahooSession {
    crumb: Mutex<Option<Crumb>>,
}

impl YahooSession {
    /// Current crumb, running the handshake if none is cached or it expired.
    pub async fn crumb(
        &self,
        http_client: &dyn HttpClient,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            if crumb.fetched_at.elapsed() < CRUMB_TTL {
                return Ok(crumb.value.clone());
            }
        }

        let value = handshake(http_client, timeout_ms).await?;
        *cached = Some(Crumb {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drops the cached crumb so the next request re-handshakes.
    pub async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }
}

async fn handshake(http_client: &dyn HttpClient, timeout_ms: u64) -> Result<String, SourceError> {
    // fc.yahoo.com answers 404 but still sets the session cookie.
    let cookie_request = HttpRequest::get(COOKIE_URL)
        .with_header("referer", REFERER)
        .with_timeout_ms(timeout_ms);
    http_client.execute(cookie_request).await.map_err(|e| {
        SourceError::unavailable(format!("failed to fetch yahoo session cookie: {}", e.message()))
    })?;

    for endpoint in CRUMB_URLS {
        let crumb_request = HttpRequest::get(endpoint)
            .with_header("referer", REFERER)
            .with_timeout_ms(timeout_ms);

        let response = match http_client.execute(crumb_request).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                debug!(endpoint, status = response.status, "crumb endpoint rejected request");
                continue;
            }
            Err(error) => {
                debug!(endpoint, error = error.message(), "crumb endpoint unreachable");
                continue;
            }
        };

        let body = response.body.trim();
        if body.to_ascii_lowercase().contains("too many requests") {
            return Err(SourceError::unavailable(
                "yahoo rate limited while fetching crumb",
            ));
        }
        if body.contains("<html") || body.contains("<!DOCTYPE") {
            continue;
        }
        if !body.is_empty() && body.len() < 100 && !body.contains(char::is_whitespace) {
            return Ok(body.to_owned());
        }
    }

    Err(SourceError::unavailable(
        "failed to fetch yahoo crumb from all endpoints",
    ))
}

// ============================================================================
// Yahoo adapter
// ============================================================================

/// Yahoo Finance implementation of [`MarketDataProvider`].
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    session: Arc<YahooSession>,
    timeout_ms: u64,
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            session: Arc::new(YahooSession::default()),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Timeout applied to every upstream call, handshake included.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, SourceError> {
        let request = HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.timed_out() {
                SourceError::unavailable(format!(
                    "yahoo request timed out after {}ms",
                    self.timeout_ms
                ))
            } else {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            }
        })?;

        if response.status == 401 {
            self.session.invalidate().await;
            return Err(SourceError::unavailable(
                "yahoo rejected the session (status 401)",
            ));
        }

        Ok(response)
    }

    async fn fetch_info(&self, symbol: &Symbol) -> Result<QuoteInfo, SourceError> {
        let crumb = self
            .session
            .crumb(self.http_client.as_ref(), self.timeout_ms)
            .await?;

        let base = format!(
            "{QUERY2}/v10/finance/quoteSummary/{}?modules={}",
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(SUMMARY_MODULES),
        );
        debug!(url = %base, "fetching yahoo quote summary");

        let url = format!("{base}&crumb={}", urlencoding::encode(&crumb));
        let response = self.get(&url).await?;
        let envelope: YahooQuoteSummaryResponse = parse_envelope(&response, "quote summary")?;

        if let Some(error) = envelope.quote_summary.error {
            if error.is_not_found() {
                warn!(symbol = %symbol, "yahoo has no quote summary for symbol");
                return Ok(QuoteInfo::default());
            }
            return Err(SourceError::invalid_request(format!(
                "yahoo quote summary error: {}",
                error.describe()
            )));
        }

        Ok(envelope
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(YahooQuoteSummaryResult::into_info)
            .unwrap_or_default())
    }

    async fn fetch_history(&self, req: &HistoryRequest) -> Result<History, SourceError> {
        let url = format!(
            "{QUERY2}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            urlencoding::encode(req.symbol.as_str()),
            req.period,
            req.interval,
        );
        debug!(url = %url, "fetching yahoo chart");

        let response = self.get(&url).await?;
        let envelope: YahooChartResponse = parse_envelope(&response, "chart")?;

        if let Some(error) = envelope.chart.error {
            if !error.is_not_found() {
                return Err(SourceError::invalid_request(format!(
                    "yahoo chart error: {}",
                    error.describe()
                )));
            }
            warn!(
                symbol = %req.symbol,
                period = %req.period,
                interval = %req.interval,
                error = %error.describe(),
                "yahoo chart returned no data"
            );
            return Ok(History::empty(req.symbol.clone()));
        }

        let Some(result) = envelope.chart.result.unwrap_or_default().into_iter().next() else {
            return Ok(History::empty(req.symbol.clone()));
        };

        result.into_history(req.symbol.clone())
    }
}

impl MarketDataProvider for YahooAdapter {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn info<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteInfo, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_info(symbol))
    }

    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<History, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_history(&req).await })
    }
}

/// Decodes a Yahoo envelope, falling back to a status error when the body is
/// not one. Error envelopes come back with 4xx statuses, so the body is tried
/// first.
fn parse_envelope<T: DeserializeOwned>(
    response: &HttpResponse,
    what: &str,
) -> Result<T, SourceError> {
    match serde_json::from_str::<T>(&response.body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !response.is_success() => Err(SourceError::unavailable(format!(
            "yahoo returned status {}",
            response.status
        ))),
        Err(e) => Err(SourceError::internal(format!(
            "failed to parse yahoo {what}: {e}"
        ))),
    }
}

// ============================================================================
// Yahoo API response structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooApiError {
    fn is_not_found(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case("not found"))
    }

    fn describe(&self) -> String {
        match (&self.code, &self.description) {
            (_, Some(description)) if !description.is_empty() => description.clone(),
            (Some(code), _) => code.clone(),
            _ => String::from("unknown error"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Option<YahooChartIndicators>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl YahooChartResult {
    fn into_history(self, symbol: Symbol) -> Result<History, SourceError> {
        let currency = self.meta.and_then(|meta| meta.currency);
        let timestamps = self.timestamp.unwrap_or_default();
        let quote = self
            .indicators
            .and_then(|indicators| indicators.quote.into_iter().next())
            .unwrap_or_default();

        let mut samples = Vec::with_capacity(timestamps.len());
        for (i, &seconds) in timestamps.iter().enumerate() {
            let ts = UtcDateTime::from_unix_timestamp(seconds)
                .map_err(|e| SourceError::internal(format!("invalid yahoo timestamp: {e}")))?;
            let column = |values: &[Option<f64>]| values.get(i).copied().flatten();

            let sample = HistorySample::new(
                ts,
                column(&quote.open),
                column(&quote.high),
                column(&quote.low),
                column(&quote.close),
                column(&quote.volume).and_then(to_count),
            );
            if !sample.is_blank() {
                samples.push(sample);
            }
        }

        Ok(History::new(symbol, currency, samples))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooQuoteSummaryResult {
    #[serde(default)]
    price: Option<YahooPriceModule>,
    #[serde(rename = "summaryDetail", default)]
    summary_detail: Option<YahooSummaryDetailModule>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<YahooFinancialDataModule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooPriceModule {
    #[serde(default)]
    regular_market_price: Option<YahooRawValue>,
    #[serde(default)]
    regular_market_previous_close: Option<YahooRawValue>,
    #[serde(default)]
    regular_market_volume: Option<YahooRawValue>,
    #[serde(default)]
    market_cap: Option<YahooRawValue>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooSummaryDetailModule {
    #[serde(default)]
    previous_close: Option<YahooRawValue>,
    #[serde(default)]
    regular_market_previous_close: Option<YahooRawValue>,
    #[serde(default)]
    regular_market_volume: Option<YahooRawValue>,
    #[serde(default)]
    market_cap: Option<YahooRawValue>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooFinancialDataModule {
    #[serde(default)]
    current_price: Option<YahooRawValue>,
}

/// quoteSummary wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`; missing values
/// arrive as `{}`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct YahooRawValue {
    #[serde(default)]
    raw: Option<f64>,
}

fn raw(value: &Option<YahooRawValue>) -> Option<f64> {
    finite(value.and_then(|v| v.raw))
}

fn to_count(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.round() as u64)
}

impl YahooQuoteSummaryResult {
    fn into_info(self) -> QuoteInfo {
        let price = self.price.unwrap_or_default();
        let detail = self.summary_detail.unwrap_or_default();
        let financial = self.financial_data.unwrap_or_default();

        QuoteInfo {
            regular_market_price: raw(&price.regular_market_price),
            current_price: raw(&financial.current_price),
            previous_close: raw(&detail.previous_close),
            regular_market_previous_close: raw(&price.regular_market_previous_close)
                .or_else(|| raw(&detail.regular_market_previous_close)),
            regular_market_volume: raw(&price.regular_market_volume)
                .or_else(|| raw(&detail.regular_market_volume))
                .and_then(to_count),
            market_cap: raw(&price.market_cap)
                .or_else(|| raw(&detail.market_cap))
                .and_then(to_count),
            currency: price.currency.or(detail.currency),
            short_name: price.short_name,
        }
    }
}
