//! Shared harness for the router-level tests: a canned provider, a
//! URL-routed fake transport, and a oneshot request helper.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use fintola_core::{
    FinanceService, History, HistoryRequest, HistorySample, HttpClient, HttpError, HttpRequest,
    HttpResponse, MarketDataProvider, QuoteInfo, SourceError, Symbol, UtcDateTime,
};
use fintola_server::{router, AppState};
use tower::ServiceExt;

pub const ORIGIN: &str = "http://dashboard.local";

/// Provider answering every call with the same canned results.
pub struct StubProvider {
    info: Result<QuoteInfo, SourceError>,
    history: Result<History, SourceError>,
    history_calls: Mutex<Vec<HistoryRequest>>,
}

impl StubProvider {
    pub fn new(info: QuoteInfo, history: History) -> Self {
        Self {
            info: Ok(info),
            history: Ok(history),
            history_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: SourceError) -> Self {
        Self {
            info: Err(error.clone()),
            history: Err(error),
            history_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn history_calls(&self) -> Vec<HistoryRequest> {
        self.history_calls
            .lock()
            .expect("call log should not be poisoned")
            .clone()
    }
}

impl MarketDataProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn info<'a>(
        &'a self,
        _symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteInfo, SourceError>> + Send + 'a>> {
        let result = self.info.clone();
        Box::pin(async move { result })
    }

    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<History, SourceError>> + Send + 'a>> {
        self.history_calls
            .lock()
            .expect("call log should not be poisoned")
            .push(req);
        let result = self.history.clone();
        Box::pin(async move { result })
    }
}

/// Transport answering each request with the first route whose pattern the
/// URL contains.
#[derive(Default)]
pub struct FakeTransport {
    routes: Vec<(&'static str, HttpResponse)>,
    urls: Mutex<Vec<String>>,
}

impl FakeTransport {
    /// Transport with a working cookie/crumb handshake.
    pub fn with_session() -> Self {
        Self::default()
            .route("fc.yahoo.com", HttpResponse::new(404, ""))
            .route("getcrumb", HttpResponse::ok_json("crumb-1"))
    }

    pub fn route(mut self, pattern: &'static str, response: HttpResponse) -> Self {
        self.routes.push((pattern, response));
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls
            .lock()
            .expect("url log should not be poisoned")
            .clone()
    }
}

impl HttpClient for FakeTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .iter()
            .find(|(pattern, _)| request.url.contains(pattern))
            .map(|(_, response)| Ok(response.clone()))
            .unwrap_or_else(|| Err(HttpError::new("connection failed")));
        self.urls
            .lock()
            .expect("url log should not be poisoned")
            .push(request.url);
        Box::pin(async move { response })
    }
}

pub fn app(provider: Arc<dyn MarketDataProvider>) -> Router {
    router(AppState::new(FinanceService::new(provider)))
}

/// Sends `GET uri` with an `Origin` header and decodes the JSON body.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, HeaderMap, serde_json::Value) {
    let request = Request::builder()
        .uri(uri)
        .header("origin", ORIGIN)
        .body(Body::empty())
        .expect("request should build");

    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = serde_json::from_slice(&bytes).expect("body should be JSON");

    (status, headers, body)
}

pub fn symbol(value: &str) -> Symbol {
    Symbol::parse(value).expect("valid symbol")
}

/// Daily samples starting 2024-01-01 with the given closes.
pub fn daily_history(symbol_value: &str, currency: Option<&str>, closes: &[f64]) -> History {
    let samples = closes
        .iter()
        .enumerate()
        .map(|(day, close)| {
            let ts = UtcDateTime::from_unix_timestamp(1_704_067_200 + day as i64 * 86_400)
                .expect("valid timestamp");
            HistorySample::new(
                ts,
                Some(close - 1.0),
                Some(close + 2.0),
                Some(close - 2.0),
                Some(*close),
                Some(1_000 + day as u64),
            )
        })
        .collect();

    History::new(symbol(symbol_value), currency.map(str::to_owned), samples)
}
