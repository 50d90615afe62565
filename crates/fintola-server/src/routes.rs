//! Axum router for the proxy.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /api/finance` | Quote or chart for one symbol |
//! | `GET /api/health` | Liveness and provider name |
//!
//! Every response, including the 500 path, carries
//! `Access-Control-Allow-Origin: *`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use fintola_core::{FinancePayload, FinanceQuery, FinanceService, UtcDateTime};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::ApiError;

/// Shared state of the router.
#[derive(Clone)]
pub struct AppState {
    service: FinanceService,
}

impl AppState {
    pub fn new(service: FinanceService) -> Self {
        Self { service }
    }
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    provider: &'static str,
    timestamp: i64,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/finance", get(finance))
        .route("/api/health", get(health))
        .with_state(Arc::new(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn finance(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<FinancePayload>, ApiError> {
    let query = FinanceQuery::from_pairs(pairs);

    match state.service.handle(&query).await {
        Ok(payload) => Ok(Json(payload)),
        Err(error) => {
            warn!(
                symbol = query.symbol.as_deref().unwrap_or_default(),
                kind = query.kind.as_deref().unwrap_or("quote"),
                code = error.code(),
                error = %error,
                "finance request failed"
            );
            Err(error.into())
        }
    }
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(Health {
        status: "ok",
        provider: state.service.provider_name(),
        timestamp: UtcDateTime::now().unix_timestamp(),
    })
}
