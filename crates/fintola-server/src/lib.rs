//! # Fintola Server
//!
//! HTTP front end of the fintola quote proxy: configuration, logging, the axum
//! router and the serve loop.

pub mod cli;
pub mod error;
pub mod logging;
pub mod routes;

use std::sync::Arc;

use fintola_core::{FinanceService, ReqwestHttpClient, YahooAdapter};
use tracing::{info, warn};

pub use cli::Config;
pub use error::{ApiError, ServerError};
pub use routes::{router, AppState};

/// Builds the Yahoo-backed service and serves until Ctrl-C.
pub async fn serve(config: Config) -> Result<(), ServerError> {
    let http_client = Arc::new(ReqwestHttpClient::new(&config.user_agent)?);
    let adapter = YahooAdapter::new(http_client).with_timeout_ms(config.upstream_timeout_ms);
    let app = router(AppState::new(FinanceService::new(Arc::new(adapter))));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.addr,
            source,
        })?;
    info!(
        addr = %config.addr,
        upstream_timeout_ms = config.upstream_timeout_ms,
        "fintola listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("fintola stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "ctrl-c handler unavailable, running until killed");
        std::future::pending::<()>().await;
    }
}
