use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fintola_core::{CoreError, ErrorBody, HttpError};
use thiserror::Error;

/// Hard failure of a finance request, rendered as `500 {"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Startup and serve-loop failures of the binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] HttpError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl ServerError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Client(_) => 3,
            Self::Bind { .. } => 4,
            Self::Serve(_) => 10,
        }
    }
}
