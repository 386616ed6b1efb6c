//! Error types for the zonepin HTTP service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use zonepin_core::{ConfigError, ReconcileError};

/// Errors that can occur in zonepin-srv operations.
#[derive(Error, Debug)]
pub enum SrvError {
    /// HTTP listener failed to bind or stopped with an error.
    #[error("http server error: {0}")]
    Server(String),

    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Page template failed to register or render.
    #[error("template error: {0}")]
    Template(String),

    /// Reload command could not be started.
    #[error("reload error: {0}")]
    Reload(String),

    /// Zone file operation failed.
    #[error(transparent)]
    Zone(#[from] ReconcileError),

    /// Blocking task panicked or was cancelled.
    #[error("task error: {0}")]
    Task(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for SrvError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
    }
}
