//! HTTP routes: one page with the current records and the update form.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::app::{AppState, Outcome};
use crate::error::SrvError;
use crate::status::Status;

/// Submitted form.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    /// Newline-separated addresses.
    #[serde(default)]
    pub ips: String,
}

/// Build the router for all listeners.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(show_handler).post(submit_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// GET / - Current records and an empty form status.
async fn show_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, SrvError> {
    state.render(&Status::Idle, None).await.map(Html)
}

/// POST / - Replace the host's records with the submitted addresses.
async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SubmitForm>,
) -> Result<(StatusCode, Html<String>), SrvError> {
    let outcome = if form.ips.is_empty() {
        Outcome {
            status: Status::EmptyRequest,
            addresses: None,
        }
    } else {
        state.apply(form.ips).await
    };

    let code = outcome.status.http_status();
    let body = state.render(&outcome.status, outcome.addresses).await?;
    Ok((code, Html(body)))
}
