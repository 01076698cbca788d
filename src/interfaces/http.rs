//! HTTP trigger for the release job.
//!
//! A scheduler POSTs to `/release-funds`; the run happens inside the request
//! and the aggregated report is the response body.

use crate::application::job::ReleaseJob;
use crate::application::report::ReleaseReport;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub type SharedJob = Arc<ReleaseJob>;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    fn response(status: StatusCode, error: impl Into<String>) -> Response {
        (
            status,
            Json(ErrorBody {
                error: error.into(),
            }),
        )
            .into_response()
    }
}

pub fn create_router(job: SharedJob) -> Router {
    Router::new()
        .route(
            "/release-funds",
            post(release_funds).fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .with_state(job)
}

/// Serves the router until the listener fails.
pub async fn serve(listener: TcpListener, job: SharedJob) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Escrow release trigger listening on http://{}/release-funds", addr);
    }
    axum::serve(listener, create_router(job)).await
}

/// POST /release-funds
async fn release_funds(State(job): State<SharedJob>) -> Response {
    match job.run().await {
        Ok(report) => (StatusCode::OK, Json::<ReleaseReport>(report)).into_response(),
        Err(e) => ErrorBody::response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn method_not_allowed() -> Response {
    ErrorBody::response(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed. Use POST.",
    )
}

async fn health() -> impl IntoResponse {
    "OK"
}
