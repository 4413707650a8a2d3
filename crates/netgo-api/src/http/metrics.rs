//! `GET /metrics` exposition endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::http::constants::{CONTENT_TYPE_PROMETHEUS, CONTENT_TYPE_TEXT};
use crate::state::ApiState;

pub(crate) async fn metrics(State(state): State<Arc<ApiState>>) -> Response {
    match state.telemetry.render() {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, CONTENT_TYPE_PROMETHEUS)],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, CONTENT_TYPE_TEXT)],
                "failed to render metrics",
            )
                .into_response()
        }
    }
}
