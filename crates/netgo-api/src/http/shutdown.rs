//! `GET /shutdown/` endpoint.
//!
//! The handler only writes the acknowledgement. The route-level middleware
//! fires the signal after the handler chain has produced its response, so the
//! reply is never cut short by the stop it requested.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{CONNECTION, CONTENT_TYPE};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, info};

use crate::http::constants::{CONTENT_TYPE_TEXT, SHUTDOWN_MESSAGE};
use crate::state::ApiState;

pub(crate) async fn shutdown(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    state.telemetry.inc_shutdown_request();
    (
        [(CONTENT_TYPE, CONTENT_TYPE_TEXT), (CONNECTION, "close")],
        SHUTDOWN_MESSAGE,
    )
}

pub(crate) async fn fire_after_response(
    State(state): State<Arc<ApiState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if state.shutdown.fire() {
        info!("shutdown requested over http");
    } else {
        debug!("shutdown already requested");
    }
    response
}
