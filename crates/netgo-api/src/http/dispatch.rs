//! `GET /` action endpoint.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use netgo_exec::{ActionRequest, DispatchError};
use serde::Deserialize;
use tracing::{info, warn};

use crate::http::constants::{
    FUNCTION_UNKNOWN, OUTCOME_FAILURE, OUTCOME_NOT_FOUND, OUTCOME_REJECTED, OUTCOME_SUCCESS,
};
use crate::http::responses::ActionReply;
use crate::state::ApiState;

/// Query fields accepted by the action endpoint. Absent fields bind as empty.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ActionParams {
    #[serde(rename = "URL", default)]
    url: String,
    #[serde(rename = "Key", default)]
    key: String,
    #[serde(rename = "_function", default)]
    function: String,
}

pub(crate) async fn dispatch_action(
    State(state): State<Arc<ApiState>>,
    params: Result<Query<ActionParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(query) => query,
        Err(rejection) => {
            warn!(error = %rejection, "action parameters could not be bound");
            state
                .telemetry
                .inc_action(FUNCTION_UNKNOWN, OUTCOME_REJECTED);
            return ActionReply::incorrect_parameters().into_response();
        }
    };

    info!(
        url = %params.url,
        function = %params.function,
        has_key = !params.key.is_empty(),
        "action requested"
    );
    let request = ActionRequest::new(params.url, &params.function);

    match state.dispatcher.dispatch(&request).await {
        Ok(outcome) => {
            let function = request.function.known_name().unwrap_or(FUNCTION_UNKNOWN);
            if let Some(report) = &outcome.fetched {
                state.telemetry.add_downloaded_bytes(report.bytes_written);
            }
            if outcome.succeeded {
                state.telemetry.inc_action(function, OUTCOME_SUCCESS);
                ActionReply::success().into_response()
            } else {
                let detail = outcome.error_detail.unwrap_or_default();
                warn!(
                    function,
                    target = %request.target,
                    error = %detail,
                    "action failed"
                );
                state.telemetry.inc_action(function, OUTCOME_FAILURE);
                ActionReply::fail(detail).into_response()
            }
        }
        Err(DispatchError::UnrecognizedFunction { value }) => {
            warn!(function = %value, "unrecognized function");
            state
                .telemetry
                .inc_action(FUNCTION_UNKNOWN, OUTCOME_NOT_FOUND);
            ActionReply::not_found().into_response()
        }
    }
}
