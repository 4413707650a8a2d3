//! XML reply bodies for the action endpoint.
//!
//! Bodies are rooted at `<map>` with a `<Result>` element and, on failure, an
//! `<Err>` element carrying the error chain.

use axum::http::{StatusCode, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use quick_xml::errors::serialize::SeError;
use serde::Serialize;
use tracing::error;

use crate::http::constants::{
    CONTENT_TYPE_TEXT, CONTENT_TYPE_XML, RESULT_FAIL, RESULT_INCORRECT_PARAMETERS,
    RESULT_NOT_FOUND, RESULT_SUCCESS, XML_ROOT,
};

#[derive(Serialize)]
struct ReplyBody<'a> {
    #[serde(rename = "Result")]
    result: &'a str,
    #[serde(rename = "Err", skip_serializing_if = "Option::is_none")]
    err: Option<&'a str>,
}

/// Status plus XML body returned by the action endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActionReply {
    status: StatusCode,
    result: &'static str,
    err: Option<String>,
}

impl ActionReply {
    pub(crate) const fn success() -> Self {
        Self {
            status: StatusCode::OK,
            result: RESULT_SUCCESS,
            err: None,
        }
    }

    pub(crate) const fn fail(detail: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            result: RESULT_FAIL,
            err: Some(detail),
        }
    }

    pub(crate) const fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            result: RESULT_NOT_FOUND,
            err: None,
        }
    }

    pub(crate) const fn incorrect_parameters() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            result: RESULT_INCORRECT_PARAMETERS,
            err: None,
        }
    }

    fn render(&self) -> Result<String, SeError> {
        let body = ReplyBody {
            result: self.result,
            err: self.err.as_deref(),
        };
        quick_xml::se::to_string_with_root(XML_ROOT, &body)
    }
}

impl IntoResponse for ActionReply {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(xml) => (self.status, [(CONTENT_TYPE, CONTENT_TYPE_XML)], xml).into_response(),
            Err(err) => {
                error!(error = %err, "failed to encode reply body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(CONTENT_TYPE, CONTENT_TYPE_TEXT)],
                    "failed to encode reply body",
                )
                    .into_response()
            }
        }
    }
}
