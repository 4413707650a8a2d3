//! Shared HTTP constants (headers, content types, result strings).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const CONTENT_TYPE_XML: &str = "application/xml; charset=utf-8";
pub(crate) const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";
pub(crate) const CONTENT_TYPE_PROMETHEUS: &str = "text/plain; version=0.0.4";

pub(crate) const XML_ROOT: &str = "map";
pub(crate) const RESULT_SUCCESS: &str = "Success";
pub(crate) const RESULT_FAIL: &str = "Fail";
pub(crate) const RESULT_NOT_FOUND: &str = "Not Found";
pub(crate) const RESULT_INCORRECT_PARAMETERS: &str = "Incorrect Parameters";

pub(crate) const SHUTDOWN_MESSAGE: &str = "Shutting down...";

pub(crate) const OUTCOME_SUCCESS: &str = "success";
pub(crate) const OUTCOME_FAILURE: &str = "failure";
pub(crate) const OUTCOME_NOT_FOUND: &str = "not_found";
pub(crate) const OUTCOME_REJECTED: &str = "rejected";
pub(crate) const FUNCTION_UNKNOWN: &str = "unknown";
