use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

pub use crate::errors::ResultResp;

/// Convert a ServerError into a JSON `{"detail": ...}` response
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    let detail = match &err {
        // internals stay in the logs
        ServerError::DbError(_) | ServerError::Schema(_) | ServerError::Config(_) => {
            "Internal Server Error".to_string()
        }
        other => other.to_string(),
    };
    json_error_response(status, &detail)
}

/// Build a JSON error body
pub fn json_error_response(status: u16, detail: &str) -> Response {
    let body = json!({ "detail": detail }).to_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
