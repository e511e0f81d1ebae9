use crate::errors::ServerError;
use crate::responses::etag::etag_for;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use serde::Serialize;

pub fn json_response<T: Serialize + ?Sized>(value: &T) -> ResultResp {
    let body = serde_json::to_vec(value).map_err(|_| ServerError::InternalError)?;

    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}

/// JSON response carrying an ETag. Answers `304` when the client already
/// holds the same body.
pub fn json_response_with_etag<T: Serialize + ?Sized>(
    value: &T,
    if_none_match: Option<&str>,
) -> ResultResp {
    let body = serde_json::to_vec(value).map_err(|_| ServerError::InternalError)?;
    let etag = etag_for(&body);

    if if_none_match.is_some_and(|v| v.split(',').any(|t| t.trim() == etag)) {
        return ResponseBuilder::new()
            .status(304)
            .header("ETag", &etag)
            .body(Body::empty())
            .map_err(|_| ServerError::InternalError);
    }

    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .header("ETag", &etag)
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}
