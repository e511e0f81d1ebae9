// responses/cors.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, Response, ResponseBuilder};
use http::HeaderValue;

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";

fn allowed<'a>(origin: Option<&'a str>, allow_list: &[String]) -> Option<&'a str> {
    origin.filter(|o| allow_list.iter().any(|a| a == o))
}

/// Add CORS headers when `origin` is on the allow-list.
pub fn apply_cors(resp: &mut Response, origin: Option<&str>, allow_list: &[String]) {
    let Some(origin) = allowed(origin, allow_list) else {
        return;
    };
    let Ok(value) = HeaderValue::from_str(origin) else {
        return;
    };

    let headers = resp.headers_mut();
    headers.insert("Access-Control-Allow-Origin", value);
    headers.insert(
        "Access-Control-Allow-Credentials",
        HeaderValue::from_static("true"),
    );
    headers.append("Vary", HeaderValue::from_static("Origin"));
}

/// Answer an `OPTIONS` preflight.
pub fn preflight_response(
    origin: Option<&str>,
    requested_headers: Option<&str>,
    allow_list: &[String],
) -> ResultResp {
    let mut builder = ResponseBuilder::new().status(204);

    if allowed(origin, allow_list).is_some() {
        builder = builder
            .header("Access-Control-Allow-Methods", ALLOW_METHODS)
            .header("Access-Control-Max-Age", "600");
        if let Some(h) = requested_headers {
            builder = builder.header("Access-Control-Allow-Headers", h);
        }
    }

    let mut resp = builder
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)?;
    apply_cors(&mut resp, origin, allow_list);
    Ok(resp)
}
