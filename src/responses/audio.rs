// responses/audio.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

/// Return MP3 audio as HTTP response
pub fn audio_response(buffer: Vec<u8>) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "audio/mpeg")
        .body(Body::from(buffer))
        .map_err(|_| ServerError::InternalError)?; // Convert any builder error

    Ok(resp)
}
